pub mod config;
pub mod manager;
#[cfg(test)]
mod tests;

pub use config::{ActivationMode, SearchMode, SettingKey, Settings};
pub use manager::SettingsManager;
