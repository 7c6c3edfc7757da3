use crate::settings::config::{SettingKey, Settings};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use strum::IntoEnumIterator;
use tracing::{debug, warn};

/// Read-through cache over the persisted settings file. Each process holds
/// one in-memory copy; the shared `Arc<Mutex<..>>` keeps every component on
/// the same instance.
#[derive(Clone)]
pub struct SettingsManager {
    settings_path: PathBuf,
    inner: Arc<Mutex<Settings>>,
}

impl SettingsManager {
    /// Create a settings manager at the default location
    /// (`~/.relview/settings.toml`).
    pub fn new() -> Result<Self> {
        Self::from_path(Self::default_settings_path()?)
    }

    /// Create a settings manager backed by a specific file, writing defaults
    /// if the file does not exist yet.
    pub fn from_path(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            let contents = toml::to_string_pretty(&Settings::default())
                .context("Failed to serialize default settings")?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {parent:?}"))?;
            }
            fs::write(&path, contents)
                .with_context(|| format!("Failed to write default settings to {path:?}"))?;
        }

        let loaded = Self::load_from_file_with_backup(&path)?;

        Ok(Self {
            settings_path: path,
            inner: Arc::new(Mutex::new(loaded)),
        })
    }

    fn default_settings_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".relview").join("settings.toml"))
    }

    /// Load settings from a TOML file, moving a corrupt file aside and
    /// regenerating defaults instead of failing the session.
    fn load_from_file_with_backup(path: &Path) -> Result<Settings> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {path:?}"))?;

        match parse_settings(&contents) {
            Ok(settings) => Ok(settings),
            Err(_) => {
                let backup_path = path.with_extension("toml.backup");
                fs::rename(path, &backup_path).with_context(|| {
                    format!("Failed to backup corrupted settings to {backup_path:?}")
                })?;

                let default_settings = Settings::default();
                let contents = toml::to_string_pretty(&default_settings)
                    .context("Failed to serialize default settings")?;
                fs::write(path, contents)
                    .with_context(|| format!("Failed to write default settings to {path:?}"))?;

                Ok(default_settings)
            }
        }
    }

    /// Get a copy of the in-memory settings
    pub fn settings(&self) -> Settings {
        self.inner.lock().unwrap().clone()
    }

    /// Update in-memory settings with a closure. Note: not saved to disk
    pub fn update_setting<F>(&self, updater: F)
    where
        F: FnOnce(&mut Settings),
    {
        let mut guard = self.inner.lock().unwrap();
        updater(&mut guard);
    }

    /// Write a single setting by name. Unknown names and type mismatches are
    /// rejected with a diagnostic rather than an error; the store is left
    /// untouched.
    pub fn update_value(&self, name: &str, value: toml::Value) {
        let Ok(key) = SettingKey::from_str(name) else {
            warn!(name, "Couldn't find config value, ignoring update");
            return;
        };

        let current = self.settings();
        let Ok(toml::Value::Table(mut table)) = toml::Value::try_from(&current) else {
            warn!("Failed to serialize settings for update");
            return;
        };
        table.insert(key.as_ref().to_string(), value);

        match toml::Value::Table(table).try_into::<Settings>() {
            Ok(updated) => *self.inner.lock().unwrap() = updated,
            Err(e) => warn!(name, error = %e, "Rejected setting update with invalid value"),
        }
    }

    /// Re-read the backing file, replacing the in-memory copy. Used when the
    /// host reports a configuration change.
    pub fn reload(&self) -> Result<()> {
        let loaded = Self::load_from_file_with_backup(&self.settings_path)?;
        *self.inner.lock().unwrap() = loaded;
        Ok(())
    }

    /// Explicitly persist in-memory settings to disk
    pub fn save(&self) -> Result<()> {
        let settings = self.settings();
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {parent:?}"))?;
        }

        let contents = toml::to_string_pretty(&settings).context("Failed to serialize settings")?;
        fs::write(&self.settings_path, contents)
            .with_context(|| format!("Failed to write settings to {:?}", self.settings_path))?;
        eprintln!("SAVE: wrote {:?} exists_after={}", self.settings_path, self.settings_path.exists());
        Ok(())
    }

    /// Get the settings file path
    pub fn path(&self) -> &Path {
        &self.settings_path
    }
}

/// Parse the settings file, logging a diagnostic for every recognized key
/// the file does not carry before the default fills in.
fn parse_settings(contents: &str) -> Result<Settings> {
    let table: toml::Table = toml::from_str(contents)?;

    for key in SettingKey::iter() {
        if !table.contains_key(key.as_ref()) {
            debug!(
                key = key.as_ref(),
                "Couldn't get config value, using default instead"
            );
        }
    }

    Ok(toml::Value::Table(table).try_into()?)
}
