use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use toml::Table;
use tracing::info;

/// Folder under the temp directory holding the marker file.
pub const MARKER_DIR: &str = "relview";

/// Base name of the marker file. Its presence in a pane is what identifies
/// that pane as the related-files pane, so the name is deliberately one no
/// real source file would carry.
pub const MARKER_FILE_NAME: &str = "Related Files View";

/// Expand a leading `~` against the home directory. Some platforms report a
/// temp dir using the shorthand.
fn expand_home(path: &Path) -> PathBuf {
    let Some(text) = path.to_str() else {
        return path.to_path_buf();
    };
    let Some(rest) = text.strip_prefix('~') else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => path.to_path_buf(),
    }
}

/// Create a zero-byte marker file (and its parent directories) under the
/// platform temp directory, returning its path.
pub fn create_marker_file(folder: &str, file_name: &str) -> Result<PathBuf> {
    let temp_dir = expand_home(&std::env::temp_dir());
    let path = temp_dir.join(folder).join(file_name);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {parent:?}"))?;
    }
    fs::write(&path, "").with_context(|| format!("Failed to create marker file at {path:?}"))?;

    info!(path = %path.display(), "created marker file");
    Ok(path)
}

/// Persistent key-value state surviving across sessions, backed by a small
/// TOML file. Holds the marker file location so every session reuses the
/// same path.
pub struct StateStore {
    path: PathBuf,
    values: Table,
}

impl StateStore {
    /// Open the store at the default location (`~/.relview/state.toml`).
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Self::from_path(home.join(".relview").join("state.toml"))
    }

    pub fn from_path(path: PathBuf) -> Result<Self> {
        let values = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read state from {path:?}"))?;
            toml::from_str(&contents).unwrap_or_default()
        } else {
            Table::new()
        };
        Ok(Self { path, values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values
            .insert(key.to_string(), toml::Value::String(value));
        self.persist()
    }

    /// Get the stored value, or compute, store, and return it.
    pub fn get_or_insert_with<F>(&mut self, key: &str, init: F) -> Result<String>
    where
        F: FnOnce() -> Result<String>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = init()?;
        self.set(key, value.clone())?;
        Ok(value)
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {parent:?}"))?;
        }
        let contents = toml::to_string_pretty(&self.values).context("Failed to serialize state")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write state to {:?}", self.path))?;
        Ok(())
    }
}
