use crate::settings::config::{ActivationMode, SearchMode, Settings};
use crate::settings::manager::SettingsManager;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.activation_mode, ActivationMode::OnEditorChange);
    assert_eq!(settings.search_mode, SearchMode::Parent);
    assert!(settings.lock_related_files);
    assert!(settings.block_non_related_files);
    assert!(settings.search_sub_folders);
    assert_eq!(settings.custom_search_globs, vec!["**/*".to_string()]);
    assert_eq!(settings.included_file_extensions, vec![".*".to_string()]);
    assert!(settings.excluded_files.is_empty());
    assert!(settings.show_initialised);
}

#[test]
fn test_missing_keys_fall_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");

    // A file carrying only one key: every other getter must still work.
    std::fs::write(&settings_path, "search_mode = \"sibling\"\n").unwrap();

    let manager = SettingsManager::from_path(settings_path).unwrap();
    let settings = manager.settings();

    assert_eq!(settings.search_mode, SearchMode::Sibling);
    assert_eq!(settings.activation_mode, ActivationMode::OnEditorChange);
    assert!(settings.show_initialised);
}

#[test]
fn test_creates_default_file_when_missing() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("nested").join("settings.toml");

    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();
    assert!(settings_path.exists());
    assert_eq!(manager.settings(), Settings::default());
}

#[test]
fn test_corrupt_file_moved_to_backup() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");

    std::fs::write(&settings_path, "this is not { toml").unwrap();

    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();
    assert_eq!(manager.settings(), Settings::default());
    assert!(settings_path.with_extension("toml.backup").exists());
}

#[test]
fn test_update_value_recognized_key() {
    let temp_dir = TempDir::new().unwrap();
    let manager = SettingsManager::from_path(temp_dir.path().join("settings.toml")).unwrap();

    manager.update_value("show_initialised", toml::Value::Boolean(false));
    assert!(!manager.settings().show_initialised);

    manager.update_value("search_mode", toml::Value::String("custom".to_string()));
    assert_eq!(manager.settings().search_mode, SearchMode::Custom);
}

#[test]
fn test_update_value_unknown_key_is_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let manager = SettingsManager::from_path(temp_dir.path().join("settings.toml")).unwrap();

    manager.update_value("no_such_setting", toml::Value::Boolean(false));
    assert_eq!(manager.settings(), Settings::default());
}

#[test]
fn test_update_value_invalid_type_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let manager = SettingsManager::from_path(temp_dir.path().join("settings.toml")).unwrap();

    manager.update_value("search_sub_folders", toml::Value::String("yes".to_string()));
    assert!(manager.settings().search_sub_folders);
}

#[test]
fn test_save_and_reload_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");
    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();

    manager.update_setting(|s| s.activation_mode = ActivationMode::Manual);
    manager.save().unwrap();

    let reopened = SettingsManager::from_path(settings_path).unwrap();
    assert_eq!(reopened.settings().activation_mode, ActivationMode::Manual);
}

#[test]
fn test_reload_picks_up_external_edit() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");
    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();

    std::fs::write(&settings_path, "activation_mode = \"manual\"\n").unwrap();
    manager.reload().unwrap();

    assert_eq!(manager.settings().activation_mode, ActivationMode::Manual);
}
