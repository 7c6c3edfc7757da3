use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// When the session computes related files: on every active-editor change,
/// or only when the open-related-files command is invoked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivationMode {
    #[default]
    OnEditorChange,
    Manual,
}

/// Root strategy for the related-file search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// The workspace root.
    Root,
    /// The parent of the primary file's folder.
    #[default]
    Parent,
    /// The primary file's own folder.
    Sibling,
    /// One or more explicit glob prefixes from `custom_search_globs`.
    Custom,
}

/// The recognized setting names. Updates for anything else are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum SettingKey {
    ActivationMode,
    SearchMode,
    LockRelatedFiles,
    BlockNonRelatedFiles,
    SearchSubFolders,
    CustomSearchGlobs,
    IncludedFileExtensions,
    ExcludedFiles,
    ShowInitialised,
}

/// Core session settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub activation_mode: ActivationMode,

    #[serde(default)]
    pub search_mode: SearchMode,

    /// Reopen related files the user closes out of the pane. Recognized but
    /// not yet consulted by the session logic; the behavior is currently
    /// always on.
    #[serde(default = "default_true")]
    pub lock_related_files: bool,

    /// Relocate non-related files that open into the pane. Same caveat as
    /// `lock_related_files`.
    #[serde(default = "default_true")]
    pub block_non_related_files: bool,

    /// Prefix the name pattern with a recursive-descent marker.
    #[serde(default = "default_true")]
    pub search_sub_folders: bool,

    /// Glob prefixes used when `search_mode` is `custom`.
    #[serde(default = "default_custom_search_globs")]
    pub custom_search_globs: Vec<String>,

    /// Extension patterns joined into the name-glob alternation.
    #[serde(default = "default_included_file_extensions")]
    pub included_file_extensions: Vec<String>,

    /// Patterns to drop from results. Recognized but not yet consumed by the
    /// resolver.
    #[serde(default)]
    pub excluded_files: Vec<String>,

    /// Show the one-time initialisation notice.
    #[serde(default = "default_true")]
    pub show_initialised: bool,
}

fn default_true() -> bool {
    true
}

fn default_custom_search_globs() -> Vec<String> {
    vec!["**/*".to_string()]
}

fn default_included_file_extensions() -> Vec<String> {
    vec![".*".to_string()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            activation_mode: ActivationMode::default(),
            search_mode: SearchMode::default(),
            lock_related_files: true,
            block_non_related_files: true,
            search_sub_folders: true,
            custom_search_globs: default_custom_search_globs(),
            included_file_extensions: default_included_file_extensions(),
            excluded_files: Vec::new(),
            show_initialised: true,
        }
    }
}
