pub mod mock;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Identifies an editor column (a tab group position). Hosts number columns
/// from 1; the editor supports at most 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ViewColumn(pub u32);

impl ViewColumn {
    pub const ONE: ViewColumn = ViewColumn(1);
    pub const TWO: ViewColumn = ViewColumn(2);
    pub const MAX: ViewColumn = ViewColumn(9);

    /// The column one position to the right, capped at the maximum.
    pub fn next(self) -> ViewColumn {
        ViewColumn((self.0 + 1).min(Self::MAX.0))
    }
}

/// An open tab within a tab group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tab {
    /// Backing file for plain text documents. `None` for other tab inputs
    /// (diff views, webviews, custom editors).
    pub path: Option<PathBuf>,
}

impl Tab {
    pub fn text(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

/// A tab group as reported by the host: a column plus its open tabs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabGroup {
    pub column: ViewColumn,
    pub tabs: Vec<Tab>,
}

/// Options for showing a document in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowOptions {
    pub column: ViewColumn,
    pub preserve_focus: bool,
    pub preview: bool,
}

impl ShowOptions {
    /// Open non-preview in the given column without stealing focus. This is
    /// how every document lands in the related-files pane.
    pub fn pinned(column: ViewColumn) -> Self {
        Self {
            column,
            preserve_focus: true,
            preview: false,
        }
    }
}

/// Identifies a specific open tab for a close request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabRef {
    pub column: ViewColumn,
    pub path: PathBuf,
}

/// The editor capabilities the session actor consumes.
///
/// The actor never talks to an editor directly; a front-end (for example the
/// stdio bridge spawned by a VSCode extension) implements this trait and
/// services each call against the real window/tab/document API. Every method
/// is awaited: the actor suspends until the host confirms the operation, and
/// layout queries always reflect the live state at the time of the call.
#[async_trait::async_trait(?Send)]
pub trait EditorHost {
    /// Open (if needed) and show a document.
    async fn show_document(&self, path: &Path, options: ShowOptions) -> Result<()>;

    /// Close the given set of open tabs.
    async fn close_tabs(&self, tabs: &[TabRef]) -> Result<()>;

    /// Enumerate all open tab groups.
    async fn tab_groups(&self) -> Result<Vec<TabGroup>>;

    /// The column of the currently active tab group, if any.
    async fn active_column(&self) -> Result<Option<ViewColumn>>;

    /// The file backing the active text editor, if any.
    async fn active_document(&self) -> Result<Option<PathBuf>>;

    /// How many text editors are currently visible.
    async fn visible_editor_count(&self) -> Result<usize>;

    /// Show an informational message with optional action buttons; resolves
    /// to the chosen action or `None` when dismissed.
    async fn show_info(&self, message: &str, actions: &[&str]) -> Result<Option<String>>;

    /// Show a warning message with optional action buttons.
    async fn show_warning(&self, message: &str, actions: &[&str]) -> Result<Option<String>>;

    /// Show an error message.
    async fn show_error(&self, message: &str) -> Result<()>;

    /// Execute a host command (e.g. a window reload).
    async fn execute_command(&self, command: &str) -> Result<()>;
}
