//! Tracking of the related-files pane and the file sets that define it.
//!
//! File identity here is base-name only: two files sharing a base name in
//! different folders are indistinguishable. A documented limitation, not an
//! oversight.

use crate::host::{TabGroup, ViewColumn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The tracked session state the reconciliation logic operates on: which
/// column is the related-files pane, which file is primary, which base names
/// are currently related, and where the marker file lives.
#[derive(Debug, Default)]
pub struct ViewState {
    pub pane: Option<ViewColumn>,
    pub primary: Option<String>,
    pub related: HashSet<String>,
    pub marker: Option<PathBuf>,
}

fn base_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

impl ViewState {
    /// Whether the path names the marker (temp) file. Always false until a
    /// marker has been established.
    pub fn is_marker(&self, path: &Path) -> bool {
        let Some(marker) = self.marker.as_deref().and_then(base_name) else {
            return false;
        };
        base_name(path) == Some(marker)
    }

    pub fn is_primary(&self, path: &Path) -> bool {
        match (&self.primary, base_name(path)) {
            (Some(primary), Some(name)) => primary == name,
            _ => false,
        }
    }

    pub fn is_related(&self, path: &Path) -> bool {
        base_name(path).is_some_and(|name| self.related.contains(name))
    }

    pub fn set_primary(&mut self, path: &Path) {
        self.primary = base_name(path).map(str::to_string);
    }

    pub fn track_related(&mut self, path: &Path) {
        if let Some(name) = base_name(path) {
            self.related.insert(name.to_string());
        }
    }

    pub fn clear_related(&mut self) {
        self.related.clear();
    }
}

/// Dynamically locates the related-files pane in the live layout: the first
/// group where every tab is a text document that is marker-or-related, with
/// at least one marker tab. Recomputed on every call; the result is never
/// cached because layout changes are the main source of perturbation.
pub fn locate_pane(groups: &[TabGroup], state: &ViewState) -> Option<ViewColumn> {
    groups
        .iter()
        .find(|group| {
            let members_only = group.tabs.iter().all(|tab| {
                tab.path
                    .as_deref()
                    .is_some_and(|p| state.is_marker(p) || state.is_related(p))
            });
            let has_marker = group
                .tabs
                .iter()
                .any(|tab| tab.path.as_deref().is_some_and(|p| state.is_marker(p)));
            members_only && has_marker
        })
        .map(|group| group.column)
}

/// Every column hosting at least one marker tab. Used to seed the pane on
/// first activation when a previous session left the marker open.
pub fn marker_columns(groups: &[TabGroup], state: &ViewState) -> Vec<ViewColumn> {
    groups
        .iter()
        .filter(|group| {
            group
                .tabs
                .iter()
                .any(|tab| tab.path.as_deref().is_some_and(|p| state.is_marker(p)))
        })
        .map(|group| group.column)
        .collect()
}

/// The last occupied column, capped at the editor's maximum.
pub fn last_column(groups: &[TabGroup]) -> ViewColumn {
    ViewColumn(groups.len().min(ViewColumn::MAX.0 as usize) as u32)
}
