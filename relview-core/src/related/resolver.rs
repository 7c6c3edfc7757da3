use crate::related::search::FileSearch;
use crate::settings::{SearchMode, Settings};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The primary file is under none of the known workspace roots.
    #[error("The current file is not in a workspace.")]
    NoWorkspace,
    #[error(transparent)]
    Search(#[from] anyhow::Error),
}

/// The portion of a file's base name preceding its *first* dot. Splitting at
/// the first dot (rather than stripping the last extension) groups compound
/// names like `widget.module.css` under `widget`.
pub fn stem(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    Some(match name.split_once('.') {
        Some((stem, _)) => stem,
        None => name,
    })
}

/// Compute the related-file locations for a primary file.
///
/// The name pattern is `<stem>{ext,ext,..}`, optionally prefixed `**/` when
/// sub-folder search is on, rooted according to the search mode. The result
/// keeps whatever order the matcher yields and never contains the primary
/// file itself.
pub fn resolve(
    primary: &Path,
    settings: &Settings,
    workspace_roots: &[PathBuf],
    search: &dyn FileSearch,
) -> Result<Vec<PathBuf>, ResolveError> {
    let workspace_root = workspace_roots
        .iter()
        .find(|root| primary.starts_with(root))
        .ok_or(ResolveError::NoWorkspace)?;

    let Some(stem) = stem(primary) else {
        return Ok(Vec::new());
    };

    let extension_glob = format!("{{{}}}", settings.included_file_extensions.join(","));
    let name_glob = format!("{stem}{extension_glob}");
    let sub_folders_glob = if settings.search_sub_folders {
        format!("**/{name_glob}")
    } else {
        name_glob
    };

    let folder = primary.parent().unwrap_or(workspace_root);

    let mut results = Vec::new();
    match settings.search_mode {
        SearchMode::Custom => {
            // Matches from every custom glob are unioned.
            for glob in &settings.custom_search_globs {
                let pattern = format!("{glob}{sub_folders_glob}");
                results.extend(search.find_files(workspace_root, &pattern)?);
            }
        }
        mode => {
            let root_folder = match mode {
                SearchMode::Sibling => folder,
                // A primary directly in the workspace root has no parent
                // folder inside the workspace; clamp to the root.
                SearchMode::Parent => folder.parent().unwrap_or(workspace_root),
                _ => workspace_root,
            };

            let pattern = match root_folder.strip_prefix(workspace_root) {
                Ok(relative) if !relative.as_os_str().is_empty() => {
                    format!("{}/{sub_folders_glob}", relative.display())
                }
                _ => sub_folders_glob,
            };
            results = search.find_files(workspace_root, &pattern)?;
        }
    }

    let mut seen = HashSet::new();
    let related: Vec<PathBuf> = results
        .into_iter()
        .filter(|path| path != primary)
        .filter(|path| seen.insert(path.clone()))
        .collect();

    debug!(primary = %primary.display(), count = related.len(), "resolved related files");
    Ok(related)
}
