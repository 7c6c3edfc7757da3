use anyhow::{Context, Result};
use globset::{Glob, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// File matching primitive: everything under `root` whose root-relative path
/// matches `pattern`. The session core only depends on this trait; editors
/// that prefer their own search facility can supply it through the bridge.
pub trait FileSearch {
    fn find_files(&self, root: &Path, pattern: &str) -> Result<Vec<PathBuf>>;
}

/// Glob matching over the real file system.
pub struct GlobSearch {
    max_depth: usize,
}

impl GlobSearch {
    pub fn new() -> Self {
        Self { max_depth: 20 }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl Default for GlobSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSearch for GlobSearch {
    fn find_files(&self, root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        let glob = Glob::new(pattern)
            .with_context(|| format!("Invalid glob pattern: {pattern}"))?;
        let mut builder = GlobSetBuilder::new();
        builder.add(glob);
        let glob_set = builder.build().context("Failed to build glob set")?;

        let mut matches = Vec::new();
        let walker = WalkDir::new(root)
            .max_depth(self.max_depth)
            .follow_links(false);

        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            if glob_set.is_match(relative) {
                matches.push(entry.path().to_path_buf());
            }
        }

        debug!(pattern, root = %root.display(), count = matches.len(), "glob search");
        Ok(matches)
    }
}
