//! Source set collection: expands folder roots into source file paths.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::model::{normalize_path, PathSet};

/// Default extension (without the dot) of files treated as sources.
pub const DEFAULT_SOURCE_EXTENSION: &str = "cs";

/// Walks folder roots and returns the source files beneath them.
#[derive(Debug, Clone)]
pub struct SourceCollector {
    extension: String,
    follow_links: bool,
}

impl Default for SourceCollector {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_EXTENSION)
    }
}

impl SourceCollector {
    /// Collector matching `extension` (leading dot optional).
    pub fn new(extension: impl AsRef<str>) -> Self {
        Self {
            extension: extension.as_ref().trim_start_matches('.').to_string(),
            follow_links: false,
        }
    }

    /// Follow symbolic links while walking. Loops are detected by the walker
    /// and skipped.
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Recursively list matching files under `root`, sorted by file name within
    /// each directory.
    ///
    /// A missing or unreadable root yields an empty list rather than an error.
    pub fn collect(&self, root: &Path) -> Vec<PathBuf> {
        let root = normalize_path(root);
        if !root.is_dir() {
            warn!(folder = %root.display(), "source folder missing or not a directory; skipping");
            return Vec::new();
        }

        let files: Vec<PathBuf> = WalkDir::new(&root)
            .follow_links(self.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(err) => {
                    warn!(folder = %root.display(), error = %err, "skipping unreadable entry");
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .filter(|e| self.matches(e.path()))
            .map(|e| e.into_path())
            .collect();

        debug!(folder = %root.display(), count = files.len(), "collected source files");
        files
    }

    /// Collect under `root` and merge into `sources`, skipping known paths.
    pub fn collect_into(&self, mut sources: PathSet, root: &Path) -> PathSet {
        sources.extend(self.collect(root));
        sources
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()).map(|ext| ext == self.extension).unwrap_or(false)
    }
}
