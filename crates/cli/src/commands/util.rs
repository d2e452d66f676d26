use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use forge_core::project::ProjectContext;
use forge_core::services::build::{AssetRefresher, BackendError};

use crate::{canonicalize_or_current, sha256_file};

/// Resolve `root` and load its project context.
pub fn open_project(root: &str) -> Result<ProjectContext> {
    let root_path = canonicalize_or_current(root)?;
    ProjectContext::from_root(root_path)
}

/// Contents of the stamp written after each successful build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshStamp {
    pub output: String,
    /// Missing when the backend did not actually write the output (dry-run).
    pub sha256: Option<String>,
    pub refreshed_at: String,
}

/// Refresher that writes a JSON stamp so external watchers notice new output.
pub struct StampRefresher {
    pub stamp_path: PathBuf,
}

impl StampRefresher {
    pub fn new(stamp_path: impl Into<PathBuf>) -> Self {
        Self { stamp_path: stamp_path.into() }
    }
}

impl AssetRefresher for StampRefresher {
    fn refresh(&self, output: &Path) -> Result<(), BackendError> {
        let sha256 = if output.is_file() {
            Some(sha256_file(output).map_err(|e| BackendError::Refresh(e.to_string()))?)
        } else {
            None
        };
        let stamp = RefreshStamp {
            output: output.display().to_string(),
            sha256,
            refreshed_at: Utc::now().to_rfc3339(),
        };
        if let Some(parent) = self.stamp_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BackendError::Refresh(e.to_string()))?;
        }
        let json =
            serde_json::to_string_pretty(&stamp).map_err(|e| BackendError::Refresh(e.to_string()))?;
        fs::write(&self.stamp_path, json).map_err(|e| {
            BackendError::Refresh(format!("failed to write {}: {e}", self.stamp_path.display()))
        })?;
        Ok(())
    }
}

/// Helper to print whether a directory exists.
pub fn print_dir_status(label: &str, path: &Path) {
    let exists = path.is_dir();
    println!("- {label}: {} ({})", if exists { "OK" } else { "MISSING" }, path.display());
}
