use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::project::{ProjectConfig, ProjectLayout};
use crate::services::build::default_backend_name;

/// File name of the .NET Standard facade picked up automatically on init.
pub const NETSTANDARD_DLL: &str = "netstandard.dll";

/// Load the project config JSON from disk for a given layout.
pub fn load_project_config(layout: &ProjectLayout) -> Result<ProjectConfig> {
    let config_json = fs::read_to_string(&layout.project_config_path).with_context(|| {
        format!("Failed to read project config at {}", layout.project_config_path.display())
    })?;
    let config: ProjectConfig =
        serde_json::from_str(&config_json).context("Failed to parse project config JSON")?;
    Ok(config)
}

/// Write the project config JSON, creating the meta dir if needed.
pub fn save_project_config(layout: &ProjectLayout, config: &ProjectConfig) -> Result<()> {
    fs::create_dir_all(&layout.meta_dir)
        .with_context(|| format!("Failed to create meta dir: {}", layout.meta_dir.display()))?;
    let json = serde_json::to_string_pretty(config)?;
    fs::write(&layout.project_config_path, json).with_context(|| {
        format!("Failed to write project config: {}", layout.project_config_path.display())
    })?;
    Ok(())
}

/// Look for `netstandard.dll` directly inside `dir`.
pub fn find_netstandard(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(NETSTANDARD_DLL);
    candidate.is_file().then_some(candidate)
}

/// Pick the backend name: explicit choice, then config default, then the
/// compiled-in default.
pub fn resolve_backend_name(explicit: Option<&str>, config: Option<&ProjectConfig>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| config.and_then(|c| c.default_backend.clone()))
        .unwrap_or_else(|| default_backend_name().to_string())
}
