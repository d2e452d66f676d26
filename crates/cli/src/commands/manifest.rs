use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use forge_core::collector::{SourceCollector, DEFAULT_SOURCE_EXTENSION};
use forge_core::model::{normalize_path, OutputKind, SymbolSet};
use forge_core::project::ProjectLayout;
use forge_core::scanner::SymbolScanner;
use forge_core::services::build::{default_backend_name, default_backend_registry, BuildRunner};
use forge_core::services::pipeline::scan_and_build;
use forge_core::session::{BuildSession, DEFAULT_OUTPUT_NAME};

use crate::commands::{report_build, select_backend, StampRefresher};

/// One-shot build description, read from YAML or JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildManifest {
    #[serde(default = "default_output_name")]
    pub output_name: String,
    /// Output directory; defaults to the manifest's directory.
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub folders: Vec<String>,
    /// Symbols to use when `scan` is false (`;`-delimited).
    #[serde(default)]
    pub symbols: Option<String>,
    #[serde(default)]
    pub executable: bool,
    #[serde(default = "default_scan")]
    pub scan: bool,
    #[serde(default)]
    pub backend: Option<String>,
    #[serde(default)]
    pub source_extension: Option<String>,
}

fn default_output_name() -> String {
    DEFAULT_OUTPUT_NAME.to_string()
}

fn default_scan() -> bool {
    true
}

impl BuildManifest {
    pub fn validate(&self) -> Result<()> {
        if self.output_name.trim().is_empty() {
            return Err(anyhow!("Manifest output_name is required"));
        }
        if self.folders.is_empty() {
            return Err(anyhow!("Manifest must list at least one folder"));
        }
        Ok(())
    }

    /// Turn the manifest into a fresh session; relative paths resolve against `base`.
    pub fn to_session(&self, base: &Path) -> BuildSession {
        let collector = SourceCollector::new(
            self.source_extension.as_deref().unwrap_or(DEFAULT_SOURCE_EXTENSION),
        );
        let kind = if self.executable { OutputKind::Executable } else { OutputKind::Library };
        let mut session = BuildSession::new()
            .with_output_name(&self.output_name)
            .with_output_kind(kind)
            .with_symbols(self.symbols.as_deref().map(SymbolSet::parse).unwrap_or_default());
        for reference in &self.references {
            session = session.add_reference(base.join(reference));
        }
        for folder in &self.folders {
            session = session.add_folder(base.join(folder), &collector);
        }
        session
    }

    pub fn output_dir(&self, base: &Path) -> PathBuf {
        self.output_dir.as_ref().map(|d| base.join(d)).unwrap_or_else(|| base.to_path_buf())
    }
}

/// Read a manifest, picking the format from the file extension.
pub fn load_manifest(path: &Path) -> Result<BuildManifest> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    let manifest: BuildManifest = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML manifest {}", path.display()))?,
        Some("json") => serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON manifest {}", path.display()))?,
        _ => return Err(anyhow!("Unsupported manifest format: {}", path.display())),
    };
    manifest.validate()?;
    Ok(manifest)
}

/// Build straight from a manifest without touching any project config.
pub fn build_manifest_command(manifest_path: &str, backend: Option<String>, json: bool) -> Result<()> {
    let path = normalize_path(manifest_path);
    let manifest = load_manifest(&path)?;
    let base = path.parent().map(Path::to_path_buf).unwrap_or_default();

    let session = manifest.to_session(&base);
    let output_dir = manifest.output_dir(&base);

    let registry = default_backend_registry(None)?;
    let backend_name = backend
        .or_else(|| manifest.backend.clone())
        .unwrap_or_else(|| default_backend_name().to_string());
    let backend = select_backend(&registry, &backend_name)?;
    let refresher = StampRefresher::new(ProjectLayout::new(&base).refresh_stamp_path);
    let runner = BuildRunner { backend, refresher: &refresher };

    let scanner = if manifest.scan { Some(SymbolScanner::new()?) } else { None };
    let (session, result) = scan_and_build(session, scanner.as_ref(), &runner, &output_dir)
        .with_context(|| format!("Backend '{backend_name}' failed"))?;

    if !json {
        println!("Sources: {}", session.sources.len());
        println!("Symbols: {}", session.symbols);
    }
    report_build(&result, json, Some(&base))
}
