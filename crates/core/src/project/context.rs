use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::collector::SourceCollector;
use crate::project::{load_project_config, save_project_config, ProjectConfig, ProjectLayout};
use crate::services::build::{default_backend_registry, BackendRegistry};

/// Convenience wrapper bundling layout and the loaded config.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub layout: ProjectLayout,
    pub config: ProjectConfig,
}

impl ProjectContext {
    /// Load the project config for a given root.
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self> {
        let layout = ProjectLayout::new(root);
        let config = load_project_config(&layout)?;
        Ok(Self { layout, config })
    }

    /// Persist the (possibly updated) config.
    pub fn save(&self) -> Result<()> {
        save_project_config(&self.layout, &self.config)
    }

    /// Absolute directory the output binary is written to.
    pub fn output_dir(&self) -> PathBuf {
        self.layout.resolve(&self.config.output_dir)
    }

    pub fn collector(&self) -> SourceCollector {
        SourceCollector::new(&self.config.source_extension)
    }

    /// Backend registry honoring the configured compiler path.
    pub fn backend_registry(&self) -> Result<BackendRegistry> {
        let compiler = self.config.compiler_path.as_ref().map(|p| self.layout.resolve(p));
        Ok(default_backend_registry(compiler)?)
    }
}
