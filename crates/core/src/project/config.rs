use serde::{Deserialize, Serialize};

use crate::collector::DEFAULT_SOURCE_EXTENSION;
use crate::session::BuildSession;

/// Default directory (relative to the project root) receiving the output binary.
pub const DEFAULT_OUTPUT_DIR: &str = "Assets";

/// Serializable configuration describing a dll-forge project.
///
/// This lives at `.dll-forge/project.json` in the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Human-friendly project name.
    pub name: String,
    /// Optional description / notes.
    #[serde(default)]
    pub description: Option<String>,
    /// Schema/config version. This is about the config format, not the tool version.
    pub config_version: String,
    /// Extension (without the dot) of files collected from folders.
    #[serde(default = "default_source_extension")]
    pub source_extension: String,
    /// Output directory; relative paths resolve against the project root.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Optional default compiler backend to use when none is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_backend: Option<String>,
    /// Optional explicit compiler executable for the csc backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler_path: Option<String>,
    /// Saved inputs: references, folders, sources, symbols, output name.
    #[serde(default)]
    pub session: BuildSession,
}

fn default_source_extension() -> String {
    DEFAULT_SOURCE_EXTENSION.to_string()
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

impl ProjectConfig {
    /// Create a new project configuration with an empty session.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            config_version: "0.1.0".to_string(),
            source_extension: default_source_extension(),
            output_dir: default_output_dir(),
            default_backend: None,
            compiler_path: None,
            session: BuildSession::default(),
        }
    }

    /// Replace the saved session.
    pub fn with_session(mut self, session: BuildSession) -> Self {
        self.session = session;
        self
    }
}
