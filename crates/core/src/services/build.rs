use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::model::OutputKind;

/// Fully resolved inputs for one compiler invocation. Built fresh per build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDescriptor {
    pub output_path: PathBuf,
    pub references: Vec<PathBuf>,
    /// Compiler options string; carries `/define:...` when any symbol is set.
    pub compiler_options: Option<String>,
    pub sources: Vec<PathBuf>,
    pub kind: OutputKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// One message reported by the compiler backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

impl Diagnostic {
    /// Error diagnostic with no location or code.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            file: None,
            line: None,
            column: None,
            code: None,
            message: message.into(),
        }
    }

    pub fn in_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}", file.display())?;
            if let (Some(line), Some(column)) = (self.line, self.column) {
                write!(f, "({line},{column})")?;
            }
            f.write_str(": ")?;
        }
        f.write_str(self.severity.as_str())?;
        if let Some(code) = &self.code {
            write!(f, " {code}")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Raw result as reported by a backend, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendOutcome {
    pub has_errors: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub output_path: PathBuf,
}

/// Interpreted result of one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BuildResult {
    Success { output: PathBuf },
    Failure { diagnostics: Vec<Diagnostic> },
}

impl BuildResult {
    /// Translate a raw backend outcome. Every diagnostic is kept, in backend order.
    pub fn from_outcome(outcome: BackendOutcome) -> Self {
        if outcome.has_errors {
            BuildResult::Failure { diagnostics: outcome.diagnostics }
        } else {
            BuildResult::Success { output: outcome.output_path }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BuildResult::Success { .. })
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            BuildResult::Success { .. } => &[],
            BuildResult::Failure { diagnostics } => diagnostics,
        }
    }
}

/// Failures that keep a backend or collaborator from running at all.
///
/// Compile errors are not in here; they come back as `BuildResult::Failure`.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Compiler not found: {0}")]
    MissingCompiler(String),
    #[error("Failed to run compiler: {0}")]
    Spawn(String),
    #[error("Asset refresh failed: {0}")]
    Refresh(String),
    #[error("Invalid diagnostic pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Trait implemented by compiler backends (e.g. csc/mcs, dry-run).
pub trait CompilerBackend: Send + Sync {
    fn compile(&self, descriptor: &BuildDescriptor) -> Result<BackendOutcome, BackendError>;
    fn name(&self) -> &'static str;
}

/// Host-side hook run after a successful build so the new binary shows up.
pub trait AssetRefresher {
    fn refresh(&self, output: &Path) -> Result<(), BackendError>;
}

/// Refresher for hosts that need no notification.
pub struct NoopRefresher;

impl AssetRefresher for NoopRefresher {
    fn refresh(&self, _output: &Path) -> Result<(), BackendError> {
        Ok(())
    }
}

/// Registry for compiler backends; callers select by name.
#[derive(Default)]
pub struct BackendRegistry {
    backends: HashMap<String, Box<dyn CompilerBackend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self { backends: HashMap::new() }
    }

    pub fn register<B: CompilerBackend + 'static>(&mut self, backend: B) -> &mut Self {
        self.backends.insert(backend.name().to_string(), Box::new(backend));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn CompilerBackend> {
        self.backends.get(name).map(|b| &**b)
    }

    /// Return a sorted list of registered backend names for error messages/help.
    pub fn names(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.backends.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Runs one build: hands the descriptor to the backend, interprets the outcome,
/// and triggers the refresher on success. One shot, no retries.
pub struct BuildRunner<'a> {
    pub backend: &'a dyn CompilerBackend,
    pub refresher: &'a dyn AssetRefresher,
}

impl<'a> BuildRunner<'a> {
    pub fn run(&self, descriptor: &BuildDescriptor) -> Result<BuildResult, BackendError> {
        info!(
            backend = self.backend.name(),
            output = %descriptor.output_path.display(),
            sources = descriptor.sources.len(),
            references = descriptor.references.len(),
            options = descriptor.compiler_options.as_deref().unwrap_or(""),
            "compiling"
        );

        let result = BuildResult::from_outcome(self.backend.compile(descriptor)?);
        match &result {
            BuildResult::Success { output } => {
                info!(output = %output.display(), "DLL compiled successfully");
                self.refresher.refresh(output)?;
            }
            BuildResult::Failure { diagnostics } => {
                for diagnostic in diagnostics {
                    error!("{diagnostic}");
                }
            }
        }
        Ok(result)
    }
}

/// Backend that checks every input exists and reports each missing one as an
/// error. Writes nothing; useful where no compiler is installed.
pub struct DryRunBackend;

impl CompilerBackend for DryRunBackend {
    fn compile(&self, descriptor: &BuildDescriptor) -> Result<BackendOutcome, BackendError> {
        let mut diagnostics = Vec::new();
        for reference in &descriptor.references {
            if !reference.is_file() {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "Reference binary not found: {}",
                        reference.display()
                    ))
                    .with_code("CS0006"),
                );
            }
        }
        for source in &descriptor.sources {
            if !source.is_file() {
                diagnostics.push(
                    Diagnostic::error(format!("Source file '{}' could not be found", source.display()))
                        .with_code("CS2001"),
                );
            }
        }
        if descriptor.sources.is_empty() {
            diagnostics.push(Diagnostic::error("No source files specified").with_code("CS2008"));
        }

        Ok(BackendOutcome {
            has_errors: diagnostics.iter().any(Diagnostic::is_error),
            diagnostics,
            output_path: descriptor.output_path.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "dry-run"
    }
}

/// Registry populated with the dry-run backend plus any compiled-in backends.
///
/// `compiler_path` pins the executable used by the csc backend.
pub fn default_backend_registry(
    compiler_path: Option<PathBuf>,
) -> Result<BackendRegistry, BackendError> {
    let mut registry = BackendRegistry::new();
    registry.register(DryRunBackend);
    #[cfg(feature = "csc-backend")]
    {
        registry.register(crate::services::backends::CscBackend::new(compiler_path)?);
    }
    #[cfg(not(feature = "csc-backend"))]
    {
        let _ = compiler_path;
    }
    Ok(registry)
}

/// Backend used when neither the caller nor the config names one.
pub fn default_backend_name() -> &'static str {
    if cfg!(feature = "csc-backend") {
        "csc"
    } else {
        "dry-run"
    }
}
