//! Immutable build session.
//!
//! A `BuildSession` holds everything the user has picked so far: reference
//! binaries, folder roots, source files, the current define symbols, and the
//! output name/kind. Each operation consumes the session and returns the next
//! one, so frontends thread the value through explicitly and tests need no host.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::collector::SourceCollector;
use crate::model::{normalize_path, OutputKind, PathSet, SymbolSet};
use crate::scanner::{ScanError, SymbolScanner};
use crate::services::build::BuildDescriptor;

/// Output name used until the user picks one.
pub const DEFAULT_OUTPUT_NAME: &str = "CompiledScripts.dll";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSession {
    #[serde(default)]
    pub references: PathSet,
    #[serde(default)]
    pub folders: PathSet,
    #[serde(default)]
    pub sources: PathSet,
    #[serde(default)]
    pub symbols: SymbolSet,
    #[serde(default = "default_output_name")]
    pub output_name: String,
    #[serde(default)]
    pub output_kind: OutputKind,
}

fn default_output_name() -> String {
    DEFAULT_OUTPUT_NAME.to_string()
}

impl Default for BuildSession {
    fn default() -> Self {
        Self {
            references: PathSet::new(),
            folders: PathSet::new(),
            sources: PathSet::new(),
            symbols: SymbolSet::new(),
            output_name: default_output_name(),
            output_kind: OutputKind::default(),
        }
    }
}

impl BuildSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reference binary. Adding the same path twice is a no-op.
    pub fn add_reference(mut self, path: impl AsRef<Path>) -> Self {
        self.references.insert(normalize_path(path));
        self
    }

    pub fn remove_reference(mut self, path: impl AsRef<Path>) -> Self {
        self.references.remove(&normalize_path(path));
        self
    }

    /// Record a folder root and merge its sources.
    ///
    /// A folder that was already picked is not walked again.
    pub fn add_folder(mut self, folder: impl AsRef<Path>, collector: &SourceCollector) -> Self {
        let folder = normalize_path(folder);
        if !self.folders.insert(folder.clone()) {
            return self;
        }
        self.sources = collector.collect_into(self.sources, &folder);
        self
    }

    /// Forget a folder root. Sources it contributed stay until removed one by one.
    pub fn remove_folder(mut self, folder: impl AsRef<Path>) -> Self {
        self.folders.remove(&normalize_path(folder));
        self
    }

    /// Add a single source file.
    pub fn add_source(mut self, path: impl AsRef<Path>) -> Self {
        self.sources.insert(normalize_path(path));
        self
    }

    pub fn remove_source(mut self, path: impl AsRef<Path>) -> Self {
        self.sources.remove(&normalize_path(path));
        self
    }

    /// Replace the define symbols (e.g. with a user-edited `;` string).
    pub fn with_symbols(mut self, symbols: SymbolSet) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = name.into();
        self
    }

    pub fn with_output_kind(mut self, kind: OutputKind) -> Self {
        self.output_kind = kind;
        self
    }

    /// Rescan all sources and replace the symbols with the result.
    ///
    /// Previously detected or manually entered symbols are discarded.
    pub fn rescan(self, scanner: &SymbolScanner) -> Result<Self, ScanError> {
        let symbols = scanner.scan_files(self.sources.iter())?;
        info!(sources = self.sources.len(), symbols = symbols.len(), "rescanned session sources");
        Ok(self.with_symbols(symbols))
    }

    /// Resolve where the output binary lands inside `output_dir`.
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.output_name)
    }

    /// Build a fresh descriptor for one compile invocation.
    pub fn descriptor(&self, output_dir: &Path) -> BuildDescriptor {
        BuildDescriptor {
            output_path: self.output_path(output_dir),
            references: self.references.to_vec(),
            compiler_options: self.symbols.define_flag(),
            sources: self.sources.to_vec(),
            kind: self.output_kind,
        }
    }
}
