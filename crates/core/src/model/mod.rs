//! Core data model shared by the collector, scanner, and build services.
//!
//! - `PathSet`: insertion-ordered, duplicate-free list of file paths
//!   (sources, reference binaries, folder roots).
//! - `SymbolSet`: deduplicated conditional-compilation symbols with a
//!   deterministic serialized form.
//! - `OutputKind`: whether the build produces a library or an executable.

use std::collections::BTreeSet;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Delimiter used when symbols are joined into a single compiler flag value.
pub const SYMBOL_DELIMITER: char = ';';

/// Normalize a path into its identity form.
///
/// Existing paths are canonicalized. Paths that do not exist (yet) are made
/// absolute against the current working directory instead.
pub fn normalize_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    match path.canonicalize() {
        Ok(p) => p,
        Err(_) if path.is_absolute() => path.to_path_buf(),
        Err(_) => env::current_dir().map(|cwd| cwd.join(path)).unwrap_or_else(|_| path.into()),
    }
}

/// Ordered set of paths: insertion order is preserved and duplicates are rejected.
///
/// Lists here stay small (tens to hundreds of entries), so a linear scan for
/// membership keeps the type simple and the order obvious.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PathBuf>", into = "Vec<PathBuf>")]
pub struct PathSet {
    paths: Vec<PathBuf>,
}

impl PathSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `path` unless already present. Returns `true` if it was added.
    pub fn insert(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.contains(&path) {
            return false;
        }
        self.paths.push(path);
        true
    }

    /// Remove `path` if present. Returns `true` if something was removed.
    pub fn remove(&mut self, path: &Path) -> bool {
        let before = self.paths.len();
        self.paths.retain(|p| p != path);
        before != self.paths.len()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn to_vec(&self) -> Vec<PathBuf> {
        self.paths.clone()
    }
}

impl From<Vec<PathBuf>> for PathSet {
    fn from(paths: Vec<PathBuf>) -> Self {
        paths.into_iter().collect()
    }
}

impl From<PathSet> for Vec<PathBuf> {
    fn from(set: PathSet) -> Self {
        set.paths
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for PathSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut set = PathSet::new();
        set.extend(iter);
        set
    }
}

impl<P: Into<PathBuf>> Extend<P> for PathSet {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        for path in iter {
            self.insert(path);
        }
    }
}

impl<'a> IntoIterator for &'a PathSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Deduplicated, case-sensitive set of conditional-compilation symbols.
///
/// Members are kept sorted, so the serialized form does not depend on the
/// order in which files or lines were scanned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolSet {
    symbols: BTreeSet<String>,
}

impl SymbolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `;`-delimited symbol string. Empty entries and surrounding
    /// whitespace are dropped.
    pub fn parse(value: &str) -> Self {
        value.split(SYMBOL_DELIMITER).map(str::trim).filter(|s| !s.is_empty()).collect()
    }

    /// Add a symbol. Returns `true` if it was not already present.
    pub fn insert(&mut self, symbol: impl Into<String>) -> bool {
        self.symbols.insert(symbol.into())
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    /// Set union; commutative and idempotent.
    pub fn union(mut self, other: &SymbolSet) -> SymbolSet {
        self.symbols.extend(other.symbols.iter().cloned());
        self
    }

    /// Join all symbols with `;`.
    pub fn to_delimited(&self) -> String {
        let mut out = String::new();
        for (idx, symbol) in self.symbols.iter().enumerate() {
            if idx > 0 {
                out.push(SYMBOL_DELIMITER);
            }
            out.push_str(symbol);
        }
        out
    }

    /// Compiler option carrying the symbols, or `None` when there are none.
    pub fn define_flag(&self) -> Option<String> {
        if self.symbols.is_empty() {
            None
        } else {
            Some(format!("/define:{}", self.to_delimited()))
        }
    }
}

impl<S: Into<String>> FromIterator<S> for SymbolSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { symbols: iter.into_iter().map(Into::into).collect() }
    }
}

impl<S: Into<String>> Extend<S> for SymbolSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.symbols.extend(iter.into_iter().map(Into::into));
    }
}

impl fmt::Display for SymbolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_delimited())
    }
}

/// What kind of binary a build produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    #[default]
    Library,
    Executable,
}

impl OutputKind {
    /// Value for the compiler's `-target:` switch.
    pub fn as_target(&self) -> &'static str {
        match self {
            OutputKind::Library => "library",
            OutputKind::Executable => "exe",
        }
    }
}
