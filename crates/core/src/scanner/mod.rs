//! Define-symbol discovery.
//!
//! A line-oriented heuristic, not a preprocessor: every physical line is
//! looked at on its own, and the first rule whose prefix test passes decides
//! what (if anything) the line contributes.
//!
//! Rules, in priority order:
//! 1. `#define NAME` adds `NAME`.
//! 2. `#if ...` / `#elif ...` adds every word on the line except a small
//!    stoplist of directive and boolean keywords.
//! 3. `[Conditional("NAME")]` adds `NAME`.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::SymbolSet;

/// Words on a conditional line that are never symbols.
pub const STOPLIST: [&str; 7] = ["if", "elif", "else", "true", "false", "endif", "defined"];

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to read source file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid scanner pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Per-line extraction rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRule {
    DirectDefine,
    ConditionalExpression,
    ConditionalAttribute,
}

impl LineRule {
    /// Rules in the order they are tried.
    pub const ORDERED: [LineRule; 3] =
        [LineRule::DirectDefine, LineRule::ConditionalExpression, LineRule::ConditionalAttribute];

    /// Whether this rule claims the line. `trimmed` is the line without leading
    /// whitespace.
    fn claims(&self, line: &str, trimmed: &str) -> bool {
        match self {
            LineRule::DirectDefine => trimmed.starts_with("#define"),
            LineRule::ConditionalExpression => {
                trimmed.starts_with("#if") || trimmed.starts_with("#elif")
            }
            LineRule::ConditionalAttribute => line.contains("[Conditional("),
        }
    }
}

/// Outcome of running the rules over one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    pub rule: LineRule,
    /// Extracted names in line order. May be empty when the rule claimed the
    /// line but its pattern found nothing (e.g. a bare `#define`).
    pub symbols: Vec<String>,
}

pub fn is_stopword(word: &str) -> bool {
    STOPLIST.contains(&word)
}

/// Compiled patterns for the three line rules.
#[derive(Debug, Clone)]
pub struct SymbolScanner {
    define: Regex,
    word: Regex,
    attribute: Regex,
}

impl SymbolScanner {
    pub fn new() -> Result<Self, ScanError> {
        Ok(Self {
            define: Regex::new(r"#define\s+(\w+)")?,
            word: Regex::new(r"\b\w+\b")?,
            attribute: Regex::new(r#"\[Conditional\("(.+?)"\)\]"#)?,
        })
    }

    /// Apply the rules to a single line. `None` means no rule claimed it.
    pub fn scan_line(&self, line: &str) -> Option<LineMatch> {
        let trimmed = line.trim_start();
        let rule = LineRule::ORDERED.into_iter().find(|rule| rule.claims(line, trimmed))?;
        let symbols = match rule {
            LineRule::DirectDefine => self
                .define
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map(|m| vec![m.as_str().to_string()])
                .unwrap_or_default(),
            LineRule::ConditionalExpression => self
                .word
                .find_iter(line)
                .map(|m| m.as_str())
                .filter(|word| !is_stopword(word))
                .map(str::to_string)
                .collect(),
            LineRule::ConditionalAttribute => self
                .attribute
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map(|m| vec![m.as_str().to_string()])
                .unwrap_or_default(),
        };
        Some(LineMatch { rule, symbols })
    }

    /// Scan every line of `text`.
    pub fn scan_text(&self, text: &str) -> SymbolSet {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut symbols = SymbolSet::new();
        for line in text.lines() {
            if let Some(found) = self.scan_line(line) {
                symbols.extend(found.symbols);
            }
        }
        symbols
    }

    /// Read and scan one file. Invalid UTF-8 is replaced rather than rejected.
    pub fn scan_file(&self, path: &Path) -> Result<SymbolSet, ScanError> {
        let bytes =
            fs::read(path).map_err(|source| ScanError::Read { path: path.to_path_buf(), source })?;
        let symbols = self.scan_text(&String::from_utf8_lossy(&bytes));
        debug!(file = %path.display(), found = symbols.len(), "scanned source file");
        Ok(symbols)
    }

    /// Scan all `files` and return the union of their symbols.
    ///
    /// The result is always rebuilt from scratch; nothing from a previous scan
    /// carries over.
    pub fn scan_files<I, P>(&self, files: I) -> Result<SymbolSet, ScanError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut symbols = SymbolSet::new();
        for file in files {
            symbols = symbols.union(&self.scan_file(file.as_ref())?);
        }
        info!(symbols = %symbols, "define symbols detected");
        Ok(symbols)
    }
}
