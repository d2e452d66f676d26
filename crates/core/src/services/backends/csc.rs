use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use regex::Regex;
use tracing::debug;

use crate::services::build::{
    BackendError, BackendOutcome, BuildDescriptor, CompilerBackend, Diagnostic, Severity,
};

/// Environment variable pointing at the C# compiler executable.
pub const CSC_ENV: &str = "DLL_FORGE_CSC";

/// C# compiler backend that shells out to `csc` (Roslyn) or `mcs` (Mono).
#[derive(Debug, Clone)]
pub struct CscBackend {
    compiler: Option<PathBuf>,
    parser: DiagnosticParser,
}

impl CscBackend {
    /// `compiler` pins the executable; otherwise it is looked up at build time.
    pub fn new(compiler: Option<PathBuf>) -> Result<Self, BackendError> {
        Ok(Self { compiler, parser: DiagnosticParser::new()? })
    }

    pub fn parser(&self) -> &DiagnosticParser {
        &self.parser
    }

    /// Resolve the compiler executable.
    ///
    /// Precedence:
    /// - explicit path given at construction
    /// - `DLL_FORGE_CSC`
    /// - `csc`, then `mcs`, on `PATH`
    pub fn resolve_compiler(&self) -> Result<PathBuf, BackendError> {
        if let Some(path) = &self.compiler {
            if path.is_file() {
                return Ok(path.clone());
            }
            return Err(BackendError::MissingCompiler(format!(
                "configured compiler not found at {}",
                path.display()
            )));
        }
        if let Some(path) = env::var_os(CSC_ENV).map(PathBuf::from) {
            if path.is_file() {
                return Ok(path);
            }
        }
        ["csc", "mcs"].iter().find_map(|name| find_in_path(&executable_name(name))).ok_or_else(
            || {
                BackendError::MissingCompiler(format!(
                    "set {CSC_ENV} or put csc/mcs on PATH"
                ))
            },
        )
    }
}

impl CompilerBackend for CscBackend {
    fn compile(&self, descriptor: &BuildDescriptor) -> Result<BackendOutcome, BackendError> {
        let compiler = self.resolve_compiler()?;

        if let Some(parent) = descriptor.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    BackendError::Spawn(format!(
                        "failed to create output directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let args = compiler_arguments(descriptor);
        debug!(compiler = %compiler.display(), args = ?args, "spawning compiler");
        let output = Command::new(&compiler)
            .args(&args)
            .output()
            .map_err(|e| BackendError::Spawn(format!("failed to spawn {}: {e}", compiler.display())))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let mut diagnostics = self.parser.parse(&stdout);
        diagnostics.extend(self.parser.parse(&stderr));

        let parsed_error = diagnostics.iter().any(Diagnostic::is_error);
        if !output.status.success() && !parsed_error {
            // csc and mcs report on stdout; keep both streams.
            let detail = [stdout.trim(), stderr.trim()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            let message = if detail.is_empty() {
                format!("compiler exited with {}", output.status)
            } else {
                format!("compiler exited with {}: {detail}", output.status)
            };
            diagnostics.push(Diagnostic::error(message));
        }

        Ok(BackendOutcome {
            has_errors: parsed_error || !output.status.success(),
            diagnostics,
            output_path: descriptor.output_path.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "csc"
    }
}

/// Command-line arguments for one invocation, in csc/mcs syntax.
pub fn compiler_arguments(descriptor: &BuildDescriptor) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    args.push("-nologo".into());
    args.push(format!("-target:{}", descriptor.kind.as_target()).into());

    let mut out = OsString::from("-out:");
    out.push(descriptor.output_path.as_os_str());
    args.push(out);

    for reference in &descriptor.references {
        let mut r = OsString::from("-r:");
        r.push(reference.as_os_str());
        args.push(r);
    }
    if let Some(options) = &descriptor.compiler_options {
        args.push(options.into());
    }
    args.extend(descriptor.sources.iter().map(|s| s.as_os_str().to_os_string()));
    args
}

/// Parses compiler output into diagnostics, keeping the order lines appeared in.
///
/// Recognizes `file(line,col): error CODE: message`, `TOOL : error CODE: message`
/// and bare `error CODE: message`; anything else is ignored. The file may itself
/// contain parentheses; the location is the `(line,col)` right before `: error`.
#[derive(Debug, Clone)]
pub struct DiagnosticParser {
    located: Regex,
    unlocated: Regex,
}

impl DiagnosticParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            located: Regex::new(
                r"^\s*(?P<file>.+?)\((?P<line>\d+),(?P<col>\d+)\)\s*:\s*(?P<sev>error|warning)\s+(?P<code>[A-Za-z]+\d+)\s*:\s*(?P<msg>.*?)\s*$",
            )?,
            unlocated: Regex::new(
                r"^\s*(?:[^:\s]+\s*:\s*)?(?P<sev>error|warning)\s+(?P<code>[A-Za-z]+\d+)\s*:\s*(?P<msg>.*?)\s*$",
            )?,
        })
    }

    pub fn parse(&self, output: &str) -> Vec<Diagnostic> {
        output.lines().filter_map(|line| self.parse_line(line)).collect()
    }

    pub fn parse_line(&self, line: &str) -> Option<Diagnostic> {
        let (caps, located) = match self.located.captures(line) {
            Some(caps) => (caps, true),
            None => (self.unlocated.captures(line)?, false),
        };
        let severity = match &caps["sev"] {
            "warning" => Severity::Warning,
            _ => Severity::Error,
        };
        let mut diagnostic = Diagnostic {
            severity,
            file: None,
            line: None,
            column: None,
            code: Some(caps["code"].to_string()),
            message: caps["msg"].to_string(),
        };
        if located {
            diagnostic.file = Some(PathBuf::from(caps["file"].trim()));
            diagnostic.line = caps["line"].parse().ok();
            diagnostic.column = caps["col"].parse().ok();
        }
        Some(diagnostic)
    }
}

fn executable_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{name}.exe")
    } else {
        name.to_string()
    }
}

fn find_in_path(executable: &str) -> Option<PathBuf> {
    env::var_os("PATH").and_then(|paths| {
        env::split_paths(&paths).find_map(|p| {
            let candidate = p.join(executable);
            if candidate.is_file() {
                Some(candidate)
            } else {
                None
            }
        })
    })
}
