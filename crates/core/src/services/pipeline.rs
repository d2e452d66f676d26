use std::path::Path;

use thiserror::Error;

use crate::scanner::{ScanError, SymbolScanner};
use crate::services::build::{BackendError, BuildResult, BuildRunner};
use crate::session::BuildSession;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Scan (optionally) then compile one session.
///
/// Returns the session as it was compiled, so callers can persist the freshly
/// detected symbols, together with the build result.
pub fn scan_and_build(
    session: BuildSession,
    scanner: Option<&SymbolScanner>,
    runner: &BuildRunner<'_>,
    output_dir: &Path,
) -> Result<(BuildSession, BuildResult), PipelineError> {
    let session = match scanner {
        Some(scanner) => session.rescan(scanner)?,
        None => session,
    };
    let descriptor = session.descriptor(output_dir);
    let result = runner.run(&descriptor)?;
    Ok((session, result))
}
