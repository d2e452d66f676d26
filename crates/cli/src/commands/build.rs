use std::path::Path;

use anyhow::{anyhow, Context, Result};

use forge_core::project::{resolve_backend_name, ProjectContext};
use forge_core::scanner::SymbolScanner;
use forge_core::services::build::{BackendRegistry, BuildResult, BuildRunner, CompilerBackend};

use crate::commands::{open_project, StampRefresher};

/// Look up a backend by name, listing the known ones when it is missing.
pub fn select_backend<'r>(registry: &'r BackendRegistry, name: &str) -> Result<&'r dyn CompilerBackend> {
    registry.get(name).ok_or_else(|| {
        anyhow!("Unknown backend '{}'. Available: {}", name, registry.names().join(", "))
    })
}

/// Scan (unless skipped), persist the symbols, then compile the saved session.
pub fn run_build(ctx: &mut ProjectContext, backend: Option<&str>, skip_scan: bool) -> Result<BuildResult> {
    if !skip_scan {
        let scanner = SymbolScanner::new()?;
        let session = std::mem::take(&mut ctx.config.session);
        ctx.config.session = session.rescan(&scanner).context("Failed to scan sources")?;
        ctx.save()?;
    }

    let registry = ctx.backend_registry()?;
    let backend_name = resolve_backend_name(backend, Some(&ctx.config));
    let backend = select_backend(&registry, &backend_name)?;
    let refresher = StampRefresher::new(&ctx.layout.refresh_stamp_path);
    let runner = BuildRunner { backend, refresher: &refresher };

    let descriptor = ctx.config.session.descriptor(&ctx.output_dir());
    let result = runner.run(&descriptor).with_context(|| format!("Backend '{backend_name}' failed"))?;
    Ok(result)
}

/// Scan for define symbols and convert the saved sources into a DLL.
pub fn build_command(root: &str, backend: Option<String>, skip_scan: bool, json: bool) -> Result<()> {
    let mut ctx = open_project(root)?;
    let result = run_build(&mut ctx, backend.as_deref(), skip_scan)?;
    report_build(&result, json, Some(&ctx.layout.root))
}

/// Print a build result; a failure also becomes the command's error.
pub fn report_build(result: &BuildResult, json: bool, root: Option<&Path>) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        match result {
            BuildResult::Success { output } => {
                let shown = root
                    .and_then(|r| output.strip_prefix(r).ok())
                    .unwrap_or(output.as_path());
                println!("DLL compiled successfully: {}", shown.display());
            }
            BuildResult::Failure { diagnostics } => {
                println!("Build failed ({} diagnostic(s)):", diagnostics.len());
                for diagnostic in diagnostics {
                    println!("  {diagnostic}");
                }
            }
        }
    }

    match result {
        BuildResult::Success { .. } => Ok(()),
        BuildResult::Failure { diagnostics } => {
            Err(anyhow!("Build failed with {} diagnostic(s)", diagnostics.len()))
        }
    }
}
