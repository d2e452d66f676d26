use anyhow::{Context, Result};
use serde::Serialize;

use forge_core::scanner::SymbolScanner;

use crate::commands::open_project;

#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub sources: usize,
    pub symbols: Vec<String>,
    pub define: String,
}

/// Rescan every saved source and overwrite the saved symbols with the result.
pub fn scan_command(root: &str, json: bool) -> Result<()> {
    let mut ctx = open_project(root)?;
    let scanner = SymbolScanner::new()?;
    let session = std::mem::take(&mut ctx.config.session);
    ctx.config.session = session.rescan(&scanner).context("Failed to scan sources")?;
    ctx.save()?;

    let session = &ctx.config.session;
    let report = ScanReport {
        sources: session.sources.len(),
        symbols: session.symbols.iter().map(str::to_string).collect(),
        define: session.symbols.to_delimited(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Scanned {} source(s)", report.sources);
        println!("Custom Scripting Define Symbols Detected: {}", report.define);
    }
    Ok(())
}
