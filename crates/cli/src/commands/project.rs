use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::{info, warn};

use forge_core::project::{
    find_netstandard, save_project_config, ProjectConfig, ProjectLayout, NETSTANDARD_DLL,
};
use forge_core::session::BuildSession;

use crate::commands::{open_project, print_dir_status};
use crate::{canonicalize_or_current, infer_project_name};

#[derive(Serialize)]
pub struct ProjectInfoSnapshot {
    pub name: String,
    pub root: String,
    pub config_file: String,
    pub config_version: String,
    pub source_extension: String,
    pub output_dir: String,
    pub output_name: String,
    pub default_backend: Option<String>,
    pub compiler_path: Option<String>,
    pub references: usize,
    pub folders: usize,
    pub sources: usize,
    pub symbols: String,
}

/// Initialize a new project at `root`.
///
/// Picks up `netstandard.dll` from the root as a reference when present.
pub fn init_project_command(root: &str, name: Option<String>) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = ProjectLayout::new(&root_path);

    if layout.project_config_path.exists() {
        return Err(anyhow!(
            "Project already initialized at {}",
            layout.project_config_path.display()
        ));
    }

    // Derive project name if not provided.
    let project_name = match name {
        Some(n) => n,
        None => infer_project_name(&root_path),
    };

    let mut session = BuildSession::new();
    match find_netstandard(&root_path) {
        Some(path) => {
            info!(path = %path.display(), "{NETSTANDARD_DLL} found and added as reference");
            session = session.add_reference(path);
        }
        None => warn!(root = %root_path.display(), "{NETSTANDARD_DLL} not found in project root"),
    }

    let config = ProjectConfig::new(&project_name).with_session(session);
    save_project_config(&layout, &config)?;

    println!("Initialized dll-forge project:");
    println!("  Name: {}", project_name);
    println!("  Root: {}", layout.root.display());
    println!("  Config: {}", layout.project_config_path.display());
    println!("  Output dir: {}", layout.resolve(&config.output_dir).display());
    println!("  References: {}", config.session.references.len());

    Ok(())
}

/// Show basic information about an existing project.
pub fn project_info_command(root: &str, json: bool) -> Result<()> {
    let ctx = open_project(root)?;
    let config = &ctx.config;
    let snapshot = ProjectInfoSnapshot {
        name: config.name.clone(),
        root: ctx.layout.root.display().to_string(),
        config_file: ctx.layout.project_config_path.display().to_string(),
        config_version: config.config_version.clone(),
        source_extension: config.source_extension.clone(),
        output_dir: ctx.output_dir().display().to_string(),
        output_name: config.session.output_name.clone(),
        default_backend: config.default_backend.clone(),
        compiler_path: config.compiler_path.clone(),
        references: config.session.references.len(),
        folders: config.session.folders.len(),
        sources: config.session.sources.len(),
        symbols: config.session.symbols.to_delimited(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("dll-forge Project Info");
    println!("======================");
    println!("Name: {}", snapshot.name);
    println!("Root: {}", snapshot.root);
    println!("Config file: {}", snapshot.config_file);
    println!("Config version: {}", snapshot.config_version);
    println!("Source extension: .{}", snapshot.source_extension);
    println!("Output: {} ({:?})", snapshot.output_name, config.session.output_kind);
    println!("Default backend: {}", snapshot.default_backend.as_deref().unwrap_or("(none)"));
    println!(
        "Inputs: {} reference(s), {} folder(s), {} source(s)",
        snapshot.references, snapshot.folders, snapshot.sources
    );
    println!(
        "Symbols: {}",
        if snapshot.symbols.is_empty() { "(none)" } else { snapshot.symbols.as_str() }
    );
    println!();

    println!("Directories:");
    print_dir_status("Meta dir (.dll-forge)", &ctx.layout.meta_dir);
    print_dir_status("Output dir", &ctx.output_dir());

    Ok(())
}
