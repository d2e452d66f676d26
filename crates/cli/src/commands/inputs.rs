use anyhow::{anyhow, Result};
use serde::Serialize;

use forge_core::model::{OutputKind, PathSet, SymbolSet};
use forge_core::project::ProjectContext;
use forge_core::session::BuildSession;

use crate::commands::open_project;
use crate::resolve_input_path;

/// Snapshot of the saved inputs for `list-inputs --json`.
#[derive(Debug, Serialize)]
pub struct InputsSnapshot {
    pub references: Vec<String>,
    pub folders: Vec<String>,
    pub sources: Vec<String>,
    pub symbols: String,
    pub output_name: String,
    pub output_kind: OutputKind,
}

/// Load the project, apply `update` to its session, and save it back.
fn update_session<F>(root: &str, update: F) -> Result<ProjectContext>
where
    F: FnOnce(&ProjectContext, BuildSession) -> Result<BuildSession>,
{
    let mut ctx = open_project(root)?;
    let session = std::mem::take(&mut ctx.config.session);
    ctx.config.session = update(&ctx, session)?;
    ctx.save()?;
    Ok(ctx)
}

/// Register a reference binary. Re-adding a known path is a no-op.
pub fn add_reference_command(root: &str, path: &str) -> Result<()> {
    let ctx = update_session(root, |ctx, session| {
        let abs_path = resolve_input_path(&ctx.layout.root, path);
        if !abs_path.is_file() {
            return Err(anyhow!("Reference binary does not exist: {}", abs_path.display()));
        }
        Ok(session.add_reference(abs_path))
    })?;

    println!("References ({}):", ctx.config.session.references.len());
    for reference in &ctx.config.session.references {
        println!("  - {}", ctx.layout.relative_display(reference));
    }
    Ok(())
}

pub fn remove_reference_command(root: &str, path: &str) -> Result<()> {
    let ctx = update_session(root, |ctx, session| {
        Ok(session.remove_reference(resolve_input_path(&ctx.layout.root, path)))
    })?;
    println!("References remaining: {}", ctx.config.session.references.len());
    Ok(())
}

/// Pick a folder: every matching source below it joins the source list.
pub fn add_folder_command(root: &str, path: &str) -> Result<()> {
    let mut added = 0;
    let ctx = update_session(root, |ctx, session| {
        let before = session.sources.len();
        let folder = resolve_input_path(&ctx.layout.root, path);
        let session = session.add_folder(folder, &ctx.collector());
        added = session.sources.len() - before;
        Ok(session)
    })?;

    println!("Added folder: {path}");
    println!("  New sources: {added}");
    println!("  Total sources: {}", ctx.config.session.sources.len());
    Ok(())
}

/// Drop a folder root. Sources collected from it are kept.
pub fn remove_folder_command(root: &str, path: &str) -> Result<()> {
    let ctx = update_session(root, |ctx, session| {
        Ok(session.remove_folder(resolve_input_path(&ctx.layout.root, path)))
    })?;
    println!("Folders remaining: {}", ctx.config.session.folders.len());
    Ok(())
}

/// Pick a single source file. Re-adding a known path is a no-op.
pub fn add_source_command(root: &str, path: &str) -> Result<()> {
    let ctx = update_session(root, |ctx, session| {
        let abs_path = resolve_input_path(&ctx.layout.root, path);
        if !abs_path.is_file() {
            return Err(anyhow!("Source file does not exist: {}", abs_path.display()));
        }
        Ok(session.add_source(abs_path))
    })?;
    println!("Total sources: {}", ctx.config.session.sources.len());
    Ok(())
}

pub fn remove_source_command(root: &str, path: &str) -> Result<()> {
    let ctx = update_session(root, |ctx, session| {
        Ok(session.remove_source(resolve_input_path(&ctx.layout.root, path)))
    })?;
    println!("Sources remaining: {}", ctx.config.session.sources.len());
    Ok(())
}

/// Replace the current symbols with a user-supplied `;` string.
pub fn set_symbols_command(root: &str, symbols: &str) -> Result<()> {
    let ctx =
        update_session(root, |_, session| Ok(session.with_symbols(SymbolSet::parse(symbols))))?;
    println!("Symbols: {}", ctx.config.session.symbols);
    Ok(())
}

/// Change the output name and/or kind.
pub fn set_output_command(root: &str, name: Option<String>, executable: Option<bool>) -> Result<()> {
    let ctx = update_session(root, |_, mut session| {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(anyhow!("Output name must not be empty"));
            }
            session = session.with_output_name(name);
        }
        if let Some(executable) = executable {
            let kind = if executable { OutputKind::Executable } else { OutputKind::Library };
            session = session.with_output_kind(kind);
        }
        Ok(session)
    })?;
    let session = &ctx.config.session;
    println!("Output: {} ({:?})", session.output_path(&ctx.output_dir()).display(), session.output_kind);
    Ok(())
}

/// List references, folders, sources, and current symbols.
pub fn list_inputs_command(root: &str, json: bool) -> Result<()> {
    let ctx = open_project(root)?;
    let session = &ctx.config.session;
    let display = |paths: &PathSet| -> Vec<String> {
        paths.iter().map(|p| ctx.layout.relative_display(p)).collect()
    };
    let snapshot = InputsSnapshot {
        references: display(&session.references),
        folders: display(&session.folders),
        sources: display(&session.sources),
        symbols: session.symbols.to_delimited(),
        output_name: session.output_name.clone(),
        output_kind: session.output_kind,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    print_list("References", &snapshot.references);
    print_list("Folders", &snapshot.folders);
    print_list("Sources", &snapshot.sources);
    println!(
        "Symbols: {}",
        if snapshot.symbols.is_empty() { "(none)" } else { snapshot.symbols.as_str() }
    );
    println!("Output: {} ({:?})", snapshot.output_name, snapshot.output_kind);
    Ok(())
}

fn print_list(label: &str, entries: &[String]) {
    println!("{label} ({}):", entries.len());
    if entries.is_empty() {
        println!("  (none)");
    }
    for entry in entries {
        println!("  - {entry}");
    }
}

