use anyhow::Result;
use serde::Serialize;

use forge_core::services::build::{default_backend_name, default_backend_registry};

#[derive(Debug, Serialize)]
pub struct BackendInfo {
    pub name: String,
    pub description: String,
    pub is_default: bool,
}

/// List compiler backends known to this binary.
pub fn list_backends_command(json: bool) -> Result<()> {
    let registry = default_backend_registry(None)?;
    let entries: Vec<BackendInfo> = registry
        .names()
        .into_iter()
        .map(|name| {
            let description = match name.as_str() {
                "dry-run" => {
                    "Checks that every source and reference exists; writes nothing".to_string()
                }
                "csc" => "C# compiler (csc or mcs; set DLL_FORGE_CSC or compiler_path)".to_string(),
                other => format!("Backend '{}'", other),
            };
            let is_default = name == default_backend_name();
            BackendInfo { name, description, is_default }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("Backends: (none)");
        return Ok(());
    }

    println!("Backends:");
    for entry in entries {
        let marker = if entry.is_default { " (default)" } else { "" };
        println!("- {}{}: {}", entry.name, marker, entry.description);
    }

    Ok(())
}
