use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dll_forge::commands::{
    add_folder_command, add_reference_command, add_source_command, build_command,
    build_manifest_command, init_project_command, list_backends_command, list_inputs_command,
    project_info_command, remove_folder_command, remove_reference_command, remove_source_command,
    scan_command, set_output_command, set_symbols_command,
};

/// Convert C# scripts into a single DLL.
///
/// This CLI is a thin wrapper around `forge-core` (exposed in code as `forge_core`).
/// All substantive logic lives in the library so it can be tested thoroughly
/// and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "dll-forge",
    version,
    about = "Scan C# sources for define symbols and compile them into a DLL",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new dll-forge project at the given root.
    ///
    /// Writes `.dll-forge/project.json` and adds `netstandard.dll` from the
    /// root as a reference when it exists.
    InitProject {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Optional project name. If omitted, the name is derived from the root directory.
        #[arg(long)]
        name: Option<String>,
    },

    /// Show basic information about an existing project.
    ProjectInfo {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Add a reference binary (DLL) to link against.
    AddReference {
        #[arg(long, default_value = ".")]
        root: String,

        /// Path to the reference DLL (relative paths resolve against the root).
        #[arg(long)]
        path: String,
    },

    /// Remove a reference binary.
    RemoveReference {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        path: String,
    },

    /// Add every source file under a folder (recursively).
    AddFolder {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        path: String,
    },

    /// Forget a folder root. Its sources stay until removed individually.
    RemoveFolder {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        path: String,
    },

    /// Add a single source file.
    AddSource {
        #[arg(long, default_value = ".")]
        root: String,

        /// Path to the source file (relative paths resolve against the root).
        #[arg(long)]
        path: String,
    },

    /// Remove a single source file.
    RemoveSource {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        path: String,
    },

    /// List references, folders, sources, and current symbols.
    ListInputs {
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Replace the current define symbols (`;`-delimited). The next scan overwrites them.
    SetSymbols {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long, allow_hyphen_values = true)]
        symbols: String,
    },

    /// Set the output binary name and/or kind.
    SetOutput {
        #[arg(long, default_value = ".")]
        root: String,

        /// Output file name (e.g. `CompiledScripts.dll`).
        #[arg(long)]
        name: Option<String>,

        /// Produce an executable (`true`) or a library (`false`).
        #[arg(long)]
        executable: Option<bool>,
    },

    /// Scan sources for define symbols and save them.
    Scan {
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Scan for define symbols, then compile the sources into the output binary.
    Build {
        #[arg(long, default_value = ".")]
        root: String,

        /// Compiler backend (see `list-backends`). Defaults to the project setting.
        #[arg(long)]
        backend: Option<String>,

        /// Keep the saved symbols instead of rescanning.
        #[arg(long, default_value_t = false)]
        skip_scan: bool,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Build from a YAML/JSON manifest without a project.
    BuildManifest {
        /// Path to the manifest file (.yaml, .yml, or .json).
        #[arg(long)]
        manifest: String,

        #[arg(long)]
        backend: Option<String>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List available compiler backends.
    ListBackends {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::InitProject { root, name } => init_project_command(&root, name)?,
        Command::ProjectInfo { root, json } => project_info_command(&root, json)?,
        Command::AddReference { root, path } => add_reference_command(&root, &path)?,
        Command::RemoveReference { root, path } => remove_reference_command(&root, &path)?,
        Command::AddFolder { root, path } => add_folder_command(&root, &path)?,
        Command::RemoveFolder { root, path } => remove_folder_command(&root, &path)?,
        Command::AddSource { root, path } => add_source_command(&root, &path)?,
        Command::RemoveSource { root, path } => remove_source_command(&root, &path)?,
        Command::ListInputs { root, json } => list_inputs_command(&root, json)?,
        Command::SetSymbols { root, symbols } => set_symbols_command(&root, &symbols)?,
        Command::SetOutput { root, name, executable } => {
            set_output_command(&root, name, executable)?
        }
        Command::Scan { root, json } => scan_command(&root, json)?,
        Command::Build { root, backend, skip_scan, json } => {
            build_command(&root, backend, skip_scan, json)?
        }
        Command::BuildManifest { manifest, backend, json } => {
            build_manifest_command(&manifest, backend, json)?
        }
        Command::ListBackends { json } => list_backends_command(json)?,
    }

    Ok(())
}
