use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use forge_core::project::{load_project_config, ProjectLayout};
use predicates::prelude::*;
use tempfile::tempdir;

fn write_fixture(root: &std::path::Path) {
    fs::create_dir_all(root.join("Assets/Scripts")).unwrap();
    fs::write(
        root.join("Assets/Scripts/Flags.cs"),
        "#define ALPHA\n#if BETA || GAMMA\n#endif\n[Conditional(\"DELTA\")]\nvoid Log() {}\n",
    )
    .unwrap();
}

#[test]
fn init_project_uses_default_root_when_not_provided() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();

    cargo_bin_cmd!("dll-forge")
        .current_dir(root)
        .arg("init-project")
        .arg("--name")
        .arg("TestProject")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized dll-forge project"));

    let layout = ProjectLayout::new(root);
    assert!(
        layout.project_config_path.exists(),
        "project config should exist at {}",
        layout.project_config_path.display()
    );
}

#[test]
fn project_info_fails_when_config_missing() {
    let dir = tempdir().expect("tempdir");
    cargo_bin_cmd!("dll-forge")
        .arg("project-info")
        .arg("--root")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read project config"));
}

#[test]
fn folder_scan_and_dry_run_build_end_to_end() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    write_fixture(root);

    cargo_bin_cmd!("dll-forge").arg("init-project").arg("--root").arg(root).assert().success();
    cargo_bin_cmd!("dll-forge")
        .arg("add-folder")
        .arg("--root")
        .arg(root)
        .arg("--path")
        .arg("Assets/Scripts")
        .assert()
        .success()
        .stdout(predicate::str::contains("New sources: 1"));

    cargo_bin_cmd!("dll-forge")
        .arg("scan")
        .arg("--root")
        .arg(root)
        .assert()
        .success()
        .stdout(predicate::str::contains("ALPHA;BETA;DELTA;GAMMA"));

    cargo_bin_cmd!("dll-forge")
        .arg("build")
        .arg("--root")
        .arg(root)
        .arg("--backend")
        .arg("dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("DLL compiled successfully"));

    let config = load_project_config(&ProjectLayout::new(root)).unwrap();
    assert_eq!(config.session.sources.len(), 1);
    assert_eq!(config.session.symbols.to_delimited(), "ALPHA;BETA;DELTA;GAMMA");
    assert!(ProjectLayout::new(root).refresh_stamp_path.is_file());
}

#[test]
fn failed_build_exits_non_zero_with_diagnostics() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    write_fixture(root);

    cargo_bin_cmd!("dll-forge").arg("init-project").arg("--root").arg(root).assert().success();
    cargo_bin_cmd!("dll-forge")
        .args(["add-folder", "--path", "Assets/Scripts", "--root"])
        .arg(root)
        .assert()
        .success();
    fs::remove_file(root.join("Assets/Scripts/Flags.cs")).unwrap();

    cargo_bin_cmd!("dll-forge")
        .args(["build", "--backend", "dry-run", "--skip-scan", "--root"])
        .arg(root)
        .assert()
        .failure()
        .stdout(predicate::str::contains("CS2001"))
        .stderr(predicate::str::contains("Build failed with 1 diagnostic(s)"));
}

#[test]
fn set_symbols_then_list_inputs_json() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();

    cargo_bin_cmd!("dll-forge").arg("init-project").arg("--root").arg(root).assert().success();
    cargo_bin_cmd!("dll-forge")
        .args(["set-symbols", "--symbols", "B;A;B", "--root"])
        .arg(root)
        .assert()
        .success();

    let output = cargo_bin_cmd!("dll-forge")
        .args(["list-inputs", "--json", "--root"])
        .arg(root)
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["symbols"], "A;B");
    assert_eq!(parsed["output_name"], "CompiledScripts.dll");
}

#[test]
fn build_manifest_runs_without_project() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    write_fixture(root);
    fs::write(
        root.join("build.yaml"),
        "output_name: Manifest.dll\nfolders: [Assets/Scripts]\nbackend: dry-run\n",
    )
    .unwrap();

    cargo_bin_cmd!("dll-forge")
        .arg("build-manifest")
        .arg("--manifest")
        .arg(root.join("build.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Symbols: ALPHA;BETA;DELTA;GAMMA"))
        .stdout(predicate::str::contains("Manifest.dll"));

    assert!(!ProjectLayout::new(root).project_config_path.exists());
}

#[test]
fn list_backends_includes_dry_run() {
    cargo_bin_cmd!("dll-forge")
        .arg("list-backends")
        .assert()
        .success()
        .stdout(predicate::str::contains("dry-run"));
}
