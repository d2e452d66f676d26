use std::fs;
use std::path::Path;

use dll_forge::{canonicalize_or_current, infer_project_name, resolve_input_path, sha256_file};
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_resolves_existing_relative_path() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("nested");
    fs::create_dir_all(&subdir).expect("create nested");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let result = canonicalize_or_current("nested").expect("canonicalize nested");
    assert_eq!(result, subdir.canonicalize().expect("canonicalize subdir"));

    std::env::set_current_dir(original).expect("restore cwd");
}

#[test]
fn infer_project_name_uses_last_path_component() {
    assert_eq!(infer_project_name(Path::new("/work/MyUnityGame")), "MyUnityGame");
    assert_eq!(infer_project_name(Path::new("/")), "unnamed-project");
}

#[test]
fn resolve_input_path_keeps_absolute_and_joins_relative() {
    let root = Path::new("/project");
    assert_eq!(resolve_input_path(root, "Assets/Scripts"), Path::new("/project/Assets/Scripts"));
    assert_eq!(resolve_input_path(root, "/abs/Lib.dll"), Path::new("/abs/Lib.dll"));
}

#[test]
fn sha256_file_matches_known_hash() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("abc.bin");
    fs::write(&file, b"abc").unwrap();
    assert_eq!(
        sha256_file(&file).unwrap(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}
