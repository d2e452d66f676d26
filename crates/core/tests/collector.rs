use std::fs;

use forge_core::collector::SourceCollector;
use forge_core::model::PathSet;
use tempfile::tempdir;

#[test]
fn collects_nested_sources_with_matching_extension() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("Runtime/Nested")).unwrap();
    fs::write(root.join("Root.cs"), "class Root {}").unwrap();
    fs::write(root.join("Runtime/Player.cs"), "class Player {}").unwrap();
    fs::write(root.join("Runtime/Nested/Deep.cs"), "class Deep {}").unwrap();
    fs::write(root.join("Runtime/readme.txt"), "not a source").unwrap();
    fs::write(root.join("Runtime/Player.cs.meta"), "meta").unwrap();

    let files = SourceCollector::default().collect(root);
    let names: Vec<_> =
        files.iter().map(|p| p.file_name().unwrap().to_string_lossy().to_string()).collect();
    assert_eq!(names.len(), 3, "unexpected files: {names:?}");
    assert!(names.contains(&"Root.cs".to_string()));
    assert!(names.contains(&"Player.cs".to_string()));
    assert!(names.contains(&"Deep.cs".to_string()));
    assert!(files.iter().all(|p| p.is_absolute()));
}

#[test]
fn collection_order_is_stable() {
    let dir = tempdir().unwrap();
    for name in ["b.cs", "a.cs", "c.cs"] {
        fs::write(dir.path().join(name), "").unwrap();
    }
    let collector = SourceCollector::new(".cs");
    let first = collector.collect(dir.path());
    let second = collector.collect(dir.path());
    assert_eq!(first, second);
    let names: Vec<_> =
        first.iter().map(|p| p.file_name().unwrap().to_string_lossy().to_string()).collect();
    assert_eq!(names, vec!["a.cs", "b.cs", "c.cs"]);
}

#[test]
fn missing_folder_yields_empty_result() {
    let dir = tempdir().unwrap();
    let files = SourceCollector::default().collect(&dir.path().join("does-not-exist"));
    assert!(files.is_empty());
}

#[test]
fn collect_into_skips_known_paths() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("One.cs"), "").unwrap();
    fs::write(dir.path().join("Two.cs"), "").unwrap();
    let collector = SourceCollector::default();

    let sources = collector.collect_into(PathSet::new(), dir.path());
    assert_eq!(sources.len(), 2);
    let sources = collector.collect_into(sources, dir.path());
    assert_eq!(sources.len(), 2);
}

#[test]
fn custom_extension_is_honored() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Shader.hlsl"), "").unwrap();
    fs::write(dir.path().join("Script.cs"), "").unwrap();
    let files = SourceCollector::new("hlsl").collect(dir.path());
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("Shader.hlsl"));
}

#[cfg(unix)]
#[test]
fn symlink_loops_do_not_hang_when_following_links() {
    let dir = tempdir().unwrap();
    let inner = dir.path().join("inner");
    fs::create_dir_all(&inner).unwrap();
    fs::write(inner.join("Loop.cs"), "").unwrap();
    std::os::unix::fs::symlink(dir.path(), inner.join("back")).unwrap();

    let files = SourceCollector::default().follow_links(true).collect(dir.path());
    assert_eq!(files.len(), 1);

    let files = SourceCollector::default().collect(dir.path());
    assert_eq!(files.len(), 1);
}
