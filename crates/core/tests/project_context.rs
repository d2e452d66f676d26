use forge_core::project::{
    find_netstandard, load_project_config, resolve_backend_name, save_project_config,
    ProjectConfig, ProjectContext, ProjectLayout, DEFAULT_OUTPUT_DIR,
};
use forge_core::session::BuildSession;

#[test]
fn layout_paths_live_under_meta_dir() {
    let root = tempfile::tempdir().unwrap();
    let layout = ProjectLayout::new(root.path());
    assert!(layout.project_config_path.ends_with(".dll-forge/project.json"));
    assert!(layout.refresh_stamp_path.ends_with(".dll-forge/last_build.json"));
    assert_eq!(layout.resolve("Assets"), root.path().join("Assets"));
    assert_eq!(layout.relative_display(&root.path().join("Assets/X.dll")), "Assets/X.dll");
}

#[test]
fn project_context_loads_and_saves_config() {
    let temp = tempfile::tempdir().unwrap();
    let layout = ProjectLayout::new(temp.path());
    let session = BuildSession::new().with_output_name("Ctx.dll");
    save_project_config(&layout, &ProjectConfig::new("CtxProject").with_session(session)).unwrap();

    let mut ctx = ProjectContext::from_root(temp.path()).expect("context");
    assert_eq!(ctx.config.name, "CtxProject");
    assert_eq!(ctx.config.session.output_name, "Ctx.dll");
    assert_eq!(ctx.output_dir(), temp.path().join(DEFAULT_OUTPUT_DIR));

    ctx.config.output_dir = "Build/Plugins".into();
    ctx.save().unwrap();
    let reloaded = load_project_config(&layout).unwrap();
    assert_eq!(reloaded.output_dir, "Build/Plugins");
}

#[test]
fn missing_config_reports_path() {
    let temp = tempfile::tempdir().unwrap();
    let err = ProjectContext::from_root(temp.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to read project config"), "unexpected error: {err}");
}

#[test]
fn corrupt_config_reports_parse_failure() {
    let temp = tempfile::tempdir().unwrap();
    let layout = ProjectLayout::new(temp.path());
    std::fs::create_dir_all(&layout.meta_dir).unwrap();
    std::fs::write(&layout.project_config_path, "not-json").unwrap();
    let err = load_project_config(&layout).unwrap_err();
    assert!(err.to_string().contains("Failed to parse project config JSON"));
}

#[test]
fn minimal_config_fills_defaults() {
    let config: ProjectConfig =
        serde_json::from_str(r#"{"name":"Min","config_version":"0.1.0"}"#).unwrap();
    assert_eq!(config.source_extension, "cs");
    assert_eq!(config.output_dir, DEFAULT_OUTPUT_DIR);
    assert_eq!(config.session, BuildSession::default());
}

#[test]
fn netstandard_is_found_only_when_present() {
    let temp = tempfile::tempdir().unwrap();
    assert!(find_netstandard(temp.path()).is_none());
    std::fs::write(temp.path().join("netstandard.dll"), b"facade").unwrap();
    assert_eq!(find_netstandard(temp.path()), Some(temp.path().join("netstandard.dll")));
}

#[test]
fn backend_name_precedence() {
    let mut config = ProjectConfig::new("Pick");
    assert_eq!(resolve_backend_name(Some("dry-run"), Some(&config)), "dry-run");
    config.default_backend = Some("custom".into());
    assert_eq!(resolve_backend_name(None, Some(&config)), "custom");
    assert_eq!(resolve_backend_name(Some("csc"), Some(&config)), "csc");
    assert!(!resolve_backend_name(None, None).is_empty());
}
