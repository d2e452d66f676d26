#![cfg(feature = "csc-backend")]

use std::ffi::OsString;
use std::path::PathBuf;

use forge_core::model::OutputKind;
use forge_core::services::backends::csc::{compiler_arguments, DiagnosticParser};
use forge_core::services::backends::CscBackend;
use forge_core::services::build::{BackendError, BuildDescriptor, CompilerBackend, Severity};

fn parse(output: &str) -> Vec<forge_core::services::build::Diagnostic> {
    DiagnosticParser::new().unwrap().parse(output)
}

#[test]
fn backend_parser_matches_standalone_parser() {
    let line = "Assets/Player.cs(12,8): error CS1002: ; expected";
    let backend = CscBackend::new(None).unwrap();
    assert_eq!(backend.parser().parse_line(line), parse(line).into_iter().next());
}

fn descriptor(dir: &std::path::Path) -> BuildDescriptor {
    BuildDescriptor {
        output_path: dir.join("Out").join("Game.dll"),
        references: vec![dir.join("UnityEngine.dll")],
        compiler_options: Some("/define:A;B".into()),
        sources: vec![dir.join("One.cs"), dir.join("Two.cs")],
        kind: OutputKind::Library,
    }
}

#[test]
fn arguments_follow_descriptor_order() {
    let dir = PathBuf::from("/proj");
    let args = compiler_arguments(&descriptor(&dir));
    let expected: Vec<OsString> = vec![
        "-nologo".into(),
        "-target:library".into(),
        "-out:/proj/Out/Game.dll".into(),
        "-r:/proj/UnityEngine.dll".into(),
        "/define:A;B".into(),
        "/proj/One.cs".into(),
        "/proj/Two.cs".into(),
    ];
    assert_eq!(args, expected);
}

#[test]
fn arguments_omit_options_when_absent() {
    let dir = PathBuf::from("/proj");
    let mut d = descriptor(&dir);
    d.compiler_options = None;
    d.kind = OutputKind::Executable;
    let args = compiler_arguments(&d);
    assert!(args.iter().all(|a| !a.to_string_lossy().starts_with("/define")));
    assert!(args.contains(&OsString::from("-target:exe")));
}

#[test]
fn parses_located_unlocated_and_tool_diagnostics() {
    let output = "\
Microsoft (R) Visual C# Compiler version 4.8.0
Assets/Player.cs(12,8): error CS1002: ; expected
Assets/Enemy.cs(3,1): warning CS0168: The variable 'x' is declared but never used
error CS2001: Source file 'Gone.cs' could not be found.
CSC : error CS5001: Program does not contain a static 'Main' method
Compilation failed: 3 error(s), 1 warnings
";
    let diagnostics = parse(output);
    assert_eq!(diagnostics.len(), 4);

    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert_eq!(diagnostics[0].file.as_deref(), Some(std::path::Path::new("Assets/Player.cs")));
    assert_eq!(diagnostics[0].line, Some(12));
    assert_eq!(diagnostics[0].column, Some(8));
    assert_eq!(diagnostics[0].code.as_deref(), Some("CS1002"));
    assert_eq!(diagnostics[0].message, "; expected");

    assert_eq!(diagnostics[1].severity, Severity::Warning);
    assert_eq!(diagnostics[2].file, None);
    assert_eq!(diagnostics[2].code.as_deref(), Some("CS2001"));
    assert_eq!(diagnostics[3].code.as_deref(), Some("CS5001"));
    assert_eq!(diagnostics[0].to_string(), "Assets/Player.cs(12,8): error CS1002: ; expected");
}

#[test]
fn parses_files_under_parenthesized_directories() {
    let output = "\
/work/Game (copy)/A.cs(3,5): error CS1002: ; expected
/work/Game/B.cs(4,1): error CS0103: The name 'x' does not exist in the current context
/work/Odd(1,2)Dir/C.cs(7,9): warning CS0168: unused
";
    let diagnostics = parse(output);
    assert_eq!(diagnostics.len(), 3);
    assert_eq!(diagnostics[0].file.as_deref(), Some(std::path::Path::new("/work/Game (copy)/A.cs")));
    assert_eq!((diagnostics[0].line, diagnostics[0].column), (Some(3), Some(5)));
    assert_eq!(diagnostics[1].file.as_deref(), Some(std::path::Path::new("/work/Game/B.cs")));
    assert_eq!(diagnostics[2].file.as_deref(), Some(std::path::Path::new("/work/Odd(1,2)Dir/C.cs")));
    assert_eq!((diagnostics[2].line, diagnostics[2].column), (Some(7), Some(9)));
    assert_eq!(diagnostics[2].severity, Severity::Warning);
}

#[test]
fn ignores_output_without_diagnostics() {
    assert!(parse("").is_empty());
    assert!(parse("Compilation succeeded - 0 warning(s)\n").is_empty());
}

#[test]
fn missing_configured_compiler_is_a_backend_error() {
    let temp = tempfile::tempdir().unwrap();
    let backend = CscBackend::new(Some(temp.path().join("no-csc"))).unwrap();
    let err = backend.compile(&descriptor(temp.path())).unwrap_err();
    assert!(matches!(err, BackendError::MissingCompiler(_)), "unexpected error: {err}");
}

#[cfg(unix)]
mod fake_compiler {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn script(dir: &std::path::Path, body: &str) -> PathBuf {
        let path = dir.join("fake-csc");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[test]
    fn compiler_errors_become_failure_diagnostics() {
        let temp = tempfile::tempdir().unwrap();
        let compiler = script(
            temp.path(),
            "echo 'One.cs(1,1): error CS1002: ; expected'\necho 'Two.cs(4,2): error CS0103: The name x does not exist'\nexit 1",
        );
        let backend = CscBackend::new(Some(compiler)).unwrap();
        let outcome = backend.compile(&descriptor(temp.path())).unwrap();
        assert!(outcome.has_errors);
        assert_eq!(outcome.diagnostics.len(), 2);
        assert!(temp.path().join("Out").is_dir(), "output directory is created");
    }

    #[test]
    fn silent_non_zero_exit_yields_synthetic_error() {
        let temp = tempfile::tempdir().unwrap();
        let compiler = script(temp.path(), "echo boom >&2\nexit 3");
        let outcome = CscBackend::new(Some(compiler)).unwrap().compile(&descriptor(temp.path())).unwrap();
        assert!(outcome.has_errors);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert!(outcome.diagnostics[0].message.contains("boom"));
    }

    #[test]
    fn unparsed_stdout_is_kept_in_synthetic_error() {
        let temp = tempfile::tempdir().unwrap();
        let compiler = script(temp.path(), "echo 'fatal: metadata file could not be opened'\nexit 1");
        let outcome = CscBackend::new(Some(compiler)).unwrap().compile(&descriptor(temp.path())).unwrap();
        assert!(outcome.has_errors);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert!(outcome.diagnostics[0].message.contains("metadata file could not be opened"));
    }

    #[test]
    fn clean_exit_with_warnings_is_success() {
        let temp = tempfile::tempdir().unwrap();
        let compiler = script(temp.path(), "echo 'One.cs(2,3): warning CS0168: unused'\nexit 0");
        let outcome = CscBackend::new(Some(compiler)).unwrap().compile(&descriptor(temp.path())).unwrap();
        assert!(!outcome.has_errors);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.output_path, temp.path().join("Out").join("Game.dll"));
    }
}
