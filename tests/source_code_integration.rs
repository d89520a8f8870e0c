//! Integration tests for the per-file analysis context.
//!
//! These tests drive `YamlSourceCode` the way an orchestrator does: build it
//! from a file, let checks add issues, read the final state back.

use std::path::PathBuf;

use tempfile::TempDir;
use yamlcheck::{
    FsSourceFile, Issue, Location, Severity, SourceFile, YamlSourceCode, YamlSyntaxChecker,
};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata/yaml")
}

fn rule_issue(rule: &str, line: usize) -> Issue {
    Issue::new(rule, format!("{} issue", rule), Location::new(line, 1), Severity::Warning)
}

#[test]
fn test_valid_file_scenario() {
    let file = FsSourceFile::new(testdata_path().join("valid.yaml"));
    let mut source = YamlSourceCode::new(&file, &YamlSyntaxChecker).expect("should load");

    assert!(source.has_valid_syntax());
    assert!(source.syntax_error().is_none());

    source.add_issue(rule_issue("indentation", 1));
    source.add_issue(rule_issue("trailing-spaces", 2));

    let rules: Vec<_> = source.issues().iter().map(|i| i.rule_key()).collect();
    assert_eq!(rules, vec![Some("indentation"), Some("trailing-spaces")]);
    assert!(source.has_valid_syntax());
    assert!(source.syntax_error().is_none());
}

#[test]
fn test_unterminated_flow_sequence_scenario() {
    let file = FsSourceFile::new(testdata_path().join("unterminated.yaml"));
    let source = YamlSourceCode::new(&file, &YamlSyntaxChecker).expect("should load");

    assert!(!source.has_valid_syntax());
    assert!(source.issues().is_empty());

    let error = source.syntax_error().expect("syntax error expected");
    assert!(error.is_syntax_error());
    assert!(error.rule_key().is_none());
    assert!(error.location.line > 0);
}

#[test]
fn test_multi_document_file_is_valid() {
    let file = FsSourceFile::new(testdata_path().join("multi-document.yaml"));
    let source = YamlSourceCode::new(&file, &YamlSyntaxChecker).expect("should load");
    assert!(source.has_valid_syntax());
}

#[test]
fn test_missing_file_fails_construction() {
    let file = FsSourceFile::new(testdata_path().join("does-not-exist.yaml"));
    let err = YamlSourceCode::new(&file, &YamlSyntaxChecker).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn test_first_syntax_issue_wins_after_construction() {
    let file = FsSourceFile::new(testdata_path().join("valid.yaml"));
    let mut source = YamlSourceCode::new(&file, &YamlSyntaxChecker).expect("should load");

    let a = rule_issue("key-duplicates", 1).as_syntax_error();
    let b = rule_issue("key-duplicates", 2).as_syntax_error();
    source.add_issue(a.clone());
    source.add_issue(b);

    assert_eq!(source.syntax_error(), Some(&a));
    assert_eq!(source.issues().len(), 2);
}

#[test]
fn test_content_survives_until_file_removed() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("app.yaml");
    std::fs::write(&path, "a: 1\nb: 2\n").unwrap();

    let file = FsSourceFile::new(&path);
    let mut source = YamlSourceCode::new(&file, &YamlSyntaxChecker).expect("should load");
    source.add_issue(rule_issue("document-start", 1));

    let first = source.content().unwrap();
    let second = source.content().unwrap();
    assert_eq!(first, second);

    std::fs::remove_file(&path).unwrap();
    let err = source.content().unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);

    assert_eq!(source.issues().len(), 1);
    assert_eq!(source.file().uri(), path.to_string_lossy());
}
