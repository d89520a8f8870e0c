//! Integration tests for the full lint pipeline.
//!
//! These tests run the runner against the testdata fixtures with a small
//! line-based check registered next to the built-in parsing-error check.

use std::path::PathBuf;

use yamlcheck::check::{LintResult, Runner};
use yamlcheck::report;
use yamlcheck::{
    Config, Issue, Location, RuleCheck, Severity, YamlSourceCode, PARSING_ERROR_RULE_KEY,
};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata/yaml")
}

struct TrailingSpaces;

impl RuleCheck for TrailingSpaces {
    fn key(&self) -> &'static str {
        "trailing-spaces"
    }

    fn check(&self, source: &mut YamlSourceCode<'_>) -> anyhow::Result<()> {
        let content = source.content()?;
        for (idx, line) in content.lines().enumerate() {
            if line.ends_with(' ') {
                source.add_issue(Issue::new(
                    self.key(),
                    "trailing spaces",
                    Location::new(idx + 1, line.trim_end().len() + 1),
                    Severity::Error,
                ));
            }
        }
        Ok(())
    }
}

fn fixture_files() -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(testdata_path())
        .expect("should read testdata dir")
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.file_name().map(|n| n != "yamlcheck.yaml").unwrap_or(false))
        .collect();
    files.sort();
    files
}

fn run_lint() -> (LintResult, Config) {
    let config = Config::parse_file(testdata_path().join("yamlcheck.yaml")).expect("should parse config");
    let runner = Runner::new()
        .with_check(Box::new(TrailingSpaces))
        .config(config.clone());
    (runner.run(&fixture_files()), config)
}

fn report_named<'a>(result: &'a LintResult, name: &str) -> &'a yamlcheck::FileReport {
    let path = testdata_path().join(name);
    result
        .report_for(&path.to_string_lossy())
        .unwrap_or_else(|| panic!("no report for {}", name))
}

#[test]
fn test_lint_reports_every_fixture() {
    let (result, _) = run_lint();
    assert_eq!(result.scanned(), 4);
    assert!(result.unreadable.is_empty());
    assert!(result.errors.is_empty());
    assert_eq!(result.invalid_file_count(), 1);
}

#[test]
fn test_lint_syntax_error_reported_once() {
    let (result, _) = run_lint();
    let report = report_named(&result, "unterminated.yaml");

    assert!(!report.valid_syntax);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].rule_key(), Some(PARSING_ERROR_RULE_KEY));
    assert_eq!(report.issues[0].severity, Severity::Error);
}

#[test]
fn test_lint_suppressions_and_overrides() {
    let (result, config) = run_lint();
    let report = report_named(&result, "suppressed.yaml");

    assert!(report.valid_syntax);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].location.line, 4);
    assert_eq!(report.issues[0].severity, Severity::Warning);
    assert_eq!(report.suppressed.len(), 1);
    assert_eq!(report.suppressed[0].suppression.reason, "Kept for diff noise");

    // The parsing error still fails the run at the configured threshold.
    assert!(result.has_failures(config.fail_on));
}

#[test]
fn test_lint_clean_files() {
    let (result, _) = run_lint();
    assert!(report_named(&result, "valid.yaml").issues.is_empty());
    assert!(report_named(&result, "multi-document.yaml").issues.is_empty());
}

#[test]
fn test_json_report_from_fixtures() {
    let (result, config) = run_lint();
    let passed = !result.has_failures(config.fail_on);
    let mut out = Vec::new();
    report::write_json(&mut out, "testdata/yaml", &result, passed).unwrap();

    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["passed"], false);
    assert_eq!(json["files_scanned"], 4);
    assert_eq!(json["invalid_files"], 1);
    assert_eq!(json["suppressed_count"], 1);

    let rules: Vec<&str> = json["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["rule"].as_str().unwrap())
        .collect();
    assert_eq!(rules, vec!["trailing-spaces", PARSING_ERROR_RULE_KEY]);
}
