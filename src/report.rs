//! Output formatting for lint results.
//!
//! Supports three output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use colored::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use crate::check::{LintResult, PARSING_ERROR_RULE_KEY};
use crate::issue::{Issue, Severity};

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Pretty,
    Json,
    Sarif,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(Format::Pretty),
            "json" => Ok(Format::Json),
            "sarif" => Ok(Format::Sarif),
            _ => Err(format!(
                "invalid format {:?}, must be 'pretty', 'json', or 'sarif'",
                s
            )),
        }
    }
}

// =============================================================================
// JSON Format
// =============================================================================

#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub passed: bool,
    pub files_scanned: usize,
    pub invalid_files: usize,
    pub issues: Vec<JsonIssue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suppressed: Vec<JsonIssue>,
    pub suppressed_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unreadable: Vec<JsonFileError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonFileError>,
}

#[derive(Serialize, Deserialize)]
pub struct JsonIssue {
    pub rule: String,
    pub severity: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub syntax_error: bool,
}

#[derive(Serialize, Deserialize)]
pub struct JsonFileError {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    pub message: String,
}

/// Build the JSON report structure.
pub fn json_report(path: &str, result: &LintResult, passed: bool) -> JsonReport {
    let issues = result
        .issues()
        .map(|(file, issue)| issue_to_json(file, issue))
        .collect();

    let suppressed = result
        .files
        .iter()
        .flat_map(|f| f.suppressed.iter().map(move |s| issue_to_json(&f.path, &s.issue)))
        .collect();

    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        passed,
        files_scanned: result.scanned(),
        invalid_files: result.invalid_file_count(),
        issues,
        suppressed,
        suppressed_count: result.suppressed_count(),
        unreadable: result
            .unreadable
            .iter()
            .map(|u| JsonFileError {
                file: u.path.clone(),
                rule: None,
                message: u.message.clone(),
            })
            .collect(),
        errors: result
            .errors
            .iter()
            .map(|e| JsonFileError {
                file: e.path.clone(),
                rule: Some(e.rule.clone()),
                message: e.message.clone(),
            })
            .collect(),
    }
}

/// Write results in JSON format.
pub fn write_json<W: Write>(out: &mut W, path: &str, result: &LintResult, passed: bool) -> anyhow::Result<()> {
    let report = json_report(path, result, passed);
    let json = serde_json::to_string_pretty(&report)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

fn rule_of(issue: &Issue) -> &str {
    issue.rule_key().unwrap_or(PARSING_ERROR_RULE_KEY)
}

fn issue_to_json(file: &str, issue: &Issue) -> JsonIssue {
    JsonIssue {
        rule: rule_of(issue).to_string(),
        severity: issue.severity.to_string(),
        file: file.to_string(),
        line: issue.location.line,
        column: issue.location.column,
        message: issue.message.clone(),
        syntax_error: issue.is_syntax_error(),
    }
}

// =============================================================================
// SARIF Format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "yamlcheck";

#[derive(Serialize, Deserialize)]
pub struct SarifReport {
    pub version: String,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

#[derive(Serialize, Deserialize)]
pub struct SarifDriver {
    pub name: String,
    pub version: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRule {
    pub id: String,
    #[serde(rename = "shortDescription")]
    pub short_description: SarifMessage,
}

#[derive(Serialize, Deserialize)]
pub struct SarifResult {
    #[serde(rename = "ruleId")]
    pub rule_id: String,
    pub level: String,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Serialize, Deserialize)]
pub struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    pub artifact_location: SarifArtifact,
    pub region: SarifRegion,
}

#[derive(Serialize, Deserialize)]
pub struct SarifArtifact {
    pub uri: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRegion {
    #[serde(rename = "startLine")]
    pub start_line: usize,
    #[serde(rename = "startColumn", skip_serializing_if = "Option::is_none")]
    pub start_column: Option<usize>,
}

fn rule_description(rule_id: &str) -> String {
    match rule_id {
        PARSING_ERROR_RULE_KEY => "YAML content cannot be parsed".to_string(),
        other => format!("Reported by the {} rule", other),
    }
}

fn map_severity_to_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

fn make_relative_path(file_path: &str, base_path: &Path) -> String {
    if base_path.to_string_lossy().is_empty() {
        return file_path.to_string();
    }

    let file = Path::new(file_path);

    // If they're the same (single file scan), return just the filename
    if file == base_path {
        return file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.to_string());
    }

    file.strip_prefix(base_path)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|_| file_path.to_string())
}

/// Build the SARIF report structure.
pub fn sarif_report(base_path: &Path, result: &LintResult) -> SarifReport {
    let rule_ids: BTreeSet<&str> = result.issues().map(|(_, i)| rule_of(i)).collect();

    let rules = rule_ids
        .iter()
        .map(|id| SarifRule {
            id: id.to_string(),
            short_description: SarifMessage {
                text: rule_description(id),
            },
        })
        .collect();

    let results = result
        .issues()
        .map(|(file, issue)| SarifResult {
            rule_id: rule_of(issue).to_string(),
            level: map_severity_to_level(issue.severity).to_string(),
            message: SarifMessage {
                text: issue.message.clone(),
            },
            locations: vec![SarifLocation {
                physical_location: SarifPhysicalLocation {
                    artifact_location: SarifArtifact {
                        uri: make_relative_path(file, base_path),
                    },
                    region: SarifRegion {
                        start_line: issue.location.line.max(1),
                        start_column: (issue.location.column > 0).then_some(issue.location.column),
                    },
                },
            }],
        })
        .collect();

    SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results,
        }],
    }
}

/// Write results in SARIF format.
pub fn write_sarif<W: Write>(out: &mut W, base_path: &Path, result: &LintResult) -> anyhow::Result<()> {
    let report = sarif_report(base_path, result);
    let json = serde_json::to_string_pretty(&report)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty<W: Write>(
    out: &mut W,
    path: &str,
    result: &LintResult,
    passed: bool,
    show_suppressed: bool,
) -> anyhow::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {} v{}", "yamlcheck".cyan().bold(), env!("CARGO_PKG_VERSION"))?;
    writeln!(out)?;
    writeln!(out, "  {}{}", "Scanning: ".dimmed(), path)?;
    writeln!(out)?;

    for file in &result.files {
        if file.issues.is_empty() && (file.suppressed.is_empty() || !show_suppressed) {
            continue;
        }

        writeln!(out, "  {}", file.path.blue())?;
        for issue in &file.issues {
            writeln!(
                out,
                "    {} {:<8} {:<20} {}",
                severity_tag(issue.severity),
                issue.location.to_string().dimmed(),
                rule_of(issue).dimmed(),
                issue.message
            )?;
        }
        if show_suppressed {
            for s in &file.suppressed {
                let mut line = format!(
                    "    {} {:<8} {:<20} {}",
                    "SKIP ".dimmed(),
                    s.issue.location.to_string(),
                    rule_of(&s.issue),
                    s.issue.message
                );
                if !s.suppression.reason.is_empty() {
                    line.push_str(&format!(" (reason: {:?})", s.suppression.reason));
                }
                writeln!(out, "{}", line.dimmed())?;
            }
        }
        writeln!(out)?;
    }

    for u in &result.unreadable {
        writeln!(out, "  {} {}", "UNREADABLE".red(), u.message)?;
    }
    for e in &result.errors {
        writeln!(out, "  {} {} [{}]: {}", "CHECK FAILED".red(), e.path, e.rule, e.message)?;
    }
    if !result.unreadable.is_empty() || !result.errors.is_empty() {
        writeln!(out)?;
    }

    write!(
        out,
        "  {} files, {} issues, {} with syntax errors",
        result.scanned(),
        result.issue_count(),
        result.invalid_file_count()
    )?;
    let suppressed = result.suppressed_count();
    if suppressed > 0 {
        write!(out, "  {}", format!("({} suppressed)", suppressed).dimmed())?;
    }
    writeln!(out)?;

    if passed {
        writeln!(out, "  {}", "✓ PASS".green())?;
    } else {
        writeln!(out, "  {}", "✗ FAIL".red())?;
    }
    writeln!(out)?;
    Ok(())
}

fn severity_tag(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "ERROR".red(),
        Severity::Warning => "WARN ".yellow(),
        Severity::Info => "INFO ".blue(),
    }
}
