//! Inline suppression of issues via YAML comments.
//!
//! Supports suppression comments like:
//! - `# yamlcheck:ignore <rule> - <reason>`
//! - `# yamlcheck:ignore-next-line <rule> - <reason>`
//! - `# yamlcheck:ignore-file <rule> - <reason>`
//!
//! `<rule>` may be `*` to match every rule. Syntax errors cannot be suppressed.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::issue::Issue;

/// How a suppression applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuppressionType {
    /// Applies to the same line
    Line,
    /// Applies to the next line
    NextLine,
    /// Applies to the entire file
    File,
}

/// An inline suppression directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suppression {
    /// Rule to suppress (e.g., "trailing-spaces") or "*" for all
    pub rule: String,
    /// Human-readable reason
    pub reason: String,
    /// Line number (0 for file-level)
    pub line: usize,
    /// How the suppression applies
    pub suppression_type: SuppressionType,
}

/// An issue that was suppressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuppressedIssue {
    pub issue: Issue,
    pub suppression: Suppression,
}

lazy_static::lazy_static! {
    static ref SUPPRESSION_PATTERN: Regex =
        Regex::new(r"#\s*yamlcheck:(ignore(?:-file|-next-line)?)\s+(\S+)\s*(?:-\s*(.*))?").unwrap();
}

/// Parse suppression directives from file content.
pub fn parse_suppressions(content: &str) -> Vec<Suppression> {
    let mut suppressions = Vec::new();
    let mut in_header = true;

    for (line_num, line) in content.lines().enumerate() {
        let line_number = line_num + 1;
        let trimmed = line.trim();

        if in_header && !(trimmed.is_empty() || trimmed.starts_with('#')) {
            in_header = false;
        }

        let Some(caps) = SUPPRESSION_PATTERN.captures(line) else {
            continue;
        };
        let directive = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let rule = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let reason = caps
            .get(3)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        let suppression_type = match directive {
            // File-level suppressions must be in the leading comment block
            "ignore-file" if in_header => SuppressionType::File,
            "ignore-file" => continue,
            "ignore-next-line" => SuppressionType::NextLine,
            "ignore" => {
                let directive_start = caps.get(0).map(|m| m.start()).unwrap_or(0);
                if line[..directive_start].trim().is_empty() {
                    SuppressionType::NextLine
                } else {
                    SuppressionType::Line
                }
            }
            _ => continue,
        };

        suppressions.push(Suppression {
            rule: rule.to_string(),
            reason,
            line: if suppression_type == SuppressionType::File {
                0
            } else {
                line_number
            },
            suppression_type,
        });
    }

    suppressions
}

/// Check if an issue matches a suppression.
pub fn matches_suppression(issue: &Issue, suppression: &Suppression) -> bool {
    if issue.is_syntax_error() {
        return false;
    }

    if suppression.rule != "*" && issue.rule_key() != Some(suppression.rule.as_str()) {
        return false;
    }

    match suppression.suppression_type {
        SuppressionType::File => true,
        SuppressionType::Line => issue.location.line == suppression.line,
        SuppressionType::NextLine => issue.location.line == suppression.line + 1,
    }
}

/// Separate issues into active and suppressed, keeping their order.
pub fn filter_suppressed(
    issues: Vec<Issue>,
    suppressions: &[Suppression],
) -> (Vec<Issue>, Vec<SuppressedIssue>) {
    let mut active = Vec::new();
    let mut suppressed = Vec::new();

    for issue in issues {
        match suppressions.iter().find(|s| matches_suppression(&issue, s)) {
            Some(suppression) => suppressed.push(SuppressedIssue {
                issue,
                suppression: suppression.clone(),
            }),
            None => active.push(issue),
        }
    }

    (active, suppressed)
}
