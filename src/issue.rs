//! Issue records reported against a YAML source file.

use serde::{Deserialize, Serialize};

use crate::syntax::LintProblem;

/// Severity levels for issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// Position of an issue in a file.
///
/// Lines and columns are 1-based. Zero means the position is unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.line, self.column) {
            (0, _) => Ok(()),
            (line, 0) => write!(f, "{}", line),
            (line, column) => write!(f, "{}:{}", line, column),
        }
    }
}

/// A single problem found in a YAML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Key of the rule that reported the issue. `None` for the syntax error
    /// found while loading the file, which precedes any rule.
    pub rule: Option<String>,
    pub message: String,
    pub location: Location,
    pub severity: Severity,
    #[serde(default)]
    pub syntax_error: bool,
}

impl Issue {
    /// Create a rule issue. It is not a syntax error.
    pub fn new(
        rule: impl Into<String>,
        message: impl Into<String>,
        location: Location,
        severity: Severity,
    ) -> Self {
        Self {
            rule: Some(rule.into()),
            message: message.into(),
            location,
            severity,
            syntax_error: false,
        }
    }

    /// Wrap a problem reported by a syntax checker.
    ///
    /// The resulting issue has no rule key.
    pub fn syntax(problem: LintProblem) -> Self {
        Self {
            rule: None,
            message: problem.message,
            location: Location::new(problem.line, problem.column),
            severity: Severity::Error,
            syntax_error: true,
        }
    }

    /// Flag this issue as a syntax error.
    pub fn as_syntax_error(mut self) -> Self {
        self.syntax_error = true;
        self
    }

    pub fn is_syntax_error(&self) -> bool {
        self.syntax_error
    }

    pub fn rule_key(&self) -> Option<&str> {
        self.rule.as_deref()
    }

    /// Fill in `rule` when the issue has none.
    pub fn with_rule_if_missing(mut self, rule: &str) -> Self {
        if self.rule.is_none() {
            self.rule = Some(rule.to_string());
        }
        self
    }
}
