//! Syntax checking for YAML content.
//!
//! A syntax checker looks at the full text of a file and reports the first
//! fatal parse failure, if any. The grammar itself lives in `serde_yaml`.

use regex::Regex;
use serde::de::IgnoredAny;
use serde::Deserialize;

/// A problem reported by a syntax checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintProblem {
    /// 1-based line, 0 when unknown.
    pub line: usize,
    /// 1-based column, 0 when unknown.
    pub column: usize,
    pub message: String,
}

impl LintProblem {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Detects the fatal syntax error of a YAML text.
pub trait SyntaxChecker: Send + Sync {
    /// Returns the first problem that prevents the text from being parsed.
    fn syntax_error(&self, text: &str) -> Option<LintProblem>;
}

impl<F> SyntaxChecker for F
where
    F: Fn(&str) -> Option<LintProblem> + Send + Sync,
{
    fn syntax_error(&self, text: &str) -> Option<LintProblem> {
        self(text)
    }
}

lazy_static::lazy_static! {
    static ref POSITION_SUFFIX: Regex = Regex::new(r" at line \d+ column \d+").unwrap();
}

/// Syntax checker backed by `serde_yaml`.
///
/// Every document of a multi-document stream is parsed; the first failure
/// wins. Documents are not built into values, so semantic problems such as
/// duplicate keys are left to rule checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlSyntaxChecker;

impl YamlSyntaxChecker {
    pub fn new() -> Self {
        Self
    }
}

impl SyntaxChecker for YamlSyntaxChecker {
    fn syntax_error(&self, text: &str) -> Option<LintProblem> {
        for document in serde_yaml::Deserializer::from_str(text) {
            if let Err(e) = IgnoredAny::deserialize(document) {
                return Some(problem_from_error(&e));
            }
        }
        None
    }
}

fn problem_from_error(err: &serde_yaml::Error) -> LintProblem {
    let (line, column) = err
        .location()
        .map(|loc| (loc.line(), loc.column()))
        .unwrap_or((0, 0));

    // The position is carried separately, drop it from the message.
    let message = POSITION_SUFFIX.replace_all(&err.to_string(), "").into_owned();
    LintProblem::new(line, column, format!("syntax error: {}", message))
}
