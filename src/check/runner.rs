//! Lint runner that drives syntax detection and rule checks over files.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::issue::{Issue, Severity};
use crate::source::{FsSourceFile, SourceFile, YamlSourceCode};
use crate::suppress::{filter_suppressed, parse_suppressions, SuppressedIssue};
use crate::syntax::{SyntaxChecker, YamlSyntaxChecker};

use super::{ParsingErrorCheck, RuleCheck};

/// Issues found in one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,
    pub valid_syntax: bool,
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub suppressed: Vec<SuppressedIssue>,
}

/// A file whose content could not be read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadableFile {
    pub path: String,
    pub message: String,
}

/// A rule check that failed to run on a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerError {
    pub path: String,
    pub rule: String,
    pub message: String,
}

/// Results of a lint run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintResult {
    pub files: Vec<FileReport>,
    #[serde(default)]
    pub unreadable: Vec<UnreadableFile>,
    #[serde(default)]
    pub errors: Vec<RunnerError>,
}

impl LintResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files that were analyzed.
    pub fn scanned(&self) -> usize {
        self.files.len()
    }

    /// All active issues, file by file.
    pub fn issues(&self) -> impl Iterator<Item = (&str, &Issue)> {
        self.files
            .iter()
            .flat_map(|f| f.issues.iter().map(move |i| (f.path.as_str(), i)))
    }

    pub fn issue_count(&self) -> usize {
        self.files.iter().map(|f| f.issues.len()).sum()
    }

    pub fn suppressed_count(&self) -> usize {
        self.files.iter().map(|f| f.suppressed.len()).sum()
    }

    /// Number of files with a syntax error.
    pub fn invalid_file_count(&self) -> usize {
        self.files.iter().filter(|f| !f.valid_syntax).count()
    }

    /// Whether the run fails at the given severity threshold.
    ///
    /// Unreadable files and failed checks always fail the run.
    pub fn has_failures(&self, fail_on: Severity) -> bool {
        !self.unreadable.is_empty()
            || !self.errors.is_empty()
            || self.issues().any(|(_, i)| i.severity >= fail_on)
    }

    pub fn report_for(&self, path: &str) -> Option<&FileReport> {
        self.files.iter().find(|f| f.path == path)
    }
}

/// Outcome of analyzing a single file.
enum FileOutcome {
    Analyzed(FileReport, Vec<RunnerError>),
    Unreadable(UnreadableFile),
}

/// Runs the syntax checker and every enabled rule check over a set of files.
pub struct Runner {
    checker: Box<dyn SyntaxChecker>,
    checks: Vec<Box<dyn RuleCheck>>,
    config: Config,
    parallel: bool,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    /// Create a runner with the `serde_yaml` syntax checker and the
    /// parsing-error check.
    pub fn new() -> Self {
        Self {
            checker: Box::new(YamlSyntaxChecker),
            checks: vec![Box::new(ParsingErrorCheck)],
            config: Config::default(),
            parallel: false,
        }
    }

    /// Replace the syntax checker.
    pub fn syntax_checker<C: SyntaxChecker + 'static>(mut self, checker: C) -> Self {
        self.checker = Box::new(checker);
        self
    }

    /// Register a rule check. Checks run in registration order.
    pub fn with_check(mut self, check: Box<dyn RuleCheck>) -> Self {
        self.checks.push(check);
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Analyze files on the rayon thread pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Lint the given files.
    pub fn run(&self, files: &[PathBuf]) -> LintResult {
        let outcomes: Vec<FileOutcome> = if self.parallel {
            files.par_iter().map(|p| self.analyze_file(p)).collect()
        } else {
            files.iter().map(|p| self.analyze_file(p)).collect()
        };

        let mut result = LintResult::new();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Analyzed(report, errors) => {
                    result.files.push(report);
                    result.errors.extend(errors);
                }
                FileOutcome::Unreadable(file) => result.unreadable.push(file),
            }
        }

        // Sort by path for deterministic ordering
        result.files.sort_by(|a, b| a.path.cmp(&b.path));
        result.unreadable.sort_by(|a, b| a.path.cmp(&b.path));
        // Stable, so a file's errors keep check registration order
        result.errors.sort_by(|a, b| a.path.cmp(&b.path));

        result
    }

    fn analyze_file(&self, path: &Path) -> FileOutcome {
        let file = FsSourceFile::new(path);
        self.analyze(&file)
    }

    /// Analyze a single file handle.
    ///
    /// Checks that failed are returned next to the report, which then lacks
    /// their issues.
    pub fn analyze_source(
        &self,
        file: &dyn SourceFile,
    ) -> Result<(FileReport, Vec<RunnerError>), UnreadableFile> {
        match self.analyze(file) {
            FileOutcome::Analyzed(report, errors) => Ok((report, errors)),
            FileOutcome::Unreadable(unreadable) => Err(unreadable),
        }
    }

    fn analyze(&self, file: &dyn SourceFile) -> FileOutcome {
        let uri = file.uri().to_string();

        let mut source = match YamlSourceCode::new(file, self.checker.as_ref()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(uri = %uri, error = %e, "skipping unreadable file");
                return FileOutcome::Unreadable(UnreadableFile {
                    path: uri,
                    message: e.to_string(),
                });
            }
        };
        tracing::debug!(uri = %uri, syntax_error = !source.has_valid_syntax(), "checked syntax");

        let mut errors = Vec::new();
        for check in &self.checks {
            let key = check.key();
            if !self.config.is_rule_enabled(key) {
                continue;
            }
            if check.requires_valid_syntax() && !source.has_valid_syntax() {
                tracing::debug!(uri = %uri, rule = key, "skipping check on invalid file");
                continue;
            }
            if let Err(e) = check.check(&mut source) {
                tracing::warn!(uri = %uri, rule = key, error = %e, "check failed");
                errors.push(RunnerError {
                    path: uri.clone(),
                    rule: key.to_string(),
                    message: format!("{:#}", e),
                });
            }
        }

        let suppressions = match source.content() {
            Ok(content) => parse_suppressions(&content),
            Err(e) => {
                tracing::warn!(uri = %uri, error = %e, "cannot re-read file for suppressions");
                Vec::new()
            }
        };

        let valid_syntax = source.has_valid_syntax();
        let (_, issues) = source.into_parts();
        let issues: Vec<Issue> = issues
            .into_iter()
            .map(|issue| self.apply_severity(issue))
            .collect();

        let (issues, suppressed) = if suppressions.is_empty() {
            (issues, Vec::new())
        } else {
            filter_suppressed(issues, &suppressions)
        };

        tracing::debug!(
            uri = %uri,
            issues = issues.len(),
            suppressed = suppressed.len(),
            "analyzed file"
        );

        FileOutcome::Analyzed(
            FileReport {
                path: uri,
                valid_syntax,
                issues,
                suppressed,
            },
            errors,
        )
    }

    fn apply_severity(&self, mut issue: Issue) -> Issue {
        if let Some(severity) = issue.rule_key().and_then(|r| self.config.severity_for(r)) {
            issue.severity = severity;
        }
        issue
    }
}
