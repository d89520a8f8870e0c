//! Rule checks and the runner that drives them.

mod runner;

pub use runner::{FileReport, LintResult, Runner, RunnerError, UnreadableFile};

use crate::source::YamlSourceCode;

/// Rule key reported for syntax errors.
pub const PARSING_ERROR_RULE_KEY: &str = "parsing-error";

/// An analysis pass over one YAML file.
///
/// Checks report what they find through `YamlSourceCode::add_issue`.
pub trait RuleCheck: Send + Sync {
    /// Rule key, e.g. "indentation".
    fn key(&self) -> &'static str;

    /// Whether the check only makes sense on syntactically valid files.
    fn requires_valid_syntax(&self) -> bool {
        true
    }

    fn check(&self, source: &mut YamlSourceCode<'_>) -> anyhow::Result<()>;
}

/// Reports the syntax error of a file as an issue.
///
/// The syntax error found while loading a file carries no rule key and is not
/// part of the issue list. This check adds it under `parsing-error`, unless a
/// syntax-flagged issue is already listed.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParsingErrorCheck;

impl RuleCheck for ParsingErrorCheck {
    fn key(&self) -> &'static str {
        PARSING_ERROR_RULE_KEY
    }

    fn requires_valid_syntax(&self) -> bool {
        false
    }

    fn check(&self, source: &mut YamlSourceCode<'_>) -> anyhow::Result<()> {
        let Some(error) = source.syntax_error() else {
            return Ok(());
        };
        if source.issues().iter().any(|i| i.is_syntax_error()) {
            return Ok(());
        }

        let issue = error.clone().with_rule_if_missing(PARSING_ERROR_RULE_KEY);
        source.add_issue(issue);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{Issue, Location, Severity};
    use crate::source::FsSourceFile;
    use crate::syntax::YamlSyntaxChecker;
    use tempfile::TempDir;

    #[test]
    fn test_parsing_error_check_reports_syntax_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.yaml");
        std::fs::write(&path, "a: [1, 2").unwrap();

        let file = FsSourceFile::new(&path);
        let mut source = YamlSourceCode::new(&file, &YamlSyntaxChecker).unwrap();
        ParsingErrorCheck.check(&mut source).unwrap();

        assert_eq!(source.issues().len(), 1);
        let issue = &source.issues()[0];
        assert!(issue.is_syntax_error());
        assert_eq!(issue.rule_key(), Some(PARSING_ERROR_RULE_KEY));

        // The slot keeps the original, rule-less issue.
        assert_eq!(source.syntax_error().unwrap().rule_key(), None);

        // Running again does not duplicate it.
        ParsingErrorCheck.check(&mut source).unwrap();
        assert_eq!(source.issues().len(), 1);
    }

    #[test]
    fn test_parsing_error_check_skips_listed_syntax_issue() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ok.yaml");
        std::fs::write(&path, "a: 1\n").unwrap();

        let file = FsSourceFile::new(&path);
        let mut source = YamlSourceCode::new(&file, &YamlSyntaxChecker).unwrap();
        ParsingErrorCheck.check(&mut source).unwrap();
        assert!(source.issues().is_empty());

        let reported = Issue::new("key-duplicates", "duplicated key", Location::new(1, 1), Severity::Error)
            .as_syntax_error();
        source.add_issue(reported);
        ParsingErrorCheck.check(&mut source).unwrap();
        assert_eq!(source.issues().len(), 1);
    }
}
