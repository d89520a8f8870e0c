//! yamlcheck - YAML lint pipeline.
//!
//! Every linted file gets a `YamlSourceCode` context. The context decides
//! once, when it is built, whether the file is valid YAML, and then collects
//! the issues rule checks report on it.
//!
//! # Architecture
//!
//! - `source`: the per-file context and the `SourceFile` handle trait
//! - `syntax`: syntax checkers (`serde_yaml` backed by default)
//! - `issue`: issue records, severities and locations
//! - `check`: the `RuleCheck` trait and the `Runner` orchestrating files
//! - `suppress`: inline `# yamlcheck:ignore` directives
//! - `config`: YAML configuration file
//! - `report`: Output formatting (pretty, JSON, SARIF)

pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod issue;
pub mod report;
pub mod source;
pub mod suppress;
pub mod syntax;

pub use check::{
    FileReport, LintResult, ParsingErrorCheck, RuleCheck, Runner, PARSING_ERROR_RULE_KEY,
};
pub use config::Config;
pub use error::{ConfigError, SourceError};
pub use issue::{Issue, Location, Severity};
pub use source::{FsSourceFile, SharedSourceCode, SourceFile, YamlSourceCode};
pub use syntax::{LintProblem, SyntaxChecker, YamlSyntaxChecker};
