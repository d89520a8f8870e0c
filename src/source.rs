//! Per-file analysis context.
//!
//! `YamlSourceCode` wraps a file handle, decides once at construction whether
//! the file is valid YAML, and collects every issue rule checks report on it.
//!
//! Two things are easy to get wrong when consuming it:
//! - the syntax error found at construction lives only in the dedicated slot,
//!   it is not part of `issues()`;
//! - that syntax error has no rule key; callers substitute one themselves.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::SourceError;
use crate::issue::Issue;
use crate::syntax::SyntaxChecker;

/// A readable text file.
pub trait SourceFile: Send + Sync {
    /// Stable identifier used in diagnostics.
    fn uri(&self) -> &str;

    /// Read the whole file. Each call performs a fresh read.
    fn contents(&self) -> std::io::Result<String>;
}

/// A file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsSourceFile {
    path: PathBuf,
    uri: String,
}

impl FsSourceFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let uri = path.to_string_lossy().to_string();
        Self { path, uri }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SourceFile for FsSourceFile {
    fn uri(&self) -> &str {
        &self.uri
    }

    fn contents(&self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.path)
    }
}

/// Analysis state of a single YAML file.
pub struct YamlSourceCode<'a> {
    file: &'a dyn SourceFile,
    syntax_error: Option<Issue>,
    issues: Vec<Issue>,
}

impl<'a> YamlSourceCode<'a> {
    /// Load `file` and check its syntax.
    ///
    /// Fails if the content cannot be read. A syntax problem is not a
    /// failure: it is recorded and reported by `syntax_error()`.
    pub fn new(file: &'a dyn SourceFile, checker: &dyn SyntaxChecker) -> Result<Self, SourceError> {
        let mut source = Self {
            file,
            syntax_error: None,
            issues: Vec::new(),
        };

        let content = source.content()?;
        source.syntax_error = checker.syntax_error(&content).map(Issue::syntax);

        Ok(source)
    }

    pub fn file(&self) -> &'a dyn SourceFile {
        self.file
    }

    /// Re-read the file content.
    pub fn content(&self) -> Result<String, SourceError> {
        self.file
            .contents()
            .map_err(|e| SourceError::read(self.file.uri(), e))
    }

    /// Record an issue.
    ///
    /// The first syntax-flagged issue also fills the syntax error slot if it
    /// is still empty. An existing syntax error is never replaced.
    pub fn add_issue(&mut self, issue: Issue) {
        if issue.is_syntax_error() && self.syntax_error.is_none() {
            self.syntax_error = Some(issue.clone());
        }
        self.issues.push(issue);
    }

    /// The syntax error, if any. It may carry no rule key.
    pub fn syntax_error(&self) -> Option<&Issue> {
        self.syntax_error.as_ref()
    }

    pub fn has_valid_syntax(&self) -> bool {
        self.syntax_error.is_none()
    }

    /// Issues added so far, in insertion order.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_parts(self) -> (Option<Issue>, Vec<Issue>) {
        (self.syntax_error, self.issues)
    }
}

impl std::fmt::Debug for YamlSourceCode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YamlSourceCode")
            .field("file", &self.file.uri())
            .field("syntax_error", &self.syntax_error)
            .field("issues", &self.issues)
            .finish()
    }
}

/// A `YamlSourceCode` shared between concurrently running checks.
///
/// The issue list and the syntax error slot are updated under one lock, so
/// insertion order and first-wins hold across threads.
pub struct SharedSourceCode<'a> {
    inner: Mutex<YamlSourceCode<'a>>,
}

impl<'a> SharedSourceCode<'a> {
    pub fn new(source: YamlSourceCode<'a>) -> Self {
        Self {
            inner: Mutex::new(source),
        }
    }

    fn lock(&self) -> MutexGuard<'_, YamlSourceCode<'a>> {
        // A panicking check cannot leave the state half-written: add_issue
        // fills the slot before the push.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn file(&self) -> &'a dyn SourceFile {
        self.lock().file()
    }

    pub fn content(&self) -> Result<String, SourceError> {
        let file = self.file();
        file.contents().map_err(|e| SourceError::read(file.uri(), e))
    }

    pub fn add_issue(&self, issue: Issue) {
        self.lock().add_issue(issue);
    }

    pub fn syntax_error(&self) -> Option<Issue> {
        self.lock().syntax_error().cloned()
    }

    pub fn has_valid_syntax(&self) -> bool {
        self.lock().has_valid_syntax()
    }

    /// Snapshot of the issues added so far.
    pub fn issues(&self) -> Vec<Issue> {
        self.lock().issues().to_vec()
    }

    pub fn into_inner(self) -> YamlSourceCode<'a> {
        self.inner
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
