//! Error types.

use thiserror::Error;

/// Failure to access the content of a source file.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read {uri}: {source}")]
    Read {
        uri: String,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    pub fn read(uri: impl Into<String>, source: std::io::Error) -> Self {
        SourceError::Read {
            uri: uri.into(),
            source,
        }
    }

    /// The underlying I/O error kind.
    pub fn kind(&self) -> std::io::ErrorKind {
        match self {
            SourceError::Read { source, .. } => source.kind(),
        }
    }
}

/// Invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid excluded_paths pattern {pattern:?}: {source}")]
    ExcludedPath {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("rule keys must not be empty")]
    EmptyRuleKey,

    #[error("invalid extension {0:?}: extensions are given without a leading dot")]
    Extension(String),
}
