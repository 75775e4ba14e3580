use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while collecting raw policy documents
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IAM client error: {0}")]
    Iam(String),
    #[error("Policy document error: {0}")]
    Decode(String),
    #[error("Invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("Failed to read policy file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type SourceResult<T> = Result<T, SourceError>;
