//! Error types for combining, aligning and rendering policies

use std::fmt;
use thiserror::Error;

/// Which of the two compared policies a statement came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Old,
    New,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Old => f.write_str("old"),
            Self::New => f.write_str("new"),
        }
    }
}

/// Errors that make statement alignment meaningless for a comparison run.
#[derive(Error, Debug)]
pub enum AlignError {
    /// The statement has no `Resource` value to take a service name from.
    #[error("statement {index} of the {side} policy has no Resource to derive its service from")]
    MissingResource { side: Side, index: usize },

    /// The first resource has fewer than three colon-delimited segments.
    #[error("malformed resource identifier '{resource}' in statement {index} of the {side} policy")]
    MalformedResourceIdentifier {
        side: Side,
        index: usize,
        resource: String,
    },

    #[error("failed to serialize statement: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while writing a report.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to write diff output: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by a full comparison (alignment followed by rendering).
#[derive(Error, Debug)]
pub enum CompareError {
    #[error(transparent)]
    Align(#[from] AlignError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type AlignResult<T> = Result<T, AlignError>;
