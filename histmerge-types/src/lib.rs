use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

pub mod policy;
pub mod record;
pub use policy::{ErrorPolicy, ValidationMode};
pub use record::Record;

/// Reasons a logical history line could not be turned into a [`Record`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line does not match ': <timestamp>:<duration>;<command>'")]
    Grammar,

    #[error("missing ';' between metadata and command")]
    MissingDelimiter,

    #[error("invalid metadata '{0}'")]
    BadShape(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(#[source] ParseIntError),

    #[error("invalid duration: {0}")]
    InvalidDuration(#[source] ParseIntError),
}

/// histmerge specific error types
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("failed to read {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record in {}: '{line}': {source}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: String,
        #[source]
        source: ParseError,
    },

    #[error("failed to write merged history: {0}")]
    Output(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(
        "{} errors:{}",
        .0.len(),
        .0.iter().map(|err| format!("\n  - {err}")).collect::<String>()
    )]
    Aggregate(Vec<MergeError>),
}

impl MergeError {
    /// Combine several errors into one, flattening nested aggregates.
    ///
    /// A single error is returned as is.
    pub fn aggregate(errors: Vec<MergeError>) -> MergeError {
        let mut flat = Vec::with_capacity(errors.len());
        for err in errors {
            match err {
                MergeError::Aggregate(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            MergeError::Aggregate(flat)
        }
    }

    /// Number of underlying failures.
    pub fn count(&self) -> usize {
        match self {
            MergeError::Aggregate(inner) => inner.iter().map(MergeError::count).sum(),
            _ => 1,
        }
    }
}

pub type MergeResult<T> = std::result::Result<T, MergeError>;
