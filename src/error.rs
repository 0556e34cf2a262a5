use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the vectorizer pipeline.
///
/// Below-threshold words, out-of-dictionary features and documents that match
/// no lexicon entry are silently skipped and never surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// No training document landed in the named polarity pool, so synthetic
    /// instances cannot be drawn from it.
    #[error("the {polarity} pool is empty: no training document matched the seed lexicon")]
    EmptyPool { polarity: &'static str },

    /// A column spec string was neither `first`, `last` nor a 1-based number.
    #[error("invalid column spec `{0}`: expected `first`, `last` or a 1-based index")]
    InvalidColumnSpec(String),

    /// A resolved column index fell outside the row.
    #[error("column {index} is out of range for a row with {width} fields")]
    ColumnOutOfRange { index: usize, width: usize },

    /// A lexicon or cluster file could not be read.
    #[error("failed to read resource {}: {source}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A lexicon or cluster file contained an unparseable line.
    #[error("malformed line {line} in {}", path.display())]
    MalformedResource { path: PathBuf, line: usize },

    /// Saving or loading a frozen model state failed.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_cbor::Error),
}
