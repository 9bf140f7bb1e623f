//! Error types for ranking and the record store.

use thiserror::Error;

/// Errors that can occur while ranking candidates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RankError {
    /// Query record has no characters in any field
    #[error("invalid query: record has no text in any field")]
    InvalidQuery,

    /// Cancellation signal fired before ranking finished
    #[error("ranking cancelled")]
    Cancelled,

    /// A partition of the parallel ranker failed
    #[error("partition {partition} failed: {reason}")]
    PartitionFailure { partition: usize, reason: String },

    /// Invalid ranking options
    #[error("config error: {0}")]
    Config(String),
}

/// Errors that can occur when writing to a record store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Record identifier is empty
    #[error("record id must not be empty")]
    EmptyId,

    /// Record has no text in any field
    #[error("record '{0}' has no text in any field")]
    EmptyRecord(String),
}

/// Convenience type alias for ranking results.
pub type Result<T> = std::result::Result<T, RankError>;
