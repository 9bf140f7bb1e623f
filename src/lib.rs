//! FuzzyRank - weighted multi-field fuzzy ranking
//!
//! Ranks candidate records against a query record by Levenshtein
//! similarity across named text fields, keeping the top N above a fixed
//! relevance threshold.
//!
//! # Features
//! - Unicode-aware edit distance (chars or grapheme clusters, never bytes)
//! - Field weights taken from the query's own length distribution
//! - Sequential, rayon-partitioned and async fan-out rankers with identical results
//! - Call-scoped cancellation derived from a caller's token
//! - Thread-safe in-memory record store
//!
//! # Example
//!
//! ```
//! use fuzzyrank::{rank_parallel, PostData};
//!
//! let query = PostData::new("cat", "dog");
//! let candidates = vec![
//!     PostData::new("bat", "dog"),
//!     PostData::new("cat", "dot"),
//!     PostData::new("emu", "owl"),
//! ];
//!
//! let result = rank_parallel(&query, &candidates, 2)?;
//! assert_eq!(result.matches.len(), 2);
//! assert!(result.matches.iter().all(|m| m.score > 0.5));
//! # Ok::<(), fuzzyrank::RankError>(())
//! ```

pub mod algorithms;
pub mod error;
pub mod ranking;
pub mod schema;
pub mod store;

pub use algorithms::{
    normalized_similarity, normalized_similarity_with, EditDistance, NormalizedLevenshtein, Similarity,
    TextUnit,
};
pub use error::{RankError, Result, StoreError};
pub use ranking::{
    rank, rank_parallel, rank_parallel_async, rank_parallel_with, rank_with, Match, RankOptions,
    RankingResult, DEFAULT_TOP_N, RELEVANCE_THRESHOLD,
};
pub use schema::{
    compute_field_weights, score_candidate, score_candidate_with, FieldWeights, IssueFeatures,
    IssueField, KeyedRecord, PostData, PostField, Record, RecordField,
};
pub use store::RecordStore;

/// Re-exported so callers can build cancellation signals without a direct
/// `tokio-util` dependency.
pub use tokio_util::sync::CancellationToken;
