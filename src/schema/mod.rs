// Record data model for multi-field fuzzy ranking
//
// - `record`: the `Record` trait over a compile-time field list, plus keyed records
// - `types`: the post and issue record shapes
// - `scoring`: query-derived field weights and weighted candidate scores
//
// # Example
//
// ```rust
// use fuzzyrank::algorithms::TextUnit;
// use fuzzyrank::schema::*;
//
// let query = PostData::new("cat", "dog");
// let weights = compute_field_weights(&query, TextUnit::Char)?;
// let score = score_candidate(&query, &weights, &PostData::new("bat", "dog"), TextUnit::Char);
// assert!(score > 0.8);
// # Ok::<(), fuzzyrank::RankError>(())
// ```

pub mod record;
pub mod scoring;
pub mod types;

pub use record::{KeyedRecord, Record, RecordField};
pub use scoring::{compute_field_weights, score_candidate, score_candidate_with, FieldWeights};
pub use types::{IssueFeatures, IssueField, PostData, PostField};
