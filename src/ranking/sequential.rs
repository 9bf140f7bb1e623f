//! Sequential ranker: score, filter, sort, truncate
//!
//! Runs on the calling thread with no suspension points. The parallel
//! rankers run [`rank_partition`] once per partition.

use super::options::RankOptions;
use super::{sort_matches, Match, RankingResult, RELEVANCE_THRESHOLD};
use crate::algorithms::{NormalizedLevenshtein, TextUnit};
use crate::error::{RankError, Result};
use crate::schema::{compute_field_weights, score_candidate_with, FieldWeights, Record};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Rank `candidates` against `query`, keeping at most `top_n` matches.
///
/// # Errors
///
/// Returns [`RankError::InvalidQuery`] when `query` has no text.
///
/// # Example
///
/// ```
/// use fuzzyrank::ranking::rank;
/// use fuzzyrank::schema::PostData;
///
/// let query = PostData::new("cat", "dog");
/// let candidates = vec![PostData::new("bat", "dog"), PostData::new("xyz", "uvw")];
///
/// let result = rank(&query, &candidates, 5)?;
/// assert_eq!(result.matches.len(), 1);
/// assert_eq!(result.matches[0].candidate.title, "bat");
/// # Ok::<(), fuzzyrank::RankError>(())
/// ```
pub fn rank<R: Record>(query: &R, candidates: &[R], top_n: usize) -> Result<RankingResult<R>> {
    rank_with(query, candidates, &RankOptions::new(top_n))
}

/// Rank `candidates` against `query` with explicit options.
///
/// Everything runs on the calling thread. `options.parallelism` is still
/// validated so the same options are accepted by every ranker, but it has
/// no other effect here.
///
/// # Errors
///
/// - [`RankError::Config`] for invalid options
/// - [`RankError::InvalidQuery`] when `query` has no text
/// - [`RankError::Cancelled`] when the cancellation signal fires
pub fn rank_with<R: Record>(
    query: &R,
    candidates: &[R],
    options: &RankOptions,
) -> Result<RankingResult<R>> {
    options.validate()?;
    let cancel = options.call_token();
    let start = Instant::now();
    let weights = compute_field_weights(query, options.text_unit)?;

    rank_partition(
        query,
        &weights,
        candidates,
        options.top_n,
        options.text_unit,
        &cancel,
        start,
    )
}

/// Score one slice of candidates with precomputed weights.
///
/// Checks `cancel` before every comparison. Matches computed before a
/// cancellation are dropped.
pub(crate) fn rank_partition<R: Record>(
    query: &R,
    weights: &FieldWeights<R::Field>,
    candidates: &[R],
    top_n: usize,
    unit: TextUnit,
    cancel: &CancellationToken,
    start: Instant,
) -> Result<RankingResult<R>> {
    if cancel.is_cancelled() {
        return Err(RankError::Cancelled);
    }
    if top_n == 0 {
        return Ok(RankingResult::new(Vec::new(), start.elapsed()));
    }

    let metric = NormalizedLevenshtein::new(unit);
    let mut matches = Vec::new();
    for candidate in candidates {
        if cancel.is_cancelled() {
            return Err(RankError::Cancelled);
        }

        let score = score_candidate_with(query, weights, candidate, &metric);
        if score > RELEVANCE_THRESHOLD {
            matches.push(Match {
                candidate: candidate.clone(),
                score,
            });
        }
    }

    sort_matches(&mut matches);
    matches.truncate(top_n);

    Ok(RankingResult::new(matches, start.elapsed()))
}
