//! Ranking of candidate records against a query record
//!
//! - [`rank`] / [`rank_with`]: sequential, on the calling thread
//! - [`rank_parallel`] / [`rank_parallel_with`]: contiguous partitions on rayon
//! - [`rank_parallel_async`]: owned partitions on tokio's blocking pool
//!
//! All three share one threshold, one ordering rule and one top-N contract,
//! and return the same set of `(candidate, score)` pairs for the same input.

pub mod options;
pub mod parallel;
pub mod sequential;

pub use options::{RankOptions, DEFAULT_TOP_N};
pub use parallel::{rank_parallel, rank_parallel_async, rank_parallel_with};
pub use sequential::{rank, rank_with};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Candidates must score strictly above this to be reported.
pub const RELEVANCE_THRESHOLD: f64 = 0.5;

/// A candidate paired with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match<R> {
    pub candidate: R,

    /// Weighted similarity (0.0 - 1.0)
    pub score: f64,
}

/// Ranked matches plus the time spent producing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingResult<R> {
    /// Matches in descending score order, at most `top_n` long
    pub matches: Vec<Match<R>>,

    /// Time spent scoring, filtering and sorting. For the parallel rankers
    /// this is the mean across partitions.
    pub processing_time: Duration,
}

impl<R> RankingResult<R> {
    pub fn new(matches: Vec<Match<R>>, processing_time: Duration) -> Self {
        Self {
            matches,
            processing_time,
        }
    }

    /// A result with no matches and no processing time
    pub fn empty() -> Self {
        Self::new(Vec::new(), Duration::ZERO)
    }

    /// Processing time in whole milliseconds
    pub fn processing_time_ms(&self) -> u64 {
        u64::try_from(self.processing_time.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Sort by descending score; equal scores keep their relative order.
pub(crate) fn sort_matches<R>(matches: &mut [Match<R>]) {
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
}
