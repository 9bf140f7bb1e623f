//! Parallel rankers: partition, rank each partition, merge, re-truncate
//!
//! Candidates are split into contiguous partitions of
//! `ceil(len / workers)` items, preserving order inside each. Every
//! partition runs the sequential algorithm with the full `top_n`, since the
//! global top N can never hold more than `top_n` from one partition.
//! Partitions are joined all at once, their matches concatenated in
//! partition order, sorted and truncated again.
//!
//! Reported processing time is the mean of the partitions' times.
//!
//! A failing partition cancels the call-scoped token so its siblings stop
//! early, and the call fails as a whole: no partial ranking is returned.

use super::options::RankOptions;
use super::sequential::rank_partition;
use super::{sort_matches, RankingResult};
use crate::error::{RankError, Result};
use crate::schema::{compute_field_weights, Record};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Rank in parallel with default options and the host's parallelism.
///
/// # Errors
///
/// See [`rank_parallel_with`].
pub fn rank_parallel<R: Record>(
    query: &R,
    candidates: &[R],
    top_n: usize,
) -> Result<RankingResult<R>> {
    rank_parallel_with(query, candidates, &RankOptions::new(top_n))
}

/// Rank in parallel on rayon's pool, one partition per worker.
///
/// # Errors
///
/// - [`RankError::Config`] for invalid options
/// - [`RankError::InvalidQuery`] when `query` has no text, before dispatch
/// - [`RankError::Cancelled`] when the cancellation signal fires
/// - [`RankError::PartitionFailure`] when a partition panics
pub fn rank_parallel_with<R: Record>(
    query: &R,
    candidates: &[R],
    options: &RankOptions,
) -> Result<RankingResult<R>> {
    options.validate()?;
    let cancel = options.call_token();
    let weights = compute_field_weights(query, options.text_unit)?;
    if cancel.is_cancelled() {
        return Err(RankError::Cancelled);
    }
    if candidates.is_empty() {
        return Ok(RankingResult::empty());
    }

    let chunk_size = partition_size(candidates.len(), options.worker_count());
    tracing::debug!(
        candidates = candidates.len(),
        partitions = candidates.len().div_ceil(chunk_size),
        chunk_size,
        "ranking partitions on rayon"
    );

    let (top_n, unit) = (options.top_n, options.text_unit);
    let outcomes: Vec<Result<RankingResult<R>>> = candidates
        .par_chunks(chunk_size)
        .enumerate()
        .map(|(partition, chunk)| {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                rank_partition(query, &weights, chunk, top_n, unit, &cancel, Instant::now())
            }))
            .unwrap_or_else(|payload| {
                Err(RankError::PartitionFailure {
                    partition,
                    reason: panic_reason(payload.as_ref()),
                })
            });

            if outcome.is_err() {
                cancel.cancel();
            }
            outcome
        })
        .collect();

    merge_partitions(outcomes, top_n)
}

/// Rank in parallel on tokio's blocking pool.
///
/// `candidates` are moved into owned partitions and the query is shared
/// through an `Arc`, so no partition borrows from the caller. Dropping the
/// returned future cancels the partitions still running.
///
/// # Errors
///
/// Same as [`rank_parallel_with`]; a partition task that panics or is
/// aborted becomes [`RankError::PartitionFailure`].
pub async fn rank_parallel_async<R: Record + 'static>(
    query: Arc<R>,
    candidates: Vec<R>,
    options: RankOptions,
) -> Result<RankingResult<R>> {
    options.validate()?;
    let cancel = options.call_token();
    let weights = Arc::new(compute_field_weights(query.as_ref(), options.text_unit)?);
    if cancel.is_cancelled() {
        return Err(RankError::Cancelled);
    }
    if candidates.is_empty() {
        return Ok(RankingResult::empty());
    }

    let _abort_on_drop = cancel.clone().drop_guard();
    let chunk_size = partition_size(candidates.len(), options.worker_count());
    let partitions = split_owned(candidates, chunk_size);
    tracing::debug!(
        partitions = partitions.len(),
        chunk_size,
        "ranking partitions on blocking pool"
    );

    let (top_n, unit) = (options.top_n, options.text_unit);
    let tasks = partitions.into_iter().enumerate().map(|(partition, chunk)| {
        let query = Arc::clone(&query);
        let weights = Arc::clone(&weights);
        let cancel = cancel.clone();

        async move {
            let worker_cancel = cancel.clone();
            let outcome = tokio::task::spawn_blocking(move || {
                rank_partition(
                    query.as_ref(),
                    &weights,
                    &chunk,
                    top_n,
                    unit,
                    &worker_cancel,
                    Instant::now(),
                )
            })
            .await
            .unwrap_or_else(|err| {
                Err(RankError::PartitionFailure {
                    partition,
                    reason: err.to_string(),
                })
            });

            if outcome.is_err() {
                cancel.cancel();
            }
            outcome
        }
    });

    let outcomes = futures::future::join_all(tasks).await;
    merge_partitions(outcomes, top_n)
}

/// Partition length for `len` candidates over `workers` workers.
pub(crate) fn partition_size(len: usize, workers: usize) -> usize {
    len.div_ceil(workers.max(1)).max(1)
}

/// Split `candidates` into owned contiguous partitions.
fn split_owned<R>(candidates: Vec<R>, chunk_size: usize) -> Vec<Vec<R>> {
    let mut partitions = Vec::with_capacity(candidates.len().div_ceil(chunk_size));
    let mut rest = candidates.into_iter().peekable();
    while rest.peek().is_some() {
        partitions.push(rest.by_ref().take(chunk_size).collect());
    }
    partitions
}

/// Merge per-partition outcomes in partition order.
///
/// The first real failure wins over cancellations, which are usually its
/// consequence.
fn merge_partitions<R>(
    outcomes: Vec<Result<RankingResult<R>>>,
    top_n: usize,
) -> Result<RankingResult<R>> {
    let mut partials = Vec::with_capacity(outcomes.len());
    let mut cancelled = false;

    for (partition, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(partial) => partials.push(partial),
            Err(RankError::Cancelled) => cancelled = true,
            Err(err @ RankError::PartitionFailure { .. }) => return Err(err),
            Err(err) => {
                return Err(RankError::PartitionFailure {
                    partition,
                    reason: err.to_string(),
                })
            }
        }
    }
    if cancelled {
        return Err(RankError::Cancelled);
    }

    let processing_time = mean_duration(partials.iter().map(|p| p.processing_time));
    let mut matches: Vec<_> = partials.into_iter().flat_map(|p| p.matches).collect();
    sort_matches(&mut matches);
    matches.truncate(top_n);

    tracing::trace!(
        matches = matches.len(),
        processing_time_us = processing_time.as_micros() as u64,
        "merged partitions"
    );

    Ok(RankingResult::new(matches, processing_time))
}

fn mean_duration(times: impl Iterator<Item = Duration>) -> Duration {
    let (total, count) = times.fold((Duration::ZERO, 0u32), |(total, count), t| {
        (total.saturating_add(t), count.saturating_add(1))
    });
    if count == 0 {
        Duration::ZERO
    } else {
        total / count
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}
