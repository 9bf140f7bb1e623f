//! Field weighting and weighted candidate scoring
//!
//! The query record's field-length distribution sets the weights:
//! `weight(f) = chars(f) / Σ chars(present fields)`. A candidate is scored by
//! comparing only the fields the query defines, under the query's weights.
//! Swapping query and candidate can therefore change the score.

use super::record::{Record, RecordField};
use crate::algorithms::{unit_count, NormalizedLevenshtein, Similarity, TextUnit};
use crate::error::{RankError, Result};
use smallvec::SmallVec;

/// Per-field weights derived from one record, in field order.
///
/// Only present fields appear. Weights sum to 1.0 within floating-point
/// tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWeights<F> {
    weights: SmallVec<[(F, f64); 4]>,
}

impl<F: RecordField> FieldWeights<F> {
    /// Weight of `field`, or `None` when the source record lacks it
    pub fn get(&self, field: F) -> Option<f64> {
        self.weights
            .iter()
            .find(|(f, _)| *f == field)
            .map(|&(_, weight)| weight)
    }

    /// Iterate `(field, weight)` pairs in field order
    pub fn iter(&self) -> impl Iterator<Item = (F, f64)> + '_ {
        self.weights.iter().copied()
    }

    /// Sum of all weights
    pub fn total(&self) -> f64 {
        self.weights.iter().map(|(_, w)| w).sum()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Compute field weights from `record`'s character distribution.
///
/// Lengths are counted in `unit`. Absent fields are left out entirely;
/// present-but-empty fields get weight zero.
///
/// # Errors
///
/// Returns [`RankError::InvalidQuery`] when the record has no characters in
/// any field, since every weight would be `0 / 0`.
pub fn compute_field_weights<R: Record>(
    record: &R,
    unit: TextUnit,
) -> Result<FieldWeights<R::Field>> {
    let counts: SmallVec<[(R::Field, usize); 4]> = R::FIELDS
        .iter()
        .filter_map(|&field| record.field(field).map(|text| (field, unit_count(text, unit))))
        .collect();

    let total: usize = counts.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return Err(RankError::InvalidQuery);
    }

    let weights = counts
        .into_iter()
        .map(|(field, n)| (field, n as f64 / total as f64))
        .collect();

    Ok(FieldWeights { weights })
}

/// Score `candidate` against `query` under `weights`.
///
/// Uses normalized Levenshtein counted in `unit`. A field the candidate
/// lacks is compared against the empty string.
pub fn score_candidate<R: Record>(
    query: &R,
    weights: &FieldWeights<R::Field>,
    candidate: &R,
    unit: TextUnit,
) -> f64 {
    score_candidate_with(query, weights, candidate, &NormalizedLevenshtein::new(unit))
}

/// Score `candidate` against `query` under `weights` with any
/// [`Similarity`] metric.
///
/// The result stays in `[0, 1]` for metrics that do, since each term is
/// bounded by its weight.
pub fn score_candidate_with<R, M>(
    query: &R,
    weights: &FieldWeights<R::Field>,
    candidate: &R,
    metric: &M,
) -> f64
where
    R: Record,
    M: Similarity + ?Sized,
{
    weights
        .iter()
        .map(|(field, weight)| {
            let query_text = query.field(field).unwrap_or_default();
            let candidate_text = candidate.field(field).unwrap_or_default();
            weight * metric.similarity(query_text, candidate_text)
        })
        .sum::<f64>()
        .clamp(0.0, 1.0)
}
