//! Ranking options with sensible defaults.

use crate::algorithms::TextUnit;
use crate::error::{RankError, Result};
use tokio_util::sync::CancellationToken;

/// Number of matches returned when no limit is given.
pub const DEFAULT_TOP_N: usize = 5;

/// Options for a ranking call
///
/// Use [`RankOptions::new`] or [`Default::default()`] and the `with_*`
/// builders for overrides.
#[derive(Debug, Clone)]
pub struct RankOptions {
    /// Maximum number of matches to return
    pub top_n: usize,

    /// Number of partitions for the parallel rankers.
    /// `None` uses the host's available parallelism.
    pub parallelism: Option<usize>,

    /// Unit used for lengths, weights and edit distance
    pub text_unit: TextUnit,

    /// Caller's cancellation signal. Each call derives its own child token
    /// from it and never cancels the caller's token.
    pub cancel: Option<CancellationToken>,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            parallelism: None,
            text_unit: TextUnit::Char,
            cancel: None,
        }
    }
}

impl RankOptions {
    /// Options returning at most `top_n` matches
    pub fn new(top_n: usize) -> Self {
        Self {
            top_n,
            ..Default::default()
        }
    }

    /// Set the partition count hint
    pub fn with_parallelism(mut self, workers: usize) -> Self {
        self.parallelism = Some(workers);
        self
    }

    /// Set the text unit
    pub fn with_text_unit(mut self, unit: TextUnit) -> Self {
        self.text_unit = unit;
        self
    }

    /// Attach a cancellation signal
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Validates these options.
    ///
    /// Checks:
    /// - `parallelism`, when set, must be greater than 0
    pub fn validate(&self) -> Result<()> {
        if self.parallelism == Some(0) {
            return Err(RankError::Config(
                "parallelism must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Number of partitions to split candidates into
    pub fn worker_count(&self) -> usize {
        self.parallelism.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(1)
        })
    }

    /// Fresh token scoped to one call, linked to the caller's token if any.
    pub(crate) fn call_token(&self) -> CancellationToken {
        self.cancel
            .as_ref()
            .map(CancellationToken::child_token)
            .unwrap_or_else(CancellationToken::new)
    }
}
