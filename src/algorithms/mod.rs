//! String similarity metrics
//!
//! Each metric is a standalone function for composability, plus a
//! trait-based interface for extensibility.

pub mod levenshtein;

pub use levenshtein::*;

use serde::{Deserialize, Serialize};

/// Unit in which text length and edit distance are counted.
///
/// Byte units are deliberately absent: multi-byte text must compare by
/// what a reader sees as characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextUnit {
    /// Unicode scalar values (`char`)
    #[default]
    Char,
    /// Extended grapheme clusters
    Grapheme,
}

impl TextUnit {
    pub fn name(&self) -> &'static str {
        match self {
            TextUnit::Char => "char",
            TextUnit::Grapheme => "grapheme",
        }
    }
}

/// Trait for all similarity metrics.
/// Returns a value between 0.0 (completely different) and 1.0 (identical).
pub trait Similarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;

    /// Convenience method for distance (1.0 - similarity)
    fn distance(&self, a: &str, b: &str) -> f64 {
        1.0 - self.similarity(a, b)
    }

    /// Name of the algorithm for debugging/logging
    fn name(&self) -> &'static str;
}

/// Trait for edit distance algorithms that return integer distances
pub trait EditDistance: Send + Sync {
    fn distance(&self, a: &str, b: &str) -> usize;

    /// Unit the distance is counted in
    fn unit(&self) -> TextUnit {
        TextUnit::Char
    }

    /// Convert to normalized similarity score (0.0 to 1.0)
    fn similarity(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        let unit = self.unit();
        let max_len = unit_count(a, unit).max(unit_count(b, unit));
        if max_len == 0 {
            1.0
        } else {
            1.0 - (self.distance(a, b) as f64 / max_len as f64)
        }
    }

    fn name(&self) -> &'static str;
}

/// Blanket implementation: any EditDistance is also a Similarity
impl<T: EditDistance> Similarity for T {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        EditDistance::similarity(self, a, b)
    }

    fn name(&self) -> &'static str {
        EditDistance::name(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Hamming;

    impl EditDistance for Hamming {
        fn distance(&self, a: &str, b: &str) -> usize {
            a.chars().zip(b.chars()).filter(|(x, y)| x != y).count()
        }

        fn name(&self) -> &'static str {
            "hamming"
        }
    }

    #[test]
    fn test_default_similarity_normalizes_by_unit_count() {
        assert!((EditDistance::similarity(&Hamming, "abcd", "abxd") - 0.75).abs() < 1e-12);
        assert_eq!(EditDistance::similarity(&Hamming, "", ""), 1.0);
    }

    #[test]
    fn test_blanket_similarity_impl() {
        let metric: &dyn Similarity = &Hamming;
        assert_eq!(metric.name(), "hamming");
        assert!((metric.distance("abcd", "abxd") - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_text_unit_default_is_char() {
        assert_eq!(TextUnit::default(), TextUnit::Char);
        assert_eq!(TextUnit::Grapheme.name(), "grapheme");
    }
}
