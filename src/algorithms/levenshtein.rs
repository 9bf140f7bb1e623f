//! Levenshtein (edit) distance and normalized similarity
//!
//! Distances are counted in text units, never bytes:
//! - `char` mode uses Myers bit-parallel for patterns up to 64 chars and a
//!   single-row DP beyond that
//! - grapheme mode treats each extended grapheme cluster as one unit

use super::{EditDistance, TextUnit};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use unicode_segmentation::UnicodeSegmentation;

/// Maximum pattern length for Myers bit-parallel algorithm (64 bits per block)
const MYERS_BLOCK_SIZE: usize = 64;

// ============================================================================
// Distance kernels
// ============================================================================

/// Myers bit-parallel Levenshtein distance.
///
/// `pattern` should be the shorter sequence. Patterns longer than 64 units
/// fall back to [`dp_distance`].
///
/// Based on: Myers, G. (1999). "A fast bit-vector algorithm for approximate string matching"
#[inline]
fn myers_64(pattern: &[char], text: &[char]) -> usize {
    let m = pattern.len();
    let n = text.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }
    if m > MYERS_BLOCK_SIZE {
        return dp_distance(pattern, text);
    }

    // Peq[c] has bit i set when pattern[i] == c
    let mut peq: AHashMap<char, u64> = AHashMap::with_capacity(m.min(26));
    for (i, &c) in pattern.iter().enumerate() {
        *peq.entry(c).or_insert(0) |= 1u64 << i;
    }

    let mut vp: u64 = !0u64;
    let mut vn: u64 = 0u64;
    let mut score = m;
    let last = 1u64 << (m - 1);

    for &tc in text {
        let eq = peq.get(&tc).copied().unwrap_or(0);

        let xv = eq | vn;
        let xh = (((eq & vp).wrapping_add(vp)) ^ vp) | eq;

        let hp = vn | !(xh | vp);
        let hn = vp & xh;

        if hp & last != 0 {
            score += 1;
        } else if hn & last != 0 {
            score -= 1;
        }

        // First row is 0,1,2,... so the shifted-in horizontal delta is +1
        let hp = (hp << 1) | 1;
        let hn = hn << 1;

        vp = hn | !(xv | hp);
        vn = hp & xv;
    }

    score
}

/// Single-row DP distance for any comparable unit.
fn dp_distance<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Shorter sequence on the column axis
    let (target, source) = if a.len() < b.len() { (a, b) } else { (b, a) };
    let width = target.len();

    let mut row: SmallVec<[usize; 128]> = (0..=width).collect();

    for (i, s) in source.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, t) in target.iter().enumerate() {
            let cost = usize::from(s != t);
            let cell = (diagonal + cost).min(row[j + 1] + 1).min(row[j] + 1);
            diagonal = row[j + 1];
            row[j + 1] = cell;
        }
    }

    row[width]
}

// ============================================================================
// Public API
// ============================================================================

/// Levenshtein distance counted in `char`s.
///
/// ```
/// use fuzzyrank::algorithms::levenshtein::levenshtein;
///
/// assert_eq!(levenshtein("kitten", "sitting"), 3);
/// assert_eq!(levenshtein("日本語", "日本"), 1);
/// ```
#[inline]
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_chars: SmallVec<[char; 64]> = a.chars().collect();
    let b_chars: SmallVec<[char; 64]> = b.chars().collect();

    // Shorter side as the Myers pattern
    if a_chars.len() <= b_chars.len() {
        myers_64(&a_chars, &b_chars)
    } else {
        myers_64(&b_chars, &a_chars)
    }
}

/// Levenshtein distance treating grapheme clusters as single units.
///
/// ```
/// use fuzzyrank::algorithms::levenshtein::levenshtein_grapheme;
///
/// // 👨‍👩‍👧‍👦 is 7 code points but 1 grapheme cluster
/// assert_eq!(levenshtein_grapheme("👨‍👩‍👧‍👦", "👨"), 1);
/// ```
#[must_use]
pub fn levenshtein_grapheme(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_graphemes: SmallVec<[&str; 64]> = a.graphemes(true).collect();
    let b_graphemes: SmallVec<[&str; 64]> = b.graphemes(true).collect();

    dp_distance(&a_graphemes, &b_graphemes)
}

/// Number of units in `text` for the given [`TextUnit`].
#[inline]
#[must_use]
pub fn unit_count(text: &str, unit: TextUnit) -> usize {
    match unit {
        TextUnit::Char => text.chars().count(),
        TextUnit::Grapheme => text.graphemes(true).count(),
    }
}

/// Normalized similarity in `[0, 1]` counted in `char`s.
///
/// Identical inputs (including two empty strings) score exactly `1.0`;
/// otherwise the score is `1 - distance / max(len(a), len(b))`.
///
/// ```
/// use fuzzyrank::algorithms::levenshtein::normalized_similarity;
///
/// assert_eq!(normalized_similarity("", ""), 1.0);
/// assert_eq!(normalized_similarity("abc", ""), 0.0);
/// assert!((normalized_similarity("cat", "bat") - 2.0 / 3.0).abs() < 1e-12);
/// ```
#[inline]
#[must_use]
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    normalized_similarity_with(TextUnit::Char, a, b)
}

/// Normalized similarity in `[0, 1]` using the given unit for both the
/// distance and the length.
#[must_use]
pub fn normalized_similarity_with(unit: TextUnit, a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let (dist, max_len) = match unit {
        TextUnit::Char => (levenshtein(a, b), unit_count(a, unit).max(unit_count(b, unit))),
        TextUnit::Grapheme => (
            levenshtein_grapheme(a, b),
            unit_count(a, unit).max(unit_count(b, unit)),
        ),
    };

    // Distinct strings can still share zero units only if both are empty,
    // which the identity check above already handled.
    if max_len == 0 {
        1.0
    } else {
        1.0 - (dist as f64 / max_len as f64)
    }
}

/// Levenshtein distance calculator bound to a [`TextUnit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedLevenshtein {
    pub unit: TextUnit,
}

impl NormalizedLevenshtein {
    #[must_use]
    pub fn new(unit: TextUnit) -> Self {
        Self { unit }
    }
}

impl EditDistance for NormalizedLevenshtein {
    fn distance(&self, a: &str, b: &str) -> usize {
        match self.unit {
            TextUnit::Char => levenshtein(a, b),
            TextUnit::Grapheme => levenshtein_grapheme(a, b),
        }
    }

    fn similarity(&self, a: &str, b: &str) -> f64 {
        normalized_similarity_with(self.unit, a, b)
    }

    fn unit(&self) -> TextUnit {
        self.unit
    }

    fn name(&self) -> &'static str {
        match self.unit {
            TextUnit::Char => "levenshtein",
            TextUnit::Grapheme => "levenshtein_grapheme",
        }
    }
}
