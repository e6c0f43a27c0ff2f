//! Token-sort similarity on a 0..=100 scale.
//!
//! Both strings are split on whitespace, their tokens sorted and re-joined,
//! and the joined forms compared with the normalized Indel ratio
//! `200 * lcs / (len_a + len_b)` over Unicode scalar values.

use crate::processing::canonical::words;

/// Sorted-token form of `text` as a character vector.
pub(crate) fn sorted_tokens(text: &str) -> Vec<char> {
    let mut tokens: Vec<&str> = words(text).collect();
    tokens.sort_unstable();
    tokens.join(" ").chars().collect()
}

/// Length of the longest common subsequence of `a` and `b`.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0;
    }

    let mut row = vec![0usize; short.len() + 1];
    for &lc in long {
        let mut diagonal = 0;
        for (j, &sc) in short.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if lc == sc {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[short.len()]
}

/// Normalized Indel similarity of two character sequences.
pub(crate) fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

/// Highest score two sequences of these lengths could possibly reach.
pub(crate) fn score_upper_bound(len_a: usize, len_b: usize) -> f64 {
    let total = len_a + len_b;
    if total == 0 {
        return 100.0;
    }
    200.0 * len_a.min(len_b) as f64 / total as f64
}

/// Word-order-insensitive similarity of `a` and `b`; 100 means both contain
/// the same tokens.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio_chars(&sorted_tokens(a), &sorted_tokens(b))
}
