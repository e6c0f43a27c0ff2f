use crate::processing::index::CatalogIndex;
use crate::processing::similarity::{ratio_chars, score_upper_bound, sorted_tokens};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Fuzzy,
}

/// A catalog product selected for a batch item.
#[derive(Clone, Debug, PartialEq)]
pub struct NameMatch<'a> {
    /// Position of the product in the catalog the index was built from.
    pub position: usize,
    pub key: &'a str,
    pub score: f64,
    pub kind: MatchKind,
}

/// Finds the catalog product for an already canonical name.
///
/// An exact key hit wins outright. Otherwise the key with the highest
/// token-sort score is taken if it reaches `threshold`; among equal scores the
/// key indexed first wins.
pub fn find_match<'a>(
    canonical_name: &str,
    index: &'a CatalogIndex,
    threshold: f64,
) -> Option<NameMatch<'a>> {
    if canonical_name.is_empty() {
        return None;
    }

    if let Some(entry) = index.entry(canonical_name) {
        log::debug!("Exact match found for '{canonical_name}'");
        return Some(NameMatch {
            position: entry.position,
            key: entry.key.as_str(),
            score: 100.0,
            kind: MatchKind::Exact,
        });
    }

    let query = sorted_tokens(canonical_name);
    let mut best: Option<(usize, f64)> = None;

    for (slot, entry) in index.entries().iter().enumerate() {
        // Skip candidates that cannot reach the threshold or beat the
        // current best; the outcome equals a full scan.
        let bound = score_upper_bound(query.len(), entry.tokens.len());
        if bound < threshold || best.is_some_and(|(_, score)| bound <= score) {
            continue;
        }

        let score = ratio_chars(&query, &entry.tokens);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((slot, score));
        }
    }

    let Some((slot, score)) = best else {
        log::debug!("No fuzzy candidate for '{canonical_name}'");
        return None;
    };

    let entry = &index.entries()[slot];
    if score >= threshold {
        log::debug!(
            "Fuzzy match '{}' with score {score:.1} for '{canonical_name}'",
            entry.key
        );
        Some(NameMatch {
            position: entry.position,
            key: entry.key.as_str(),
            score,
            kind: MatchKind::Fuzzy,
        })
    } else {
        log::debug!(
            "Best candidate '{}' scored {score:.1} for '{canonical_name}', below {threshold}",
            entry.key
        );
        None
    }
}
