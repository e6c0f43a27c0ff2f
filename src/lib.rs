pub mod domain;
pub mod models;
pub mod processing;
pub mod repository;

/// Minimum token-sort score (0..=100) accepted for a fuzzy name match.
pub const MATCH_THRESHOLD: f64 = 90.0;
