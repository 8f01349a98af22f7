//! Common type helpers
//!
//! Ids in the hosted schema are UUID-like strings; they are carried as plain
//! `String` everywhere and never parsed.

/// Normalize a free-text name for comparison.
///
/// Lowercases, trims, and collapses internal whitespace runs to a single
/// space. Every name comparison in the engine goes through this so that
/// matching stays deterministic across callers.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// First significant token of a normalized name, used by the fuzzy-match
/// gate. Returns an empty string for blank input.
pub fn first_token(name: &str) -> String {
    normalize_name(name)
        .split(' ')
        .next()
        .unwrap_or_default()
        .to_string()
}
