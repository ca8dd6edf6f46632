//! Validation helpers for the moderation domain
//!
//! Category ids are slugs derived deterministically from the display name so
//! the same name always maps to the same document id.

use regex::Regex;

/// Maximum length of a derived category id, in characters
pub const MAX_CATEGORY_ID_LEN: usize = 20;

lazy_static::lazy_static! {
    /// Runs of whitespace or hyphens, folded into a single underscore
    static ref SEPARATOR_RUN: Regex = Regex::new(r"[\s-]+").unwrap();

    /// Runs of underscores left over after stripping punctuation
    static ref UNDERSCORE_RUN: Regex = Regex::new(r"_+").unwrap();
}

/// Derive a category id from its display name.
///
/// Lowercases, folds separators to underscores, strips every other
/// non-alphanumeric character, and truncates to [`MAX_CATEGORY_ID_LEN`]
/// characters. Deterministic and idempotent; names differing only in case
/// or surrounding whitespace derive the same id.
pub fn derive_category_id(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let separated = SEPARATOR_RUN.replace_all(&lowered, "_");

    let stripped: String = separated
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();

    let collapsed = UNDERSCORE_RUN.replace_all(&stripped, "_");

    collapsed
        .trim_matches('_')
        .chars()
        .take(MAX_CATEGORY_ID_LEN)
        .collect()
}

/// Lowercased, trimmed name used for case-insensitive uniqueness checks
pub fn normalize_category_name(name: &str) -> String {
    name.trim().to_lowercase()
}
