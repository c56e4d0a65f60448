//! Reading-time estimation
//!
//! Word count over non-whitespace runs, converted to minutes at a fixed
//! reading pace. Feeds the reading-time tool action.

use once_cell::sync::Lazy;
use regex::Regex;

/// Assumed reading pace
pub const WORDS_PER_MINUTE: usize = 50;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());

/// Number of non-whitespace runs in the text
pub fn word_count(text: &str) -> usize {
    WORD.find_iter(text).count()
}

/// Estimated reading time in minutes, rounded to the nearest minute
pub fn estimate_minutes(text: &str) -> usize {
    let words = word_count(text) as f64;
    (words / WORDS_PER_MINUTE as f64).round() as usize
}
