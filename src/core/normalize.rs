//! Text normalization
//!
//! Produces the canonical form every count is based on: lowercase text with
//! the ASCII punctuation characters removed. Whitespace, digits and non-ASCII
//! letters are kept as they are.

/// Lowercase `raw` and strip ASCII punctuation
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_punctuation() {
            continue;
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Normalize a single query word so it can be looked up in a frequency table
pub fn normalize_word(word: &str) -> String {
    normalize(word.trim())
}
