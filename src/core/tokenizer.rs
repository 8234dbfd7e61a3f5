//! LLM token estimation
//!
//! Used to report how much of the model's context a summary request takes.
//! Counts with the cl100k_base BPE when it loads, and falls back to a
//! character heuristic otherwise.

use once_cell::sync::Lazy;
use tiktoken_rs::{cl100k_base, CoreBPE};

// Loaded once on first use
static CL100K_BPE: Lazy<Result<CoreBPE, String>> =
    Lazy::new(|| cl100k_base().map_err(|e| format!("Failed to load cl100k_base: {}", e)));

/// Estimate the number of LLM tokens in `text`
pub fn estimate_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }

    match CL100K_BPE.as_ref() {
        Ok(bpe) => bpe.encode_with_special_tokens(text).len(),
        Err(e) => {
            log::debug!("{}; using heuristic token estimate", e);
            estimate_tokens_heuristic(text)
        }
    }
}

/// Rough estimate without BPE: ~4 ASCII chars per token, ~2 for other scripts
pub fn estimate_tokens_heuristic(text: &str) -> usize {
    let mut ascii = 0usize;
    let mut other = 0usize;

    for c in text.chars() {
        if c.is_ascii() {
            ascii += 1;
        } else {
            other += 1;
        }
    }

    ascii.div_ceil(4) + other.div_ceil(2)
}
