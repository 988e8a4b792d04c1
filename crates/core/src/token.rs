//! Token estimation heuristics.
//!
//! We estimate rather than tokenize: roughly 4 characters per token for
//! English text. The estimate is used for budget enforcement and history
//! windowing, where being slightly conservative is acceptable and pulling
//! in a real tokenizer is not worth the weight.

use crate::message::MemoryEntry;

/// Per-entry formatting overhead (role prefix, separators).
const ENTRY_OVERHEAD_TOKENS: usize = 4;

/// Estimate the token count of a piece of text.
///
/// Rounds up, so the empty string is 0 and any non-empty text is at
/// least 1.
pub fn estimate_tokens(text: &str) -> usize {
    (text.len() + 3) / 4
}

/// Estimate the token count of a single history entry, including its
/// transcript formatting overhead.
pub fn estimate_entry_tokens(entry: &MemoryEntry) -> usize {
    estimate_tokens(&entry.content) + ENTRY_OVERHEAD_TOKENS
}
