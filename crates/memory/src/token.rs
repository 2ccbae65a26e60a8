//! Token estimation utilities.
//!
//! Uses a word-based heuristic: one whitespace-delimited word ≈ 1.3 tokens.
//! This is an approximation, not a tokenizer. The factor lives in
//! [`MemoryBudget`] so a precise count can replace it later without
//! touching the eviction rules.

use serde::{Deserialize, Serialize};

/// Default tokens-per-word multiplier.
pub const TOKEN_FACTOR: f64 = 1.3;

/// Default memory budget, in estimated tokens.
pub const DEFAULT_MAX_TOKENS: usize = 16_000;

/// Number of whitespace-delimited words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Size limits for a [`Memory`](crate::Memory).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryBudget {
    /// Soft ceiling on the estimated token count
    pub max_tokens: usize,

    /// Tokens per word
    pub token_factor: f64,
}

impl MemoryBudget {
    pub fn new(max_tokens: usize) -> Self {
        Self {
            max_tokens,
            token_factor: TOKEN_FACTOR,
        }
    }

    pub fn with_token_factor(mut self, factor: f64) -> Self {
        self.token_factor = factor;
        self
    }

    /// Convert a word count into estimated tokens.
    pub fn tokens_for_words(&self, words: usize) -> f64 {
        words as f64 * self.token_factor
    }
}

impl Default for MemoryBudget {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOKENS)
    }
}
