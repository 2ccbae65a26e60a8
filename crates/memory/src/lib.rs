//! Conversational memory for Olla.
//!
//! A [`Memory`] is the ordered message log of one session. It keeps a
//! running, approximate token count and evicts the oldest messages once the
//! count exceeds its budget, never dropping below [`MIN_RETAINED`] messages.

pub mod conversation;
pub mod token;

pub use conversation::{MIN_RETAINED, Memory};
pub use token::{DEFAULT_MAX_TOKENS, MemoryBudget, TOKEN_FACTOR, word_count};
