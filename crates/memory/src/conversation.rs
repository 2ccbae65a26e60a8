//! The bounded message log of one conversation.

use std::collections::VecDeque;
use olla_core::message::{ChatMessage, Message, Role};
use tracing::debug;
use crate::token::{MemoryBudget, word_count};

/// Eviction never shrinks the log below this many messages.
pub const MIN_RETAINED: usize = 3;

/// Ordered, role-tagged message history with oldest-first eviction.
///
/// The size counter is kept in whole words and scaled on read, so it always
/// equals the recomputed sum over the retained messages.
#[derive(Debug, Clone)]
pub struct Memory {
    messages: VecDeque<Message>,
    words: usize,
    budget: MemoryBudget,
}

impl Memory {
    pub fn new(budget: MemoryBudget) -> Self {
        Self {
            messages: VecDeque::new(),
            words: 0,
            budget,
        }
    }

    /// Memory with the default budget and a custom ceiling.
    pub fn with_max_tokens(max_tokens: usize) -> Self {
        Self::new(MemoryBudget::new(max_tokens))
    }

    /// Record a message, then evict until back under budget.
    ///
    /// Returns how many old messages were evicted.
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> usize {
        let message = Message::new(role, content);
        self.words += word_count(message.content());
        self.messages.push_back(message);
        self.evict()
    }

    fn evict(&mut self) -> usize {
        let mut evicted = 0;
        while self.size_units() > self.budget.max_tokens as f64 && self.messages.len() > MIN_RETAINED {
            let Some(oldest) = self.messages.pop_front() else {
                break;
            };
            self.words -= word_count(oldest.content());
            evicted += 1;
        }
        if evicted > 0 {
            debug!(
                evicted,
                retained = self.messages.len(),
                size = self.size_units(),
                "Evicted oldest messages over budget"
            );
        }
        evicted
    }

    /// The approximate token count of the retained messages.
    pub fn size_units(&self) -> f64 {
        self.budget.tokens_for_words(self.words)
    }

    pub fn budget(&self) -> MemoryBudget {
        self.budget
    }

    /// Every retained message as a role/content pair, oldest first.
    pub fn snapshot_for_generation(&self) -> Vec<ChatMessage> {
        self.messages.iter().map(Message::to_chat_message).collect()
    }

    /// The last `n` messages, oldest first. All of them if `n` exceeds the length.
    pub fn tail(&self, n: usize) -> Vec<ChatMessage> {
        let skip = self.messages.len().saturating_sub(n);
        self.messages.iter().skip(skip).map(Message::to_chat_message).collect()
    }

    /// `ROLE: content` per message, separated by a blank line.
    pub fn render_transcript(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role().as_str().to_uppercase(), m.content()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Drop every message and reset the size counter.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.words = 0;
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(MemoryBudget::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn recomputed(memory: &Memory) -> f64 {
        memory
            .messages()
            .map(|m| memory.budget().tokens_for_words(word_count(m.content())))
            .sum()
    }

    #[test]
    fn append_keeps_order_and_counts() {
        let mut memory = Memory::default();
        memory.append(Role::System, "You are helpful.");
        memory.append(Role::User, "hi there");

        let snapshot = memory.snapshot_for_generation();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0], ChatMessage::new(Role::System, "You are helpful."));
        assert_eq!(snapshot[1], ChatMessage::new(Role::User, "hi there"));
        assert!((memory.size_units() - 5.0 * 1.3).abs() < 1e-9);
    }

    #[test]
    fn evicts_oldest_first() {
        // 10 words = 13 tokens each; budget fits three messages.
        let mut memory = Memory::with_max_tokens(40);
        for i in 0..5 {
            memory.append(Role::User, format!("{i} {}", words(9)));
        }
        assert_eq!(memory.len(), 3);
        let first = memory.snapshot_for_generation()[0].content.clone();
        assert!(first.starts_with("2 "));
        assert!(memory.size_units() <= 40.0);
    }

    #[test]
    fn never_drops_below_three_messages() {
        let mut memory = Memory::with_max_tokens(1);
        for _ in 0..10 {
            memory.append(Role::Assistant, words(500));
        }
        assert_eq!(memory.len(), MIN_RETAINED);
        assert!(memory.size_units() > 1.0);
    }

    #[test]
    fn append_reports_evictions() {
        let mut memory = Memory::with_max_tokens(10);
        assert_eq!(memory.append(Role::System, words(5)), 0);
        assert_eq!(memory.append(Role::User, words(5)), 0);
        assert_eq!(memory.append(Role::Assistant, words(5)), 0);
        assert_eq!(memory.append(Role::User, words(1)), 1);
    }

    #[test]
    fn size_never_drifts() {
        let mut memory = Memory::with_max_tokens(120);
        let mut seed: u32 = 7;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let n = (seed >> 16) as usize % 40;
            memory.append(Role::User, words(n));
            assert!((memory.size_units() - recomputed(&memory)).abs() < 1e-6);
            assert!(memory.size_units() <= 120.0 || memory.len() == MIN_RETAINED);
        }
    }

    #[test]
    fn tail_returns_last_n() {
        let mut memory = Memory::default();
        for c in ["a", "b", "c", "d"] {
            memory.append(Role::User, c);
        }
        let tail: Vec<String> = memory.tail(2).into_iter().map(|m| m.content).collect();
        assert_eq!(tail, vec!["c", "d"]);
        assert_eq!(memory.tail(10).len(), 4);
        assert!(memory.tail(0).is_empty());
    }

    #[test]
    fn transcript_format() {
        let mut memory = Memory::default();
        memory.append(Role::System, "rules");
        memory.append(Role::User, "hello");
        memory.append(Role::Assistant, "hi");
        assert_eq!(
            memory.render_transcript(),
            "SYSTEM: rules\n\nUSER: hello\n\nASSISTANT: hi"
        );
    }

    #[test]
    fn clear_resets_everything() {
        let mut memory = Memory::default();
        memory.append(Role::User, "some words here");
        memory.clear();
        assert!(memory.is_empty());
        assert_eq!(memory.size_units(), 0.0);
        assert_eq!(memory.render_transcript(), "");
    }
}
