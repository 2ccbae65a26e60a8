//! Domain event system: lets front ends observe a turn without coupling
//! to the agent.
//!
//! The agent publishes events as a turn progresses; the CLI subscribes in
//! verbose mode to show which tools were used.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A user message was accepted for a turn
    TurnStarted {
        session_id: String,
        content_preview: String,
        timestamp: DateTime<Utc>,
    },

    /// The backend produced a response
    ResponseGenerated {
        session_id: String,
        model: String,
        followup: bool,
        timestamp: DateTime<Utc>,
    },

    /// A tool was executed
    ToolExecuted {
        tool_name: String,
        output: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// Old messages were evicted from conversational memory
    MemoryEvicted {
        session_id: String,
        evicted: usize,
        retained: usize,
        timestamp: DateTime<Utc>,
    },

    /// A turn failed
    ErrorOccurred {
        context: String,
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// The conversation was reset to the system prompt
    SessionReset {
        session_id: String,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
