//! # Olla Core
//!
//! Domain types, traits, and error definitions for the Olla agent loop.
//! Every other crate in the workspace depends inward on this one.
//!
//! ## Design Philosophy
//!
//! The two external collaborators of the agent, the generation backend and
//! the tools it can call, are defined as traits here. Implementations live in
//! their respective crates. This enables:
//! - Swapping the backend via configuration
//! - Easy testing with scripted providers and stub tools
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, ToolError};
pub use event::{DomainEvent, EventBus};
pub use message::{ChatMessage, Message, Role};
pub use provider::{Provider, ProviderRequest};
pub use tool::{Tool, ToolParams, ToolRegistry, ToolResult};
