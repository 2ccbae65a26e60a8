//! The Olla agent: one conversational session over a generation backend.
//!
//! Each user turn follows the same protocol:
//!
//! 1. **Record** the user message in bounded memory
//! 2. **Generate** a response from the backend over the memory snapshot
//! 3. **Detect** an embedded `{"tool": ..., "parameters": {...}}` request
//! 4. **If found**: run the tool, record its output, and generate a follow-up
//! 5. **Return** the final response and record it
//!
//! There is at most one tool call per turn.

pub mod agent;
pub mod prompt;
pub mod tool_call;

pub use agent::{Agent, AgentBuilder};
pub use prompt::default_system_prompt;
pub use tool_call::{ParsedReply, ToolCall};
