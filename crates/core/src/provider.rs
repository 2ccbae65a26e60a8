//! Provider trait: the abstraction over text-generation backends.
//!
//! A Provider knows how to send a conversation to a model and get the
//! generated text back. The agent treats it as an opaque capability: it
//! never retries, and any failure ends the current turn.
//!
//! Implementations: Ollama (`olla-providers`), scripted mocks in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::ProviderError;
use crate::message::ChatMessage;

/// Everything a backend needs for one generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "llama3", "mistral")
    pub model: String,

    /// The conversation snapshot, oldest first
    pub messages: Vec<ChatMessage>,

    /// The session's fixed system prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

pub fn default_temperature() -> f32 {
    0.7
}

/// The core Provider trait.
///
/// The agent calls `complete()` without knowing which backend is behind it.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "ollama").
    fn name(&self) -> &str;

    /// Send a request and get the generated text.
    async fn complete(&self, request: ProviderRequest) -> std::result::Result<String, ProviderError>;

    /// List available models for this provider.
    async fn list_models(&self) -> std::result::Result<Vec<String>, ProviderError> {
        Ok(Vec::new())
    }

    /// Health check: can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}
