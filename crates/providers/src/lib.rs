//! Generation backend implementations for Olla.
//!
//! All providers implement the `olla_core::Provider` trait.

pub mod ollama;

pub use ollama::{ModelDetails, ModelInfo, OllamaProvider, PullProgress};

use std::sync::Arc;
use std::time::Duration;
use olla_config::AppConfig;
use olla_core::error::ProviderError;
use olla_core::provider::Provider;

/// Build the configured provider.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    Ok(Arc::new(ollama_from_config(config)?))
}

/// The concrete Ollama client, for model management beyond [`Provider`].
pub fn ollama_from_config(config: &AppConfig) -> Result<OllamaProvider, ProviderError> {
    OllamaProvider::new(
        &config.ollama.base_url,
        Duration::from_secs(config.ollama.timeout_secs),
    )
}
