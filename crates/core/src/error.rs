//! Error types for the Olla domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//!
//! Only [`ProviderError`] ever crosses a turn boundary as a hard failure.
//! [`ToolError`] values are turned into conversational text by the
//! [`ToolRegistry`](crate::tool::ToolRegistry) before the agent sees them.

use thiserror::Error;

/// The top-level error type for all Olla operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// A generation call failed. Fatal to the current turn, never retried.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Duplicate tool name: {0}")]
    DuplicateName(String),

    #[error("{0}")]
    ExecutionFailed(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

impl From<std::io::Error> for ToolError {
    fn from(e: std::io::Error) -> Self {
        ToolError::ExecutionFailed(e.to_string())
    }
}
