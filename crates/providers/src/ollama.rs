//! Ollama provider implementation.
//!
//! Talks to the native Ollama HTTP API:
//! - `POST /api/chat` for non-streaming chat completions
//! - `GET /api/tags` for model listing and health checks
//! - `POST /api/show` for model metadata
//! - `POST /api/pull` for downloading models, as a newline-delimited JSON
//!   progress stream

use async_trait::async_trait;
use futures::StreamExt;
use olla_core::error::ProviderError;
use olla_core::message::{ChatMessage, Role};
use olla_core::provider::{Provider, ProviderRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Pulls download whole model files, so they get their own ceiling.
const PULL_TIMEOUT: Duration = Duration::from_secs(6 * 60 * 60);

/// A local (or remote) Ollama server.
pub struct OllamaProvider {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    /// Default Ollama endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:11434";

    /// Create a provider with a request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The messages actually sent: the snapshot, led by the system prompt
    /// unless the snapshot already starts with it (it may have been evicted).
    fn to_api_messages(messages: &[ChatMessage], system_prompt: Option<&str>) -> Vec<ApiMessage> {
        let mut out = Vec::with_capacity(messages.len() + 1);

        if let Some(prompt) = system_prompt {
            let already_leads = messages
                .first()
                .is_some_and(|m| m.role == Role::System && m.content == prompt);
            if !already_leads {
                out.push(ApiMessage {
                    role: Role::System.as_str().into(),
                    content: prompt.to_string(),
                });
            }
        }

        out.extend(messages.iter().map(|m| ApiMessage {
            role: m.role.as_str().into(),
            content: m.content.clone(),
        }));
        out
    }

    fn build_request(request: &ProviderRequest) -> ApiChatRequest {
        ApiChatRequest {
            model: request.model.clone(),
            messages: Self::to_api_messages(&request.messages, request.system_prompt.as_deref()),
            stream: false,
            options: ApiOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        }
    }

    /// Model metadata (`POST /api/show`).
    pub async fn show_model(&self, model: &str) -> Result<ModelInfo, ProviderError> {
        let url = format!("{}/api/show", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&ApiModelRequest { model, stream: None })
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(ProviderError::ModelNotFound(model.to_string()));
        }
        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse model info: {e}")))
    }

    /// Download a model (`POST /api/pull`), reporting each progress line.
    ///
    /// An `error` line in the stream fails the pull.
    pub async fn pull_model<F>(&self, model: &str, mut on_progress: F) -> Result<(), ProviderError>
    where
        F: FnMut(&PullProgress),
    {
        let url = format!("{}/api/pull", self.base_url);
        debug!(provider = "ollama", model, "Pulling model");

        let response = self
            .client
            .post(&url)
            .timeout(PULL_TIMEOUT)
            .json(&ApiModelRequest {
                model,
                stream: Some(true),
            })
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Ollama refused pull");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let mut byte_stream = response.bytes_stream();
        let mut buffer = String::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let bytes = chunk_result.map_err(Self::map_send_error)?;
            buffer.push_str(&String::from_utf8_lossy(&bytes));

            while let Some(line_end) = buffer.find('\n') {
                let line = buffer[..line_end].to_string();
                buffer = buffer[line_end + 1..].to_string();
                if let Some(progress) = parse_pull_line(&line, status)? {
                    on_progress(&progress);
                }
            }
        }

        if let Some(progress) = parse_pull_line(&buffer, status)? {
            on_progress(&progress);
        }
        Ok(())
    }

    fn map_send_error(e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(e.to_string())
        } else {
            ProviderError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<String, ProviderError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = Self::build_request(&request);

        debug!(
            provider = "ollama",
            model = %request.model,
            messages = body.messages.len(),
            "Sending chat request"
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status().as_u16();

        if status == 404 {
            return Err(ProviderError::ModelNotFound(request.model));
        }

        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Ollama returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        Ok(api_response.message.content)
    }

    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let tags: ApiTagsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        Ok(response.status().is_success())
    }
}

/// Decode one line of the pull stream. Blank lines yield `None`.
fn parse_pull_line(line: &str, status: u16) -> Result<Option<PullProgress>, ProviderError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    trace!(line, "Pull status");
    let mut progress: PullProgress = serde_json::from_str(line)
        .map_err(|e| ProviderError::InvalidResponse(format!("Bad pull status line: {e}")))?;

    if let Some(error) = progress.error.take() {
        return Err(ProviderError::ApiError {
            status_code: status,
            message: error,
        });
    }
    Ok(Some(progress))
}

/// One status line from `/api/pull`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PullProgress {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub completed: Option<u64>,
    #[serde(default)]
    error: Option<String>,
}

impl PullProgress {
    /// Downloaded share of the current layer, when the server reports sizes.
    pub fn percent(&self) -> Option<u8> {
        match (self.completed, self.total) {
            (Some(done), Some(total)) if total > 0 => Some((done.min(total) * 100 / total) as u8),
            _ => None,
        }
    }
}

/// Metadata returned by `/api/show`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub details: ModelDetails,
    /// Modelfile `PARAMETER` lines, newline-separated
    #[serde(default)]
    pub parameters: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelDetails {
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub family: String,
    #[serde(default)]
    pub parameter_size: String,
    #[serde(default)]
    pub quantization_level: String,
}

// --- Ollama API types (internal) ---

#[derive(Debug, Serialize)]
struct ApiModelRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ApiChatRequest {
    model: String,
    messages: Vec<ApiMessage>,
    stream: bool,
    options: ApiOptions,
}

#[derive(Debug, Serialize)]
struct ApiOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiChatResponse {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiTagsResponse {
    #[serde(default)]
    models: Vec<ApiModel>,
}

#[derive(Debug, Deserialize)]
struct ApiModel {
    name: String,
}
