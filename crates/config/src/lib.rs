//! Configuration loading, validation, and management for Olla.
//!
//! Loads configuration from `~/.olla/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.olla/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model to chat with
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature for every generation call
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per generated response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Print tool usage after each turn
    #[serde(default)]
    pub verbose: bool,

    /// Replace the generated tool-catalog system prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Ollama backend settings
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Conversational memory settings
    #[serde(default)]
    pub memory: MemoryConfig,
}

fn default_model() -> String {
    "llama3".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. Generation calls never return otherwise.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:11434".into()
}
fn default_timeout_secs() -> u64 {
    120
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Soft ceiling on estimated tokens kept in the conversation
    #[serde(default = "default_memory_max_tokens")]
    pub max_tokens: usize,

    /// Estimated tokens per whitespace-delimited word
    #[serde(default = "default_token_factor")]
    pub token_factor: f64,
}

fn default_memory_max_tokens() -> usize {
    16_000
}
fn default_token_factor() -> f64 {
    1.3
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_memory_max_tokens(),
            token_factor: default_token_factor(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.olla/config.toml).
    ///
    /// Environment overrides:
    /// - `OLLA_MODEL` replaces `model`
    /// - `OLLAMA_HOST` replaces `ollama.base_url`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(model) = var("OLLA_MODEL").filter(|m| !m.is_empty()) {
            self.model = model;
        }
        if let Some(host) = var("OLLAMA_HOST").filter(|h| !h.is_empty()) {
            self.ollama.base_url = normalize_host(&host);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".olla")
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError("model must not be empty".into()));
        }

        if self.memory.token_factor <= 0.0 {
            return Err(ConfigError::ValidationError(
                "memory.token_factor must be > 0".into(),
            ));
        }

        if self.ollama.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "ollama.timeout_secs must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            verbose: false,
            system_prompt: None,
            ollama: OllamaConfig::default(),
            memory: MemoryConfig::default(),
        }
    }
}

/// `OLLAMA_HOST` is often given without a scheme (`127.0.0.1:11434`).
fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.model, "llama3");
        assert_eq!(config.ollama.base_url, "http://localhost:11434");
        assert_eq!(config.memory.max_tokens, 16_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.max_tokens, config.max_tokens);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_token_factor_rejected() {
        let mut config = AppConfig::default();
        config.memory.token_factor = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().model, "llama3");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = \"mistral\"\n\n[memory]\nmax_tokens = 500\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.model, "mistral");
        assert_eq!(config.memory.max_tokens, 500);
        assert!((config.memory.token_factor - 1.3).abs() < f64::EPSILON);
        assert_eq!(config.ollama.timeout_secs, 120);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = [").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn invalid_file_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "temperature = 3.5\n").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn env_overrides() {
        let mut config = AppConfig::default();
        config.apply_env(|key| match key {
            "OLLA_MODEL" => Some("phi3".into()),
            "OLLAMA_HOST" => Some("10.0.0.5:11434/".into()),
            _ => None,
        });
        assert_eq!(config.model, "phi3");
        assert_eq!(config.ollama.base_url, "http://10.0.0.5:11434");
    }

    #[test]
    fn empty_env_values_ignored() {
        let mut config = AppConfig::default();
        config.apply_env(|_| Some(String::new()));
        assert_eq!(config.model, "llama3");
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("llama3"));
        assert!(toml_str.contains("11434"));
    }
}
