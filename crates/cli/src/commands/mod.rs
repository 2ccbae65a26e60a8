//! Subcommand implementations.

pub mod chat;
pub mod doctor;
pub mod models;
pub mod onboard;
pub mod pull;
pub mod show;
pub mod tools;

use olla_config::AppConfig;

/// Command-line flags that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub verbose: bool,
}

impl Overrides {
    fn apply(self, config: &mut AppConfig) {
        if let Some(model) = self.model.filter(|m| !m.trim().is_empty()) {
            config.model = model;
        }
        config.verbose |= self.verbose;
    }
}

/// Load `~/.olla/config.toml` (plus env) and apply command-line overrides.
pub fn load_config(overrides: Overrides) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    overrides.apply(&mut config);
    Ok(config)
}
