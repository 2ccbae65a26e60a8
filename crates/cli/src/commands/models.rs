//! `olla models`: List the models pulled on the Ollama server.

use olla_core::provider::Provider;
use super::Overrides;

pub async fn run(overrides: Overrides) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(overrides)?;
    let provider = olla_providers::build_from_config(&config)?;

    let models = provider
        .list_models()
        .await
        .map_err(|e| format!("Could not reach Ollama at {}: {e}", config.ollama.base_url))?;

    if models.is_empty() {
        println!("  No models found. Pull one with `olla pull {}`.", config.model);
        return Ok(());
    }

    println!("  Models on {}:", config.ollama.base_url);
    for name in &models {
        let marker = if is_configured(name, &config.model) { "*" } else { " " };
        println!("  {marker} {name}");
    }
    println!();
    println!("  * = configured model ({})", config.model);

    Ok(())
}

/// `llama3` matches the server's `llama3:latest`.
pub(crate) fn is_configured(listed: &str, configured: &str) -> bool {
    listed == configured || listed.strip_suffix(":latest") == Some(configured)
}
