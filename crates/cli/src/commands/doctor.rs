//! `olla doctor`: Diagnose configuration and backend health.

use olla_config::AppConfig;
use olla_core::provider::Provider;
use super::Overrides;
use super::models::is_configured;

pub async fn run(overrides: Overrides) -> Result<(), Box<dyn std::error::Error>> {
    println!("  Olla Doctor: System Diagnostics");
    println!("  ================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_path();
    if config_path.exists() {
        println!("  [ok]   Config file found: {}", config_path.display());
    } else {
        println!("  [warn] No config file, using defaults. Run `olla onboard` to create one.");
    }

    let config = match super::load_config(overrides) {
        Ok(config) => {
            println!("  [ok]   Config valid (model: {})", config.model);
            config
        }
        Err(e) => {
            println!("  [fail] {e}");
            println!("\n  1 issue(s) found. See above for details.");
            return Ok(());
        }
    };

    let provider = olla_providers::build_from_config(&config)?;
    match provider.health_check().await {
        Ok(true) => println!("  [ok]   Ollama reachable at {}", config.ollama.base_url),
        Ok(false) => {
            println!("  [fail] Ollama at {} answered with an error", config.ollama.base_url);
            issues += 1;
        }
        Err(e) => {
            println!("  [fail] Ollama unreachable at {}: {e}", config.ollama.base_url);
            println!("         Is `ollama serve` running? Set OLLAMA_HOST to use another address.");
            issues += 1;
        }
    }

    if issues == 0 {
        match provider.list_models().await {
            Ok(models) if models.iter().any(|m| is_configured(m, &config.model)) => {
                println!("  [ok]   Model '{}' is available", config.model);
            }
            Ok(_) => {
                println!("  [fail] Model '{}' not pulled. Run `olla pull {}`.", config.model, config.model);
                issues += 1;
            }
            Err(e) => {
                println!("  [fail] Could not list models: {e}");
                issues += 1;
            }
        }
    }

    let tools = olla_tools::default_registry()?;
    println!("  [ok]   {} tools registered", tools.len());

    println!();
    if issues == 0 {
        println!("  All checks passed!");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
