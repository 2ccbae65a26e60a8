//! `olla show`: Print a model's metadata.

use olla_providers::ModelInfo;
use super::Overrides;

pub async fn run(overrides: Overrides, model: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(overrides)?;
    let model = model.unwrap_or_else(|| config.model.clone());
    let ollama = olla_providers::ollama_from_config(&config)?;

    let info = ollama
        .show_model(&model)
        .await
        .map_err(|e| format!("Could not show '{model}': {e}. Pull it with `olla pull {model}`."))?;

    for line in describe(&model, &info) {
        println!("{line}");
    }
    Ok(())
}

fn describe(model: &str, info: &ModelInfo) -> Vec<String> {
    let details = &info.details;
    let mut lines = vec![format!("  Model:         {model}")];

    for (label, value) in [
        ("Family", &details.family),
        ("Parameters", &details.parameter_size),
        ("Quantization", &details.quantization_level),
        ("Format", &details.format),
    ] {
        if !value.is_empty() {
            lines.push(format!("  {:<15}{value}", format!("{label}:")));
        }
    }

    if let Some(parameters) = info.parameters.as_deref().filter(|p| !p.trim().is_empty()) {
        lines.push("  Options:".into());
        lines.extend(parameters.lines().map(|p| format!("    {}", p.trim())));
    }
    lines
}
