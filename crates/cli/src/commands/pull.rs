//! `olla pull`: Download a model onto the Ollama server.

use std::io::Write;
use olla_providers::PullProgress;
use super::Overrides;

pub async fn run(overrides: Overrides, model: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(overrides)?;
    let model = model.unwrap_or_else(|| config.model.clone());
    let ollama = olla_providers::ollama_from_config(&config)?;

    println!("  Pulling '{model}' from {}", config.ollama.base_url);

    let mut on_progress_line = false;
    ollama
        .pull_model(&model, |progress| {
            let line = progress_line(progress);
            if progress.percent().is_some() {
                print!("\r  {line}");
                let _ = std::io::stdout().flush();
                on_progress_line = true;
            } else {
                if on_progress_line {
                    println!();
                    on_progress_line = false;
                }
                println!("  {line}");
            }
        })
        .await
        .map_err(|e| format!("Failed to pull '{model}': {e}"))?;

    if on_progress_line {
        println!();
    }
    Ok(())
}

/// `pulling 6a0746a1ec1a  50%`, or the bare status when no sizes are known.
fn progress_line(progress: &PullProgress) -> String {
    match progress.percent() {
        Some(pct) => format!("{} {pct:>3}%", progress.status),
        None => progress.status.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(json: &str) -> PullProgress {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn sized_status_shows_percentage() {
        let p = progress(r#"{"status":"pulling 6a0746a1ec1a","total":200,"completed":50}"#);
        assert_eq!(progress_line(&p), "pulling 6a0746a1ec1a  25%");
    }

    #[test]
    fn plain_status_is_unchanged() {
        assert_eq!(progress_line(&progress(r#"{"status":"verifying sha256 digest"}"#)), "verifying sha256 digest");
    }
}
