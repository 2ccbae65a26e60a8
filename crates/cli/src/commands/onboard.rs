//! `olla onboard`: First-time setup.

use std::path::Path;
use olla_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("  Olla: First-Time Setup");
    println!("  =======================\n");

    let config_path = AppConfig::config_path();
    if write_default_config(&config_path)? {
        println!("  Created config.toml at: {}", config_path.display());
        println!("\n  Next steps:");
        println!("    1. Start Ollama:        ollama serve");
        println!("    2. Pull a model:        olla pull llama3");
        println!("    3. Check the setup:     olla doctor");
        println!("    4. Start chatting:      olla chat");
    } else {
        println!("  Config already exists at: {}", config_path.display());
        println!("  Edit it manually or delete and re-run onboard.");
    }
    println!();

    Ok(())
}

/// Write the default config unless one exists. Returns whether it was written.
fn write_default_config(path: &Path) -> std::io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, AppConfig::default_toml())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_once_and_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".olla").join("config.toml");

        assert!(write_default_config(&path).unwrap());
        assert!(!write_default_config(&path).unwrap());

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.model, "llama3");
    }
}
