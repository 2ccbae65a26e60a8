//! Olla CLI: the main entry point.
//!
//! Commands:
//! - `chat`: Interactive chat or single-message mode (the default)
//! - `models`: List the models the Ollama server has pulled
//! - `pull`: Download a model onto the Ollama server
//! - `show`: Print a model's metadata
//! - `tools`: Show the tool catalog advertised to the model
//! - `doctor`: Diagnose configuration and backend health
//! - `onboard`: Write a default config file

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "olla",
    about = "Olla: a tool-using chat agent for local Ollama models",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Model to use (overrides config and OLLA_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Show tool usage and enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the agent
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// List models available on the Ollama server
    Models,

    /// Download a model (defaults to the configured one)
    Pull {
        /// Model name, e.g. `llama3` or `mistral:7b`
        name: Option<String>,
    },

    /// Show a model's details (defaults to the configured one)
    Show {
        /// Model name, e.g. `llama3` or `mistral:7b`
        name: Option<String>,
    },

    /// List the built-in tools
    Tools,

    /// Diagnose configuration and backend health
    Doctor,

    /// Write a default configuration file
    Onboard,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let overrides = commands::Overrides {
        model: cli.model,
        verbose: cli.verbose,
    };

    match cli.command.unwrap_or(Commands::Chat { message: None }) {
        Commands::Chat { message } => commands::chat::run(overrides, message).await?,
        Commands::Models => commands::models::run(overrides).await?,
        Commands::Pull { name } => commands::pull::run(overrides, name).await?,
        Commands::Show { name } => commands::show::run(overrides, name).await?,
        Commands::Tools => commands::tools::run().await?,
        Commands::Doctor => commands::doctor::run(overrides).await?,
        Commands::Onboard => commands::onboard::run().await?,
    }

    Ok(())
}
