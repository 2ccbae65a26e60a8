//! `olla chat`: Interactive or single-message chat mode.

use std::io::Write;
use std::sync::Arc;
use olla_agent::Agent;
use olla_config::AppConfig;
use olla_core::event::{DomainEvent, EventBus};
use olla_memory::MemoryBudget;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use super::Overrides;

/// A line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Exit,
    Reset,
    History,
    Empty,
    Message(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    let line = line.trim();
    match line.to_lowercase().as_str() {
        "exit" | "quit" => Input::Exit,
        "reset" => Input::Reset,
        "history" => Input::History,
        "" => Input::Empty,
        _ => Input::Message(line),
    }
}

pub fn build_agent(config: &AppConfig) -> Result<Agent, Box<dyn std::error::Error>> {
    let provider = olla_providers::build_from_config(config)?;
    let tools = Arc::new(olla_tools::default_registry()?);

    Ok(Agent::builder(provider, tools)
        .model(&config.model)
        .system_prompt(config.system_prompt.clone())
        .temperature(config.temperature)
        .max_tokens(config.max_tokens)
        .memory_budget(
            MemoryBudget::new(config.memory.max_tokens).with_token_factor(config.memory.token_factor),
        )
        .verbose(config.verbose)
        .event_bus(Arc::new(EventBus::default()))
        .build())
}

/// Print the tools used during the last turn.
fn print_tool_usage(events: &mut broadcast::Receiver<Arc<DomainEvent>>) {
    while let Ok(event) = events.try_recv() {
        if let DomainEvent::ToolExecuted { tool_name, output, .. } = event.as_ref() {
            println!();
            println!("  Used tool: {tool_name}");
            println!("  Tool response: {output}");
        }
    }
}

pub async fn run(overrides: Overrides, message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(overrides)?;
    let mut agent = build_agent(&config)?;
    let mut events = agent.event_bus().subscribe();

    if let Some(msg) = message {
        let response = agent.process_user_input(&msg).await?;
        if agent.is_verbose() {
            print_tool_usage(&mut events);
        }
        println!("{response}");
        return Ok(());
    }

    println!();
    println!("  ===== Olla Agent =====");
    println!();
    println!("  Model:     {}", agent.model());
    println!("  Backend:   {}", config.ollama.base_url);
    println!("  Tools:     {}", agent.tools().names().join(", "));
    println!();
    println!("  Type 'exit' or 'quit' to end the session.");
    println!("  Type 'reset' to reset the conversation, 'history' to show it.");
    println!();

    let mut lines = BufReader::new(io::stdin()).lines();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!("\n\n  Session terminated by user.");
                break;
            }
        };
        let Some(line) = line else {
            break;
        };

        match classify(&line) {
            Input::Exit => break,
            Input::Empty => continue,
            Input::Reset => {
                agent.reset();
                println!("  Conversation reset.");
                println!();
            }
            Input::History => {
                println!();
                println!("{}", agent.transcript());
                println!();
            }
            Input::Message(text) => {
                eprint!("  ...");
                let outcome = tokio::select! {
                    outcome = agent.process_user_input(text) => outcome,
                    _ = tokio::signal::ctrl_c() => {
                        eprint!("\r     \r");
                        println!("\n  Session terminated by user.");
                        break;
                    }
                };
                eprint!("\r     \r");

                match outcome {
                    Ok(response) => {
                        if agent.is_verbose() {
                            print_tool_usage(&mut events);
                        }
                        println!();
                        for line in response.lines() {
                            println!("  Agent > {line}");
                        }
                        println!();
                    }
                    Err(e) => {
                        // Drop events from the failed turn.
                        while events.try_recv().is_ok() {}
                        eprintln!("  [Error] {e}");
                        println!();
                    }
                }
            }
        }
    }

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}
