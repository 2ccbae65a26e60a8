//! End-to-end tests for the Olla turn pipeline.
//!
//! These run a full agent over the real built-in tools, with a scripted
//! backend standing in for Ollama.

use std::sync::{Arc, Mutex};

use olla_agent::Agent;
use olla_core::error::ProviderError;
use olla_core::event::{DomainEvent, EventBus};
use olla_core::message::{ChatMessage, Role};
use olla_core::provider::{Provider, ProviderRequest};
use olla_memory::MemoryBudget;
use olla_tools::default_registry;

// ── Mock Provider ────────────────────────────────────────────────────────

/// A backend that returns scripted replies in sequence.
struct ScriptedProvider {
    responses: Mutex<Vec<String>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(responses: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.iter().map(|r| r.to_string()).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn last_request(&self) -> ProviderRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<String, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        if requests.len() >= responses.len() {
            panic!(
                "ScriptedProvider exhausted: call #{}, have {}",
                requests.len(),
                responses.len()
            );
        }
        let reply = responses[requests.len()].clone();
        requests.push(request);
        Ok(reply)
    }
}

fn agent_with(provider: Arc<ScriptedProvider>) -> Agent {
    let tools = Arc::new(default_registry().unwrap());
    Agent::builder(provider, tools).build()
}

// ── E2E: turns without tools ─────────────────────────────────────────────

#[tokio::test]
async fn e2e_plain_answer() {
    let provider = ScriptedProvider::new(&["The capital of France is Paris."]);
    let mut agent = agent_with(provider.clone());

    let reply = agent.process_user_input("What is the capital of France?").await.unwrap();

    assert_eq!(reply, "The capital of France is Paris.");
    assert_eq!(provider.calls(), 1);
    let roles: Vec<Role> = agent.history().iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
}

#[tokio::test]
async fn e2e_default_prompt_advertises_builtin_tools() {
    let provider = ScriptedProvider::new(&["hi"]);
    let mut agent = agent_with(provider.clone());
    agent.process_user_input("hello").await.unwrap();

    let request = provider.last_request();
    let prompt = request.system_prompt.unwrap();
    for name in ["search", "weather", "time", "write_file", "read_file", "calculate"] {
        assert!(prompt.contains(&format!("- {name}: ")), "prompt should list {name}");
    }
    assert_eq!(request.messages[0].content, prompt);
}

// ── E2E: tool turns ──────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_calculator_tool_invocation() {
    let provider = ScriptedProvider::new(&[
        r#"I will compute this. {"tool": "calculate", "parameters": {"expression": "2+2"}}"#,
        "2 + 2 equals 4.",
    ]);
    let mut agent = agent_with(provider.clone());

    let reply = agent.process_user_input("What is 2+2?").await.unwrap();

    assert_eq!(reply, "2 + 2 equals 4.");
    assert_eq!(provider.calls(), 2);

    let history = agent.history();
    let n = history.len();
    assert_eq!(history[n - 3], ChatMessage::new(Role::Assistant, "I will compute this. "));
    assert_eq!(
        history[n - 2],
        ChatMessage::new(Role::System, "Tool 'calculate' output: Result: 4")
    );
    assert_eq!(history[n - 1], ChatMessage::new(Role::Assistant, "2 + 2 equals 4."));
}

#[tokio::test]
async fn e2e_file_round_trip_through_tools() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("note.txt");
    let name = path.to_str().unwrap().replace('\\', "/");

    let write_call = format!(
        r#"{{"tool":"write_file","parameters":{{"content":"remember the milk","filename":"{name}"}}}}"#
    );
    let read_call = format!(r#"{{"tool":"read_file","parameters":{{"filename":"{name}"}}}}"#);
    let provider = ScriptedProvider::new(&[
        write_call.as_str(),
        "Saved.",
        read_call.as_str(),
        "It says: remember the milk",
    ]);
    let mut agent = agent_with(provider.clone());

    agent.process_user_input("save a note").await.unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "remember the milk");

    agent.process_user_input("what did I save?").await.unwrap();
    let history = agent.history();
    assert_eq!(
        history[history.len() - 2].content,
        "Tool 'read_file' output: remember the milk"
    );
}

#[tokio::test]
async fn e2e_unknown_tool_does_not_abort_turn() {
    let provider = ScriptedProvider::new(&[
        r#"{"tool":"stock_price","parameters":{"ticker":"ACME"}}"#,
        "I don't have a stock tool.",
    ]);
    let mut agent = agent_with(provider);

    let reply = agent.process_user_input("ACME price?").await.unwrap();
    assert_eq!(reply, "I don't have a stock tool.");
    assert!(agent.transcript().contains("SYSTEM: Tool 'stock_price' output: Unknown tool: stock_price"));
}

#[tokio::test]
async fn e2e_verbose_events_report_tool_usage() {
    let provider = ScriptedProvider::new(&[
        r#"{"tool":"time","parameters":{"timezone":"Nowhere/Land"}}"#,
        "That timezone doesn't exist.",
    ]);
    let bus = Arc::new(EventBus::default());
    let mut events = bus.subscribe();
    let mut agent = Agent::builder(provider, Arc::new(default_registry().unwrap()))
        .verbose(true)
        .event_bus(bus)
        .build();

    agent.process_user_input("time in Nowhere?").await.unwrap();

    let mut used = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let DomainEvent::ToolExecuted { tool_name, output, success, .. } = event.as_ref() {
            used.push((tool_name.clone(), output.clone(), *success));
        }
    }
    assert_eq!(
        used,
        vec![(
            "time".to_string(),
            "Unknown timezone: Nowhere/Land. Please use a valid timezone name.".to_string(),
            true
        )]
    );
}

// ── E2E: session lifecycle ───────────────────────────────────────────────

#[tokio::test]
async fn e2e_reset_then_continue() {
    let provider = ScriptedProvider::new(&["first", "second"]);
    let mut agent = agent_with(provider.clone());

    agent.process_user_input("one").await.unwrap();
    agent.reset();
    assert_eq!(agent.history().len(), 1);
    assert_eq!(agent.history()[0].role, Role::System);

    agent.process_user_input("two").await.unwrap();
    let request = provider.last_request();
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[1].content, "two");
}

#[tokio::test]
async fn e2e_long_session_stays_within_budget() {
    let answers: Vec<String> = (0..30).map(|i| format!("answer number {i} with a few extra words")).collect();
    let answer_refs: Vec<&str> = answers.iter().map(String::as_str).collect();
    let provider = ScriptedProvider::new(&answer_refs);

    let mut agent = Agent::builder(provider.clone(), Arc::new(default_registry().unwrap()))
        .system_prompt(Some("Be brief.".into()))
        .memory_budget(MemoryBudget::new(60))
        .build();

    for i in 0..30 {
        agent.process_user_input(&format!("question {i} about something")).await.unwrap();
        assert!(agent.memory().size_units() <= 60.0 || agent.memory().len() == 3);
    }

    let history = agent.history();
    assert_eq!(history.last().unwrap().content, "answer number 29 with a few extra words");
    // The system prompt was evicted, but every request still carries it.
    assert_ne!(history[0].role, Role::System);
    assert_eq!(provider.last_request().system_prompt.as_deref(), Some("Be brief."));
}
