//! The turn controller.

use std::sync::Arc;
use std::time::Instant;
use chrono::Utc;
use olla_core::event::{DomainEvent, EventBus};
use olla_core::message::{ChatMessage, Role};
use olla_core::provider::{Provider, ProviderRequest, default_temperature};
use olla_core::tool::ToolRegistry;
use olla_memory::{Memory, MemoryBudget};
use tracing::{debug, info, warn};
use crate::prompt::default_system_prompt;
use crate::tool_call;

/// Number of characters of user input carried in a `TurnStarted` event.
const PREVIEW_CHARS: usize = 80;

/// One conversation session: a model, its system prompt, the bounded message
/// log, and the tools the model may call.
///
/// The system prompt is always the first message of a fresh (or reset)
/// session. A turn borrows the agent mutably, so turns never interleave.
pub struct Agent {
    session_id: String,
    model: String,
    system_prompt: String,
    temperature: f32,
    max_tokens: Option<u32>,
    memory: Memory,
    tools: Arc<ToolRegistry>,
    provider: Arc<dyn Provider>,
    verbose: bool,
    event_bus: Arc<EventBus>,
}

/// Builder for [`Agent`].
pub struct AgentBuilder {
    provider: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
    model: String,
    system_prompt: Option<String>,
    temperature: f32,
    max_tokens: Option<u32>,
    budget: MemoryBudget,
    verbose: bool,
    event_bus: Option<Arc<EventBus>>,
}

impl AgentBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Replace the generated tool-catalog prompt. `None` keeps the default.
    pub fn system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn memory_budget(mut self, budget: MemoryBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Publish turn events on a shared bus instead of a private one.
    pub fn event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn build(self) -> Agent {
        let system_prompt = self
            .system_prompt
            .unwrap_or_else(|| default_system_prompt(&self.tools));

        let mut memory = Memory::new(self.budget);
        memory.append(Role::System, system_prompt.clone());

        let session_id = uuid::Uuid::new_v4().to_string();
        debug!(
            session_id = %session_id,
            model = %self.model,
            tools = self.tools.len(),
            "Agent session created"
        );

        Agent {
            session_id,
            model: self.model,
            system_prompt,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            memory,
            tools: self.tools,
            provider: self.provider,
            verbose: self.verbose,
            event_bus: self.event_bus.unwrap_or_default(),
        }
    }
}

impl Agent {
    /// Start building an agent over a backend and a tool set.
    pub fn builder(provider: Arc<dyn Provider>, tools: Arc<ToolRegistry>) -> AgentBuilder {
        AgentBuilder {
            provider,
            tools,
            model: "llama3".into(),
            system_prompt: None,
            temperature: default_temperature(),
            max_tokens: None,
            budget: MemoryBudget::default(),
            verbose: false,
            event_bus: None,
        }
    }

    /// Process one user turn and return the reply shown to the user.
    ///
    /// 1. Append the user message and generate a response
    /// 2. If the response embeds a tool call: record the text around it,
    ///    run the tool, record its output, and generate a follow-up
    /// 3. Record and return the final response
    ///
    /// A backend failure ends the turn with an error and is never retried.
    /// Whatever was appended before the failure stays in memory.
    pub async fn process_user_input(&mut self, input: &str) -> olla_core::Result<String> {
        info!(session_id = %self.session_id, "Processing user input");
        self.event_bus.publish(DomainEvent::TurnStarted {
            session_id: self.session_id.clone(),
            content_preview: input.chars().take(PREVIEW_CHARS).collect(),
            timestamp: Utc::now(),
        });

        self.remember(Role::User, input);
        let response = self.generate(false).await?;

        let parsed = tool_call::parse(&response);
        let Some(call) = parsed.tool_call else {
            debug!(session_id = %self.session_id, "No tool call in response");
            self.remember(Role::Assistant, response.as_str());
            return Ok(response);
        };

        debug!(
            session_id = %self.session_id,
            tool = %call.tool_name,
            params = call.parameters.len(),
            "Tool call detected"
        );
        self.remember(Role::Assistant, parsed.residual);

        let start = Instant::now();
        let result = self.tools.execute(&call.tool_name, &call.parameters).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        debug!(
            session_id = %self.session_id,
            tool = %call.tool_name,
            success = result.success,
            duration_ms,
            "Tool executed"
        );
        self.event_bus.publish(DomainEvent::ToolExecuted {
            tool_name: call.tool_name.clone(),
            output: result.output.clone(),
            success: result.success,
            duration_ms,
            timestamp: Utc::now(),
        });

        self.remember(
            Role::System,
            format!("Tool '{}' output: {}", call.tool_name, result.output),
        );

        let followup = self.generate(true).await?;
        self.remember(Role::Assistant, followup.as_str());
        Ok(followup)
    }

    /// One generation call over the current memory snapshot.
    async fn generate(&self, followup: bool) -> olla_core::Result<String> {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages: self.memory.snapshot_for_generation(),
            system_prompt: Some(self.system_prompt.clone()),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(
            session_id = %self.session_id,
            provider = self.provider.name(),
            messages = request.messages.len(),
            followup,
            "Calling generation backend"
        );

        match self.provider.complete(request).await {
            Ok(text) => {
                self.event_bus.publish(DomainEvent::ResponseGenerated {
                    session_id: self.session_id.clone(),
                    model: self.model.clone(),
                    followup,
                    timestamp: Utc::now(),
                });
                Ok(text)
            }
            Err(e) => {
                warn!(session_id = %self.session_id, error = %e, followup, "Generation failed");
                self.event_bus.publish(DomainEvent::ErrorOccurred {
                    context: (if followup { "followup generation" } else { "generation" }).into(),
                    error_message: e.to_string(),
                    timestamp: Utc::now(),
                });
                Err(e.into())
            }
        }
    }

    fn remember(&mut self, role: Role, content: impl Into<String>) {
        let evicted = self.memory.append(role, content);
        if evicted > 0 {
            self.event_bus.publish(DomainEvent::MemoryEvicted {
                session_id: self.session_id.clone(),
                evicted,
                retained: self.memory.len(),
                timestamp: Utc::now(),
            });
        }
    }

    /// Forget the conversation, keeping only the system prompt.
    pub fn reset(&mut self) {
        self.memory.clear();
        self.memory.append(Role::System, self.system_prompt.clone());
        info!(session_id = %self.session_id, "Conversation reset");
        self.event_bus.publish(DomainEvent::SessionReset {
            session_id: self.session_id.clone(),
            timestamp: Utc::now(),
        });
    }

    /// The retained conversation as `ROLE: content` blocks.
    pub fn transcript(&self) -> String {
        self.memory.render_transcript()
    }

    pub fn history(&self) -> Vec<ChatMessage> {
        self.memory.snapshot_for_generation()
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }
}
