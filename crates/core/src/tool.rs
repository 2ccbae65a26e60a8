//! Tool trait: the abstraction over agent capabilities.
//!
//! Tools are what give the agent the ability to act: do arithmetic, look up
//! the time, read and write files, etc. A tool is a named function from a
//! flat string-keyed parameter map to text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};
use crate::error::ToolError;

/// Parameters of a tool invocation: string keys to string values.
pub type ToolParams = HashMap<String, String>;

/// The observable outcome of [`ToolRegistry::execute`].
///
/// `output` is always present; failures are rendered as text so they can be
/// fed back to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the tool was found and executed successfully
    pub success: bool,

    /// The output content (or the rendered error)
    pub output: String,
}

/// A `name: description` pair advertised in the system prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescription {
    pub name: String,
    pub description: String,
}

impl std::fmt::Display for ToolDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.description)
    }
}

/// The core Tool trait.
///
/// Each tool (calculate, time, read_file, ...) implements this trait and is
/// registered once in a [`ToolRegistry`] when the agent is built.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "calculate").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the model).
    fn description(&self) -> &str;

    /// Run the tool. Any error is converted to text by the registry.
    async fn invoke(&self, params: &ToolParams) -> std::result::Result<String, ToolError>;
}

/// Fetch a required parameter or fail with `InvalidArguments`.
pub fn required_param<'a>(params: &'a ToolParams, key: &str) -> std::result::Result<&'a str, ToolError> {
    params
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| ToolError::InvalidArguments(format!("missing required parameter '{key}'")))
}

/// An ordered registry of available tools.
///
/// The agent uses this to:
/// 1. Describe the tools in its system prompt, in registration order
/// 2. Look up and execute tools when the model requests them
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a registry from an ordered list of tools, rejecting duplicate names.
    pub fn from_tools(
        tools: impl IntoIterator<Item = Box<dyn Tool>>,
    ) -> std::result::Result<Self, ToolError> {
        let mut registry = Self::new();
        for tool in tools {
            registry.register(tool)?;
        }
        Ok(registry)
    }

    /// Register a tool. A name that is already taken is an error.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> std::result::Result<(), ToolError> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(ToolError::DuplicateName(name));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.index.get(name).map(|&i| self.tools[i].as_ref())
    }

    /// All `name: description` pairs, in registration order.
    pub fn describe_all(&self) -> Vec<ToolDescription> {
        self.tools
            .iter()
            .map(|t| ToolDescription {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect()
    }

    /// Execute a tool by exact name. Never fails: a missing tool or a tool
    /// error becomes the textual output of an unsuccessful result.
    pub async fn execute(&self, name: &str, params: &ToolParams) -> ToolResult {
        let Some(tool) = self.get(name) else {
            warn!(tool = %name, "Requested tool is not registered");
            return ToolResult {
                success: false,
                output: format!("Unknown tool: {name}"),
            };
        };

        match tool.invoke(params).await {
            Ok(output) => {
                debug!(tool = %name, bytes = output.len(), "Tool executed");
                ToolResult {
                    success: true,
                    output,
                }
            }
            Err(e) => {
                warn!(tool = %name, error = %e, "Tool execution failed");
                ToolResult {
                    success: false,
                    output: format!("Error executing tool '{name}': {e}"),
                }
            }
        }
    }

    /// List all registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
