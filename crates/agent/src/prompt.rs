//! The default system prompt, built from the tool catalog.

use olla_core::tool::ToolRegistry;

/// Render the system prompt advertising every registered tool.
pub fn default_system_prompt(tools: &ToolRegistry) -> String {
    let catalog = tools
        .describe_all()
        .iter()
        .map(|d| format!("- {d}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a helpful AI assistant that can use tools to assist the user.\n\
         \n\
         AVAILABLE TOOLS:\n\
         {catalog}\n\
         \n\
         To use a tool, respond with a JSON object in the following format: \
         {{\"tool\":\"tool_name\",\"parameters\":{{\"param1\":\"value1\",\"param2\":\"value2\"}}}}\n\
         \n\
         If you don't need to use a tool, just respond normally.\n\
         If a user requests something that would be better handled by a tool, use the appropriate tool.\n\
         Always provide thoughtful, helpful responses and prioritize solving the user's problem."
    )
}
