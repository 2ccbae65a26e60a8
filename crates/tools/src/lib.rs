//! Built-in tool implementations for Olla.
//!
//! Tools give the agent the ability to act: search, check the weather,
//! tell the time, read and write files, and do math.

pub mod calculator;
pub mod file_read;
pub mod file_write;
pub mod search;
pub mod time;
pub mod weather;

use olla_core::error::ToolError;
use olla_core::tool::{Tool, ToolRegistry};

/// The standard tools, in the order they are advertised to the model.
pub fn default_tools() -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(search::SearchTool),
        Box::new(weather::WeatherTool),
        Box::new(time::TimeTool),
        Box::new(file_write::FileWriteTool),
        Box::new(file_read::FileReadTool),
        Box::new(calculator::CalculatorTool),
    ]
}

/// Create a registry holding every standard tool.
pub fn default_registry() -> Result<ToolRegistry, ToolError> {
    ToolRegistry::from_tools(default_tools())
}
