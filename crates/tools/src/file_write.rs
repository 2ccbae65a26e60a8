//! File write tool. Creates the file or overwrites it.

use async_trait::async_trait;
use olla_core::error::ToolError;
use olla_core::tool::{Tool, ToolParams, required_param};
use tracing::debug;

pub struct FileWriteTool;

#[async_trait]
impl Tool for FileWriteTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file"
    }

    async fn invoke(&self, params: &ToolParams) -> Result<String, ToolError> {
        let content = required_param(params, "content")?;
        let filename = required_param(params, "filename")?;

        tokio::fs::write(filename, content)
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("Error writing to file: {e}")))?;

        debug!(filename, bytes = content.len(), "Wrote file");
        Ok(format!("Successfully wrote content to {filename}"))
    }
}
