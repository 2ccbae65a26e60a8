//! File read tool.

use async_trait::async_trait;
use olla_core::error::ToolError;
use olla_core::tool::{Tool, ToolParams, required_param};

pub struct FileReadTool;

#[async_trait]
impl Tool for FileReadTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read content from a file"
    }

    async fn invoke(&self, params: &ToolParams) -> Result<String, ToolError> {
        let filename = required_param(params, "filename")?;

        if !tokio::fs::try_exists(filename).await.unwrap_or(false) {
            return Ok(format!("File not found: {filename}"));
        }

        let content = tokio::fs::read_to_string(filename)
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("Error reading file: {e}")))?;
        Ok(content)
    }
}
