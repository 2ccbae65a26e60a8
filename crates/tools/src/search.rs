//! Search tool: stub that returns mock search results.
//!
//! Results are deterministic and generated offline so the agent loop can be
//! exercised end-to-end without network access.

use async_trait::async_trait;
use olla_core::error::ToolError;
use olla_core::tool::{Tool, ToolParams, required_param};

const RESULT_COUNT: usize = 3;

pub struct SearchTool;

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Search the web for information"
    }

    async fn invoke(&self, params: &ToolParams) -> Result<String, ToolError> {
        let query = required_param(params, "query")?;

        let mut output = format!("Mock search results for: {query}");
        for (i, hit) in mock_results(query).iter().enumerate() {
            output.push_str(&format!("\n{}. {}", i + 1, hit));
        }
        Ok(output)
    }
}

fn mock_results(query: &str) -> Vec<String> {
    let q = query.to_lowercase();

    let topics: [(&str, [&str; RESULT_COUNT]); 2] = [
        ("rust", [
            "The Rust Programming Language (https://doc.rust-lang.org/book/)",
            "Rust by Example (https://doc.rust-lang.org/rust-by-example/)",
            "crates.io: Rust Package Registry (https://crates.io/)",
        ]),
        ("ollama", [
            "Ollama: run large language models locally (https://ollama.com/)",
            "Ollama API reference (https://github.com/ollama/ollama/blob/main/docs/api.md)",
            "Ollama model library (https://ollama.com/library)",
        ]),
    ];

    if let Some((_, hits)) = topics.iter().find(|(keyword, _)| q.contains(keyword)) {
        return hits.iter().map(|h| h.to_string()).collect();
    }

    (1..=RESULT_COUNT)
        .map(|i| format!("Result {i} for '{query}' (https://example.com/search?q={}&p={i})", query.replace(' ', "+")))
        .collect()
}
