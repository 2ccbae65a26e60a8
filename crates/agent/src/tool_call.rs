//! Detection of an embedded tool invocation in generated text.
//!
//! The model requests a tool by writing a JSON object of the form
//! `{"tool": "<name>", "parameters": {"<key>": "<value>", ...}}` anywhere in
//! its reply. Only the first such object is honored, and `parameters` may not
//! contain nested braces.

use olla_core::tool::ToolParams;
use regex_lite::Regex;
use serde::Deserialize;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::debug;

const TOOL_CALL_PATTERN: &str =
    r#"\{\s*"tool"\s*:\s*"([^"]+)"\s*,\s*"parameters"\s*:\s*\{([^}]+)\}\s*\}"#;

static TOOL_CALL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(TOOL_CALL_PATTERN).ok());

/// A tool invocation found in model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub tool_name: String,
    pub parameters: ToolParams,
    /// Byte range of the invocation in the source text.
    pub span: Range<usize>,
}

/// Result of scanning one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub tool_call: Option<ToolCall>,
    /// The reply with the invocation cut out, or the reply unchanged.
    pub residual: String,
}

#[derive(Deserialize)]
struct RawToolCall {
    tool: String,
    parameters: serde_json::Map<String, serde_json::Value>,
}

/// Find the first tool invocation in `text`.
pub fn parse(text: &str) -> ParsedReply {
    match find_tool_call(text) {
        Some(call) => {
            let mut residual = String::with_capacity(text.len() - call.span.len());
            residual.push_str(&text[..call.span.start]);
            residual.push_str(&text[call.span.end..]);
            ParsedReply {
                tool_call: Some(call),
                residual,
            }
        }
        None => ParsedReply {
            tool_call: None,
            residual: text.to_string(),
        },
    }
}

fn find_tool_call(text: &str) -> Option<ToolCall> {
    let re = TOOL_CALL_RE.as_ref()?;
    let found = re.find(text)?;

    let raw: RawToolCall = match serde_json::from_str(found.as_str()) {
        Ok(raw) => raw,
        Err(e) => {
            debug!(error = %e, "Tool call shape matched but JSON is malformed");
            return None;
        }
    };

    let mut parameters = ToolParams::with_capacity(raw.parameters.len());
    for (key, value) in raw.parameters {
        let value = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            other => {
                debug!(key = %key, value = %other, "Unsupported tool parameter value");
                return None;
            }
        };
        parameters.insert(key, value);
    }

    Some(ToolCall {
        tool_name: raw.tool,
        parameters,
        span: found.range(),
    })
}
