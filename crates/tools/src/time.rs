//! Time tool: current wall-clock time in an IANA timezone.

use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::Tz;
use olla_core::error::ToolError;
use olla_core::tool::{Tool, ToolParams};

pub const DEFAULT_TIMEZONE: &str = "UTC";

pub struct TimeTool;

#[async_trait]
impl Tool for TimeTool {
    fn name(&self) -> &str {
        "time"
    }

    fn description(&self) -> &str {
        "Get the current time in a specific timezone"
    }

    async fn invoke(&self, params: &ToolParams) -> Result<String, ToolError> {
        let timezone = params
            .get("timezone")
            .map(|tz| tz.trim())
            .filter(|tz| !tz.is_empty())
            .unwrap_or(DEFAULT_TIMEZONE);

        Ok(current_time_in(timezone))
    }
}

fn current_time_in(timezone: &str) -> String {
    match timezone.parse::<Tz>() {
        Ok(tz) => {
            let now = Utc::now().with_timezone(&tz);
            format!(
                "Current time in {timezone}: {}",
                now.format("%Y-%m-%d %H:%M:%S %Z")
            )
        }
        Err(_) => format!("Unknown timezone: {timezone}. Please use a valid timezone name."),
    }
}
