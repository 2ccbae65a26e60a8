//! Weather tool: stub that returns mock weather data.
//!
//! The reading is derived from a hash of the location name, so the same
//! location always reports the same weather.

use async_trait::async_trait;
use olla_core::error::ToolError;
use olla_core::tool::{Tool, ToolParams, required_param};

pub struct WeatherTool;

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "weather"
    }

    fn description(&self) -> &str {
        "Get the current weather for a location"
    }

    async fn invoke(&self, params: &ToolParams) -> Result<String, ToolError> {
        let location = required_param(params, "location")?;
        let units = params.get("units").map(String::as_str).unwrap_or("imperial");

        let reading = mock_reading(location);
        let (temperature, label) = if units == "metric" {
            (reading.celsius, "°C")
        } else {
            (reading.celsius * 9 / 5 + 32, "°F")
        };

        Ok(format!(
            "Mock weather for {location}: {temperature}{label}, {}, humidity {}%",
            reading.conditions, reading.humidity
        ))
    }
}

struct Reading {
    celsius: i32,
    conditions: &'static str,
    humidity: u32,
}

const CONDITIONS: [&str; 8] = [
    "Clear skies",
    "Partly Cloudy",
    "Overcast",
    "Light rain",
    "Heavy rain",
    "Thunderstorms",
    "Snow",
    "Foggy",
];

fn mock_reading(location: &str) -> Reading {
    let hash: u32 = location
        .to_lowercase()
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));

    Reading {
        celsius: (hash % 40) as i32 - 5,
        conditions: CONDITIONS[(hash as usize / 7) % CONDITIONS.len()],
        humidity: 30 + hash % 60,
    }
}
