//! Weather lookup tool: stub that returns mock weather data.
//!
//! In production this would call a real weather API (OpenWeatherMap, etc.).
//! The stub returns plausible weather data so the agent loop can be tested
//! end-to-end without network access.

use async_trait::async_trait;
use serde_json::Value;

use reagent_core::error::ToolError;
use reagent_core::tool::Tool;

pub struct WeatherLookupTool;

#[async_trait]
impl Tool for WeatherLookupTool {
    fn name(&self) -> &str {
        "lookup_weather"
    }

    fn description(&self) -> &str {
        "Look up current weather conditions for a location. Returns temperature, conditions, humidity, and wind speed."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The city name or location to look up weather for"
                },
                "units": {
                    "type": "string",
                    "enum": ["metric", "imperial"],
                    "description": "Temperature units (default: metric)",
                    "default": "metric"
                }
            },
            "required": ["location"]
        })
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let (location, units) = parse_input(input)?;
        let weather = generate_mock_weather(&location, &units);
        serde_json::to_string_pretty(&weather)
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "lookup_weather".into(),
                reason: e.to_string(),
            })
    }
}

/// Accept either a JSON object (`{"location": "Tokyo", "units": "metric"}`)
/// or plain text naming the location.
fn parse_input(input: &str) -> Result<(String, String), ToolError> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(input) {
        let location = map
            .get("location")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidInput("missing 'location' field".into()))?;
        let units = map
            .get("units")
            .and_then(Value::as_str)
            .unwrap_or("metric");
        return Ok((location.to_string(), units.to_string()));
    }

    let location = input.trim();
    if location.is_empty() {
        return Err(ToolError::InvalidInput("no location given".into()));
    }
    Ok((location.to_string(), "metric".into()))
}

#[derive(serde::Serialize)]
struct WeatherData {
    location: String,
    temperature: f64,
    units: String,
    conditions: String,
    humidity: u32,
    wind_speed: f64,
    wind_direction: String,
}

/// Generate deterministic mock weather based on location name hash.
fn generate_mock_weather(location: &str, units: &str) -> WeatherData {
    // Simple hash for deterministic but varied results.
    let hash: u32 = location
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));

    let conditions_list = [
        "Clear skies",
        "Partly cloudy",
        "Overcast",
        "Light rain",
        "Heavy rain",
        "Thunderstorms",
        "Snow",
        "Foggy",
    ];

    let wind_dirs = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

    let base_temp_c = ((hash % 40) as f64) - 5.0; // -5 to 35°C
    let (temperature, unit_label) = if units == "imperial" {
        (base_temp_c * 9.0 / 5.0 + 32.0, "°F")
    } else {
        (base_temp_c, "°C")
    };

    WeatherData {
        location: location.to_string(),
        temperature: (temperature * 10.0).round() / 10.0,
        units: unit_label.to_string(),
        conditions: conditions_list[(hash as usize / 7) % conditions_list.len()].to_string(),
        humidity: 30 + (hash % 60),
        wind_speed: ((hash % 30) as f64) + 5.0,
        wind_direction: wind_dirs[(hash as usize / 3) % wind_dirs.len()].to_string(),
    }
}
