//! # Reagent Tools
//!
//! Builtin tools for the Reagent agent runtime.
//!
//! Tool input arrives as a single opaque string, because text-protocol
//! models emit free text after `Action Input:`. Each tool accepts either
//! a JSON object (what function-calling models produce) or plain text,
//! so the same tool works under both strategies.

use reagent_core::{Result, ToolRegistry};

pub mod calculator;
pub mod weather_lookup;

pub use calculator::CalculatorTool;
pub use weather_lookup::WeatherLookupTool;

/// A registry pre-loaded with the builtin tools.
pub fn default_registry() -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(WeatherLookupTool))?;
    registry.register(Box::new(CalculatorTool))?;
    Ok(registry)
}
