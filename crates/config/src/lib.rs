//! Configuration loading, validation, and management for Reagent.
//!
//! Loads configuration from a TOML file with environment variable
//! overrides. Validates all settings at startup; a bad configuration
//! never reaches the agent loop.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use reagent_core::{Error, Result};

/// Configuration for a single agent loop run.
///
/// Maps directly to `reagent.toml`. Every field has a sensible default so
/// an empty file (or no file at all) yields a working configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopConfig {
    /// Model-family key, used both to select templates and to address
    /// the model client (e.g., "gpt3", "gpt4", "gpt3-v2").
    #[serde(default = "default_model_key")]
    pub model_key: String,

    /// Persona name woven into the assembled prompt, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_name: Option<String>,

    /// Free-form operator instructions appended to the assembled prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,

    /// Maximum reasoning iterations per turn.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Token budget per turn (prompt + all completions).
    #[serde(default = "default_token_budget")]
    pub token_budget: usize,

    /// How many corrective re-prompts a turn may spend on malformed
    /// completions before giving up.
    #[serde(default = "default_recovery_retries")]
    pub recovery_retries: u32,

    /// Timeout for a single model request, in seconds.
    #[serde(default = "default_model_timeout")]
    pub model_timeout_secs: u64,

    /// Timeout for a single tool invocation, in seconds.
    #[serde(default = "default_tool_timeout")]
    pub tool_timeout_secs: u64,

    /// Token budget for the windowed conversation history included in
    /// each prompt.
    #[serde(default = "default_memory_window")]
    pub memory_window_tokens: usize,
}

fn default_model_key() -> String {
    "gpt3".into()
}
fn default_max_iterations() -> u32 {
    8
}
fn default_token_budget() -> usize {
    4096
}
fn default_recovery_retries() -> u32 {
    2
}
fn default_model_timeout() -> u64 {
    60
}
fn default_tool_timeout() -> u64 {
    30
}
fn default_memory_window() -> usize {
    2048
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            model_key: default_model_key(),
            persona_name: None,
            custom_instructions: None,
            max_iterations: default_max_iterations(),
            token_budget: default_token_budget(),
            recovery_retries: default_recovery_retries(),
            model_timeout_secs: default_model_timeout(),
            tool_timeout_secs: default_tool_timeout(),
            memory_window_tokens: default_memory_window(),
        }
    }
}

impl LoopConfig {
    /// Load configuration from a specific file path.
    ///
    /// A missing file yields defaults; a present-but-invalid file is an
    /// error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;

        Self::from_toml_str(&content)
    }

    /// Load configuration from the default path (`reagent.toml` in the
    /// current directory), with environment variable overrides.
    ///
    /// Recognized variables:
    /// - `REAGENT_MODEL_KEY`
    /// - `REAGENT_PERSONA_NAME`
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::default_path())?;

        if let Ok(model_key) = std::env::var("REAGENT_MODEL_KEY") {
            config.model_key = model_key;
        }
        if let Ok(persona) = std::env::var("REAGENT_PERSONA_NAME") {
            config.persona_name = Some(persona);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config {
            message: format!("failed to parse config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Default config file path: `reagent.toml` in the working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("reagent.toml")
    }

    /// Validate the configuration.
    ///
    /// Zero budgets would make every turn fail before the first model
    /// request, so they are rejected here instead.
    pub fn validate(&self) -> Result<()> {
        if self.model_key.trim().is_empty() {
            return Err(Error::Config {
                message: "model_key must not be empty".into(),
            });
        }
        if self.max_iterations == 0 {
            return Err(Error::Config {
                message: "max_iterations must be at least 1".into(),
            });
        }
        if self.token_budget == 0 {
            return Err(Error::Config {
                message: "token_budget must be greater than 0".into(),
            });
        }
        if self.model_timeout_secs == 0 {
            return Err(Error::Config {
                message: "model_timeout_secs must be greater than 0".into(),
            });
        }
        if self.tool_timeout_secs == 0 {
            return Err(Error::Config {
                message: "tool_timeout_secs must be greater than 0".into(),
            });
        }
        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LoopConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model_key, "gpt3");
        assert_eq!(config.max_iterations, 8);
        assert_eq!(config.token_budget, 4096);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = LoopConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = LoopConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed.model_key, config.model_key);
        assert_eq!(parsed.token_budget, config.token_budget);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = LoopConfig::from_toml_str("").unwrap();
        assert_eq!(config.model_key, "gpt3");
        assert_eq!(config.recovery_retries, 2);
        assert!(config.persona_name.is_none());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = LoopConfig::from_toml_str(
            r#"
model_key = "gpt4"
persona_name = "Atlas"
"#,
        )
        .unwrap();
        assert_eq!(config.model_key, "gpt4");
        assert_eq!(config.persona_name.as_deref(), Some("Atlas"));
        assert_eq!(config.max_iterations, 8);
    }

    #[test]
    fn zero_iterations_rejected() {
        let result = LoopConfig::from_toml_str("max_iterations = 0");
        assert!(result.is_err());
    }

    #[test]
    fn zero_token_budget_rejected() {
        let result = LoopConfig::from_toml_str("token_budget = 0");
        assert!(result.is_err());
    }

    #[test]
    fn empty_model_key_rejected() {
        let result = LoopConfig::from_toml_str(r#"model_key = "  ""#);
        assert!(result.is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = LoopConfig::load_from(Path::new("/nonexistent/reagent.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().model_key, "gpt3");
    }
}
