//! Error types for the Reagent domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Each bounded context
//! has its own error enum; the top-level [`Error`] wraps them.
//!
//! Note that parse failures of model completions are deliberately *not* part
//! of this taxonomy: a malformed completion is data, not an error. The agent
//! loop absorbs it through its recovery policy and the caller never sees it.

use thiserror::Error;

/// The top-level error type for all Reagent operations.
///
/// Only three families ever cross the agent-loop boundary: configuration
/// errors (fatal at setup), budget exhaustion detected before the first
/// model request, and model unavailability. Everything else is absorbed
/// inside the loop.
#[derive(Debug, Error)]
pub enum Error {
    // --- Model errors ---
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Memory errors ---
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Budget ---
    #[error("Token budget exceeded: prompt needs {required} tokens, budget is {budget}")]
    BudgetExceeded { required: usize, budget: usize },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of the external model collaborator. All of these are fatal to
/// the current turn: without completion text there is nothing to parse.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("Model request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Model rejected the request: {message} (status: {status_code})")]
    Rejected { status_code: u16, message: String },

    #[error("Network error reaching model: {0}")]
    Network(String),
}

/// Failures raised by a tool collaborator. The dispatcher converts these
/// into textual observations; they never abort the loop.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Tool timed out: {tool_name} after {timeout_secs}s")]
    Timeout { tool_name: String, timeout_secs: u64 },

    #[error("Invalid tool input: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Summarization failed: {0}")]
    Summarization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_error_displays_correctly() {
        let err = Error::Model(ModelError::Rejected {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn tool_error_displays_correctly() {
        let err = Error::Tool(ToolError::Timeout {
            tool_name: "lookup_weather".into(),
            timeout_secs: 30,
        });
        assert!(err.to_string().contains("lookup_weather"));
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn budget_error_names_both_numbers() {
        let err = Error::BudgetExceeded {
            required: 5000,
            budget: 4096,
        };
        assert!(err.to_string().contains("5000"));
        assert!(err.to_string().contains("4096"));
    }
}
