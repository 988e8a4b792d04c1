//! Tool dispatch with timeout enforcement.
//!
//! The dispatcher sits between the loop and the tool registry. Whatever
//! happens (unknown tool, execution failure, timeout), the result is
//! observation text fed back to the model. Tool trouble never aborts a
//! turn.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use reagent_core::tool::{ToolRegistry, NO_TOOL_ACTION};

pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    timeout: Duration,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>, timeout_secs: u64) -> Self {
        Self {
            registry,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Dispatch an action and return the observation text.
    ///
    /// The no-tool sentinel short-circuits: its input *is* the observation
    /// (the model consulted its own knowledge).
    pub async fn dispatch(&self, tool_name: &str, input: &str) -> String {
        if tool_name == NO_TOOL_ACTION {
            debug!("no-tool action, echoing input as observation");
            return input.to_string();
        }

        let Some(tool) = self.registry.get(tool_name) else {
            warn!(tool_name, "model requested an unregistered tool");
            return format!("{} is not a valid tool, try another one.", tool_name);
        };

        let start = std::time::Instant::now();
        match tokio::time::timeout(self.timeout, tool.invoke(input)).await {
            Ok(Ok(output)) => {
                debug!(
                    tool_name,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "tool invocation succeeded"
                );
                output
            }
            Ok(Err(e)) => {
                warn!(tool_name, error = %e, "tool invocation failed");
                format!("Error: {}", e)
            }
            Err(_) => {
                warn!(tool_name, timeout_secs = self.timeout.as_secs(), "tool timed out");
                format!(
                    "Error: tool '{}' timed out after {}s",
                    tool_name,
                    self.timeout.as_secs()
                )
            }
        }
    }
}
