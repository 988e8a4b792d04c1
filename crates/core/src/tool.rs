//! Tool trait and registry.
//!
//! Tools are the agent's capabilities. Each tool declares a unique name,
//! a human-readable description (which goes verbatim into the prompt), and
//! a JSON schema describing its input for function-calling models. The
//! loop itself treats tool input and output as opaque text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result, ToolError};

/// The reserved action name a model emits when no registered tool fits.
///
/// It is never a registered tool: the loop echoes the action input back as
/// the observation and continues reasoning. It is advertised in the prompt
/// alongside the real tools but cannot terminate a turn.
pub const NO_TOOL_ACTION: &str = "N/A";

/// Static description of a tool, as advertised to models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique tool name (e.g., "lookup_weather")
    pub name: String,

    /// Human-readable description of what the tool does
    pub description: String,

    /// JSON schema for the tool's input
    pub input_schema: Value,
}

/// The tool collaborator trait.
///
/// Input is a single opaque string; tools that want structure parse it
/// themselves (e.g., as JSON). Output is the observation text fed back
/// into the model's scratchpad.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name of this tool.
    fn name(&self) -> &str;

    /// Description shown to the model.
    fn description(&self) -> &str;

    /// JSON schema for the tool's input.
    fn input_schema(&self) -> Value;

    /// Execute the tool with the given input text.
    async fn invoke(&self, input: &str) -> std::result::Result<String, ToolError>;

    /// Build the advertised descriptor for this tool.
    fn to_descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Registry of available tools.
///
/// Backed by a `Vec` so that iteration order equals registration order;
/// prompt assembly depends on this for deterministic output.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Fails if a tool with the same name is already
    /// registered, or if the name collides with the reserved no-tool action.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<()> {
        let name = tool.name();
        if name == NO_TOOL_ACTION {
            return Err(Error::Config {
                message: format!("tool name '{}' is reserved", NO_TOOL_ACTION),
            });
        }
        if self.contains(name) {
            return Err(Error::Config {
                message: format!("duplicate tool name: {}", name),
            });
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Look up a tool by exact name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    /// Whether a tool with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name() == name)
    }

    /// Descriptors of all registered tools, in registration order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.to_descriptor()).collect()
    }

    /// Names of all registered tools, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
