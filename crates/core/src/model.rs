//! ModelClient trait: the abstraction over the language-model collaborator.
//!
//! The agent loop exchanges prompt text for completion text through this
//! trait and knows nothing about transport, authentication, or billing.
//! Models that support structured function calling additionally return
//! [`NativeToolCall`] values alongside (or instead of) text; the loop
//! selects its tool-use strategy based on [`ModelClient::supports_native_tools`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A single request to the model collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The assembled system prompt (templates + tools + history + input).
    pub prompt: String,

    /// The rendered scratchpad of prior steps in the current turn.
    /// Empty on the first iteration.
    pub scratchpad: String,

    /// Which model to address (e.g., "gpt4", "gpt3-v2").
    pub model_key: String,
}

/// A complete response from the model collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    /// The raw completion text.
    pub text: String,

    /// Structured tool calls, for models that support native function
    /// calling. Always empty for plain text-protocol models.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<NativeToolCall>,

    /// Token usage statistics, when the model reports them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl Completion {
    /// A text-only completion with no usage data.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
            usage: None,
        }
    }
}

/// A structured tool call returned by a function-calling model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeToolCall {
    /// Unique ID for this call, as assigned by the model.
    pub id: String,

    /// Name of the tool to invoke.
    pub name: String,

    /// The raw input for the tool (typically a JSON string; the tool
    /// interprets it, the loop does not).
    pub input: String,
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The model collaborator trait.
///
/// Failure modes are timeouts, rejections, and network faults, all fatal
/// to the current turn. The loop never retries a model failure silently.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Whether this model returns structured tool calls instead of the
    /// free-text action protocol. Drives strategy selection in the loop.
    fn supports_native_tools(&self) -> bool {
        false
    }

    /// Exchange a prompt (plus scratchpad) for a completion.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<Completion, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoModel;

    #[async_trait]
    impl ModelClient for EchoModel {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> std::result::Result<Completion, ModelError> {
            Ok(Completion::text(request.prompt))
        }
    }

    #[tokio::test]
    async fn default_capability_is_text_protocol() {
        let model = EchoModel;
        assert!(!model.supports_native_tools());

        let completion = model
            .complete(CompletionRequest {
                prompt: "hello".into(),
                scratchpad: String::new(),
                model_key: "echo".into(),
            })
            .await
            .unwrap();
        assert_eq!(completion.text, "hello");
        assert!(completion.tool_calls.is_empty());
    }

    #[test]
    fn completion_serialization_skips_empty_fields() {
        let json = serde_json::to_string(&Completion::text("hi")).unwrap();
        assert!(!json.contains("tool_calls"));
        assert!(!json.contains("usage"));
    }
}
