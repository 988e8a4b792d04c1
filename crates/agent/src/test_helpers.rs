//! Shared test helpers for strategy and executor tests.

use std::sync::Mutex;

use async_trait::async_trait;

use reagent_core::{Completion, CompletionRequest, ModelClient, ModelError};

/// A scripted model that returns queued completions in order and records
/// every request it receives. Panics if called more times than it has
/// responses.
pub struct ScriptedModel {
    native: bool,
    hang: bool,
    responses: Mutex<Vec<Result<Completion, ModelError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    /// A text-protocol model returning the given completion texts.
    pub fn text_protocol(texts: Vec<&str>) -> Self {
        Self {
            native: false,
            hang: false,
            responses: Mutex::new(texts.into_iter().map(|t| Ok(Completion::text(t))).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A function-calling model returning the given completions.
    pub fn native(completions: Vec<Completion>) -> Self {
        Self {
            native: true,
            hang: false,
            responses: Mutex::new(completions.into_iter().map(Ok).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A model whose every request fails with a network error.
    pub fn failing() -> Self {
        Self {
            native: false,
            hang: false,
            responses: Mutex::new(vec![Err(ModelError::Network("connection refused".into()))]),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A model that never responds, for timeout tests.
    pub fn hanging() -> Self {
        Self {
            native: false,
            hang: true,
            responses: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    fn supports_native_tools(&self) -> bool {
        self.native
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<Completion, ModelError> {
        self.requests.lock().unwrap().push(request);

        if self.hang {
            std::future::pending::<()>().await;
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            panic!("ScriptedModel: no more responses");
        }
        responses.remove(0)
    }
}
