//! Turn strategies.
//!
//! A strategy runs the inner reasoning loop for a single turn. Two
//! implementations exist: the text action protocol for models that only
//! speak free text, and native tool calling for models that return
//! structured calls. The executor selects one based on the model's
//! declared capability.

use std::time::Duration;

use async_trait::async_trait;

use reagent_config::LoopConfig;
use reagent_core::token::estimate_tokens;
use reagent_core::{Completion, CompletionRequest, Error, ModelClient, ModelError, Result};

use crate::dispatcher::ToolDispatcher;
use crate::scratchpad::ScratchpadEntry;

pub mod native;
pub mod text;

pub use native::NativeToolStrategy;
pub use text::TextProtocolStrategy;

/// Answer substituted when the iteration or token budget runs out
/// mid-turn.
pub const FALLBACK_ANSWER: &str =
    "I've reached my reasoning limit for this request. Here's what I found so far.";

/// Answer substituted when the model keeps producing malformed
/// completions past the retry allowance.
pub const RECOVERY_FALLBACK: &str =
    "I wasn't able to produce a usable response for this request. Please try rephrasing it.";

/// The corrective observation sent back after a malformed completion.
/// Fixed text: the model gets the same correction every time.
pub const FORMAT_CORRECTION: &str = "Your previous response was not in the expected format. \
Respond with a Thought, an Action from the available actions, and an Action Input, \
or give a Final Answer.";

/// How a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The model produced a final answer.
    Answered,
    /// The iteration or token budget ran out; the answer is a fallback.
    BudgetExhausted,
    /// Recovery retries ran out; the answer is a fallback.
    RecoveryExhausted,
}

/// The result of one completed turn.
#[derive(Debug, Clone)]
pub struct TurnResult {
    /// The answer delivered to the user (may be a fallback).
    pub answer: String,
    /// How the turn ended.
    pub outcome: TurnOutcome,
    /// Every step taken during the turn, in order.
    pub trace: Vec<ScratchpadEntry>,
    /// Dispatched action steps. Corrective re-requests and the final
    /// answer itself consume no iteration.
    pub iterations: u32,
}

/// Remaining allowances for the current turn.
#[derive(Debug, Clone)]
pub struct LoopBudget {
    tokens_remaining: usize,
    iterations_remaining: u32,
}

impl LoopBudget {
    pub fn new(token_budget: usize, max_iterations: u32) -> Self {
        Self {
            tokens_remaining: token_budget,
            iterations_remaining: max_iterations,
        }
    }

    /// Charge tokens against the budget. Returns false when the charge
    /// does not fit; the budget is left drained in that case.
    pub fn charge_tokens(&mut self, tokens: usize) -> bool {
        if tokens > self.tokens_remaining {
            self.tokens_remaining = 0;
            return false;
        }
        self.tokens_remaining -= tokens;
        true
    }

    /// Consume one iteration. Returns false when none remain.
    pub fn start_iteration(&mut self) -> bool {
        if self.iterations_remaining == 0 {
            return false;
        }
        self.iterations_remaining -= 1;
        true
    }

    pub fn tokens_remaining(&self) -> usize {
        self.tokens_remaining
    }
}

/// Everything a strategy needs to run one turn.
pub struct TurnContext<'a> {
    pub model: &'a dyn ModelClient,
    pub dispatcher: &'a ToolDispatcher,
    pub config: &'a LoopConfig,
    /// The fully assembled prompt (system text + history + user input).
    pub prompt: String,
    /// The turn's budget, already charged for the prompt.
    pub budget: LoopBudget,
}

/// A single-turn reasoning strategy.
#[async_trait]
pub trait TurnStrategy: Send + Sync {
    async fn run(&self, ctx: TurnContext<'_>) -> Result<TurnResult>;
}

/// Issue one model request under the configured timeout.
///
/// Model failures are fatal to the turn and propagate as errors.
pub(crate) async fn request_completion(
    model: &dyn ModelClient,
    prompt: &str,
    scratchpad: &str,
    config: &LoopConfig,
) -> Result<Completion> {
    let request = CompletionRequest {
        prompt: prompt.to_string(),
        scratchpad: scratchpad.to_string(),
        model_key: config.model_key.clone(),
    };

    let timeout = Duration::from_secs(config.model_timeout_secs);
    match tokio::time::timeout(timeout, model.complete(request)).await {
        Ok(Ok(completion)) => Ok(completion),
        Ok(Err(e)) => Err(Error::Model(e)),
        Err(_) => Err(Error::Model(ModelError::Timeout {
            timeout_secs: config.model_timeout_secs,
        })),
    }
}

/// Tokens to charge for a completion: reported usage when present,
/// estimated from the text otherwise.
pub(crate) fn completion_cost(completion: &Completion) -> usize {
    match &completion.usage {
        Some(usage) => usage.completion_tokens as usize,
        None => estimate_tokens(&completion.text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_charges_until_drained() {
        let mut budget = LoopBudget::new(100, 3);
        assert!(budget.charge_tokens(60));
        assert!(budget.charge_tokens(40));
        assert!(!budget.charge_tokens(1));
        assert_eq!(budget.tokens_remaining(), 0);
    }

    #[test]
    fn overdraft_drains_the_budget() {
        let mut budget = LoopBudget::new(10, 3);
        assert!(!budget.charge_tokens(11));
        assert_eq!(budget.tokens_remaining(), 0);
    }

    #[test]
    fn iterations_run_out() {
        let mut budget = LoopBudget::new(100, 2);
        assert!(budget.start_iteration());
        assert!(budget.start_iteration());
        assert!(!budget.start_iteration());
    }

    #[test]
    fn cost_prefers_reported_usage() {
        let mut completion = Completion::text("abcdefgh"); // 2 tokens estimated
        assert_eq!(completion_cost(&completion), 2);

        completion.usage = Some(reagent_core::Usage {
            prompt_tokens: 50,
            completion_tokens: 7,
            total_tokens: 57,
        });
        assert_eq!(completion_cost(&completion), 7);
    }
}
