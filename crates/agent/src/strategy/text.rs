//! Text action protocol strategy.
//!
//! The model speaks the Thought / Action / Action Input / Observation
//! protocol in free text. Each iteration sends the prompt plus the
//! rendered scratchpad, parses the completion, and either dispatches the
//! requested action, issues a format correction, or finishes the turn.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use reagent_core::Result;

use crate::parser::{ActionParser, Step};
use crate::scratchpad::{Scratchpad, ScratchpadEntry};
use crate::strategy::{
    completion_cost, request_completion, TurnContext, TurnOutcome, TurnResult, TurnStrategy,
    FALLBACK_ANSWER, FORMAT_CORRECTION, RECOVERY_FALLBACK,
};

pub struct TextProtocolStrategy;

#[async_trait]
impl TurnStrategy for TextProtocolStrategy {
    async fn run(&self, mut ctx: TurnContext<'_>) -> Result<TurnResult> {
        let parser = ActionParser::new(ctx.dispatcher.registry().names());
        let mut scratchpad = Scratchpad::new();
        let mut retries: u32 = 0;
        let mut iterations: u32 = 0;

        loop {
            debug!(iterations, "requesting completion");

            let completion =
                request_completion(ctx.model, &ctx.prompt, &scratchpad.render(), ctx.config)
                    .await?;

            if !ctx.budget.charge_tokens(completion_cost(&completion)) {
                warn!(iterations, "token budget exhausted");
                return Ok(fallback(
                    FALLBACK_ANSWER,
                    TurnOutcome::BudgetExhausted,
                    scratchpad,
                    iterations,
                ));
            }

            match parser.parse(&completion.text) {
                Step::FinalAnswer { thought, answer } => {
                    info!(iterations, closing_thought = ?thought, "turn answered");
                    return Ok(TurnResult {
                        answer,
                        outcome: TurnOutcome::Answered,
                        trace: scratchpad.into_entries(),
                        iterations,
                    });
                }

                Step::Action {
                    thought,
                    tool,
                    input,
                } => {
                    // Only dispatched steps consume the iteration budget;
                    // recovery re-requests are bounded by the retry
                    // counter and the token budget.
                    if !ctx.budget.start_iteration() {
                        warn!(iterations, "iteration budget exhausted");
                        return Ok(fallback(
                            FALLBACK_ANSWER,
                            TurnOutcome::BudgetExhausted,
                            scratchpad,
                            iterations,
                        ));
                    }
                    iterations += 1;
                    let observation = ctx.dispatcher.dispatch(&tool, &input).await;
                    scratchpad.push(ScratchpadEntry::Action {
                        thought,
                        action: tool,
                        input,
                        observation,
                    });
                }

                Step::Malformed { kind, raw } => {
                    retries += 1;
                    debug!(?kind, retries, "malformed completion");
                    if retries > ctx.config.recovery_retries {
                        warn!(retries, "recovery retries exhausted");
                        return Ok(fallback(
                            RECOVERY_FALLBACK,
                            TurnOutcome::RecoveryExhausted,
                            scratchpad,
                            iterations,
                        ));
                    }
                    scratchpad.push(ScratchpadEntry::Correction {
                        raw,
                        correction: FORMAT_CORRECTION.to_string(),
                    });
                }
            }
        }
    }
}

fn fallback(
    answer: &str,
    outcome: TurnOutcome,
    scratchpad: Scratchpad,
    iterations: u32,
) -> TurnResult {
    TurnResult {
        answer: answer.to_string(),
        outcome,
        trace: scratchpad.into_entries(),
        iterations,
    }
}
