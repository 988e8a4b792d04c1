//! Native tool-calling strategy.
//!
//! For models that return structured tool calls instead of protocol text.
//! No parsing and no format recovery: a completion either carries tool
//! calls to dispatch or is the final answer. Multiple calls in one
//! completion are dispatched concurrently; their observations are merged
//! back in declaration order.

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, info, warn};

use reagent_core::Result;

use crate::scratchpad::{Scratchpad, ScratchpadEntry};
use crate::strategy::{
    completion_cost, request_completion, TurnContext, TurnOutcome, TurnResult, TurnStrategy,
    FALLBACK_ANSWER,
};

pub struct NativeToolStrategy;

#[async_trait]
impl TurnStrategy for NativeToolStrategy {
    async fn run(&self, mut ctx: TurnContext<'_>) -> Result<TurnResult> {
        let mut scratchpad = Scratchpad::new();
        let mut iterations: u32 = 0;

        loop {
            debug!(iterations, "requesting completion");

            let completion =
                request_completion(ctx.model, &ctx.prompt, &scratchpad.render(), ctx.config)
                    .await?;

            if !ctx.budget.charge_tokens(completion_cost(&completion)) {
                warn!(iterations, "token budget exhausted");
                return Ok(TurnResult {
                    answer: FALLBACK_ANSWER.to_string(),
                    outcome: TurnOutcome::BudgetExhausted,
                    trace: scratchpad.into_entries(),
                    iterations,
                });
            }

            // No tool calls means the text is the answer.
            if completion.tool_calls.is_empty() {
                info!(iterations, "turn answered");
                return Ok(TurnResult {
                    answer: completion.text,
                    outcome: TurnOutcome::Answered,
                    trace: scratchpad.into_entries(),
                    iterations,
                });
            }

            // A dispatch round consumes one iteration, however many calls
            // it carries.
            if !ctx.budget.start_iteration() {
                warn!(iterations, "iteration budget exhausted");
                return Ok(TurnResult {
                    answer: FALLBACK_ANSWER.to_string(),
                    outcome: TurnOutcome::BudgetExhausted,
                    trace: scratchpad.into_entries(),
                    iterations,
                });
            }
            iterations += 1;

            let thought = if completion.text.trim().is_empty() {
                None
            } else {
                Some(completion.text.trim().to_string())
            };

            // Dispatch every call concurrently; join_all preserves the
            // declaration order of the calls.
            let observations = join_all(
                completion
                    .tool_calls
                    .iter()
                    .map(|call| ctx.dispatcher.dispatch(&call.name, &call.input)),
            )
            .await;

            for (i, (call, observation)) in completion
                .tool_calls
                .into_iter()
                .zip(observations)
                .enumerate()
            {
                scratchpad.push(ScratchpadEntry::Action {
                    // Attach the completion text to the first entry only.
                    thought: if i == 0 { thought.clone() } else { None },
                    action: call.name,
                    input: call.input,
                    observation,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::ToolDispatcher;
    use crate::strategy::LoopBudget;
    use crate::test_helpers::ScriptedModel;
    use reagent_config::LoopConfig;
    use reagent_core::{Completion, NativeToolCall};
    use std::sync::Arc;

    fn context<'a>(
        model: &'a ScriptedModel,
        dispatcher: &'a ToolDispatcher,
        config: &'a LoopConfig,
    ) -> TurnContext<'a> {
        TurnContext {
            model,
            dispatcher,
            config,
            prompt: "system prompt\n\nUser: hello".into(),
            budget: LoopBudget::new(config.token_budget, config.max_iterations),
        }
    }

    fn dispatcher() -> ToolDispatcher {
        ToolDispatcher::new(Arc::new(reagent_tools::default_registry().unwrap()), 5)
    }

    fn call(id: &str, name: &str, input: &str) -> NativeToolCall {
        NativeToolCall {
            id: id.into(),
            name: name.into(),
            input: input.into(),
        }
    }

    fn with_calls(text: &str, calls: Vec<NativeToolCall>) -> Completion {
        let mut completion = Completion::text(text);
        completion.tool_calls = calls;
        completion
    }

    #[tokio::test]
    async fn text_without_calls_is_the_answer() {
        let model = ScriptedModel::native(vec![Completion::text("Just the answer.")]);
        let d = dispatcher();
        let config = LoopConfig::default();

        let result = NativeToolStrategy
            .run(context(&model, &d, &config))
            .await
            .unwrap();

        assert_eq!(result.outcome, TurnOutcome::Answered);
        assert_eq!(result.answer, "Just the answer.");
        assert!(result.trace.is_empty());
    }

    #[tokio::test]
    async fn calls_are_dispatched_then_answered() {
        let model = ScriptedModel::native(vec![
            with_calls(
                "Let me calculate.",
                vec![call("c1", "calculator", r#"{"expression": "6 * 7"}"#)],
            ),
            Completion::text("The answer is 42."),
        ]);
        let d = dispatcher();
        let config = LoopConfig::default();

        let result = NativeToolStrategy
            .run(context(&model, &d, &config))
            .await
            .unwrap();

        assert_eq!(result.outcome, TurnOutcome::Answered);
        assert_eq!(result.answer, "The answer is 42.");
        assert_eq!(result.trace.len(), 1);
        match &result.trace[0] {
            ScratchpadEntry::Action {
                thought,
                observation,
                ..
            } => {
                assert_eq!(thought.as_deref(), Some("Let me calculate."));
                assert_eq!(observation, "42");
            }
            other => panic!("expected action entry, got {:?}", other),
        }

        let requests = model.requests();
        assert!(requests[1].scratchpad.contains("Observation: 42"));
    }

    #[tokio::test]
    async fn concurrent_calls_merge_in_declaration_order() {
        let model = ScriptedModel::native(vec![
            with_calls(
                "",
                vec![
                    call("c1", "calculator", "10 * 5"),
                    call("c2", "lookup_weather", "Tokyo"),
                ],
            ),
            Completion::text("Done."),
        ]);
        let d = dispatcher();
        let config = LoopConfig::default();

        let result = NativeToolStrategy
            .run(context(&model, &d, &config))
            .await
            .unwrap();

        assert_eq!(result.trace.len(), 2);
        match (&result.trace[0], &result.trace[1]) {
            (
                ScratchpadEntry::Action {
                    action: first,
                    observation: obs,
                    ..
                },
                ScratchpadEntry::Action { action: second, .. },
            ) => {
                assert_eq!(first, "calculator");
                assert_eq!(obs, "50");
                assert_eq!(second, "lookup_weather");
            }
            other => panic!("expected two action entries, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_tool_call_becomes_observation() {
        let model = ScriptedModel::native(vec![
            with_calls("", vec![call("c1", "telepathy", "{}")]),
            Completion::text("Done without it."),
        ]);
        let d = dispatcher();
        let config = LoopConfig::default();

        let result = NativeToolStrategy
            .run(context(&model, &d, &config))
            .await
            .unwrap();

        assert_eq!(result.outcome, TurnOutcome::Answered);
        let requests = model.requests();
        assert!(requests[1]
            .scratchpad
            .contains("telepathy is not a valid tool"));
    }

    #[tokio::test]
    async fn iteration_exhaustion_yields_fallback() {
        // max_iterations = 8, so the ninth dispatch round is refused.
        let responses: Vec<Completion> = (0..9)
            .map(|_| with_calls("", vec![call("c", "calculator", "1 + 1")]))
            .collect();
        let model = ScriptedModel::native(responses);
        let d = dispatcher();
        let config = LoopConfig::default();

        let result = NativeToolStrategy
            .run(context(&model, &d, &config))
            .await
            .unwrap();

        assert_eq!(result.outcome, TurnOutcome::BudgetExhausted);
        assert_eq!(result.answer, FALLBACK_ANSWER);
        assert_eq!(result.iterations, 8);
    }
}
