//! # Reagent Agent
//!
//! The agent execution loop: completion parsing, tool dispatch, the
//! per-turn scratchpad, and the executor that ties model, tools, memory,
//! and prompt assembly together.
//!
//! The loop is a small state machine per turn: request a completion,
//! classify it (action / final answer / malformed), dispatch or correct,
//! and repeat until an answer lands or a budget runs out. Malformed
//! completions and tool failures stay inside the loop as observations;
//! only configuration problems, a prompt that cannot fit the token
//! budget, and model unavailability surface as errors.

pub mod dispatcher;
pub mod executor;
pub mod parser;
pub mod scratchpad;
pub mod strategy;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use dispatcher::ToolDispatcher;
pub use executor::AgentExecutor;
pub use parser::{ActionParser, ParseErrorKind, Step};
pub use scratchpad::{Scratchpad, ScratchpadEntry};
pub use strategy::{
    LoopBudget, NativeToolStrategy, TextProtocolStrategy, TurnContext, TurnOutcome, TurnResult,
    TurnStrategy, FALLBACK_ANSWER, FORMAT_CORRECTION, RECOVERY_FALLBACK,
};
