//! # Reagent Prompt
//!
//! Prompt template registry and deterministic prompt assembly.
//!
//! The template registry maps model-family keys ("gpt3", "gpt4-v1", ...)
//! to [`TemplateSet`] fragments; the assembler combines a set with the
//! registered tool descriptors and operator options into the final system
//! prompt. Assembly is pure and byte-deterministic so prompts can be
//! asserted against in tests and diffed across runs.

pub mod assembler;
pub mod templates;

pub use assembler::{assemble, PromptOptions};
pub use templates::{TemplateRegistry, TemplateSet, TOOL_NAMES_PLACEHOLDER};
