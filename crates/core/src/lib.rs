//! # Reagent Core
//!
//! Domain types, traits, and error definitions for the Reagent tool-using
//! agent runtime. This crate has **zero framework dependencies**; it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator the agent loop talks to is defined as a trait here:
//! the language model ([`ModelClient`]), the tools ([`Tool`]), and the
//! conversation memory (in `reagent-memory`). Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with scripted/mock implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod message;
pub mod model;
pub mod token;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, MemoryError, ModelError, Result, ToolError};
pub use message::{ConversationId, MemoryEntry, Role};
pub use model::{Completion, CompletionRequest, ModelClient, NativeToolCall, Usage};
pub use tool::{Tool, ToolDescriptor, ToolRegistry, NO_TOOL_ACTION};
