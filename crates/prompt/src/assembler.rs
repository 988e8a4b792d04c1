//! Deterministic prompt assembly.
//!
//! Combines a template set, the registered tool descriptors, and operator
//! options into the final system prompt. Assembly is a pure function of
//! its inputs: same inputs, same bytes out.

use reagent_core::tool::{ToolDescriptor, NO_TOOL_ACTION};

use crate::templates::{TemplateSet, TOOL_NAMES_PLACEHOLDER};

/// The sentinel entry advertised at the top of the tool section.
const NO_TOOL_LINE: &str = "N/A: No suitable action; use your own knowledge.";

/// Operator-supplied prompt options.
#[derive(Debug, Clone, Default)]
pub struct PromptOptions {
    /// Persona name woven in as `You are "{name}".`
    pub persona_name: Option<String>,

    /// Free-form operator instructions appended before the suffix.
    pub custom_instructions: Option<String>,

    /// The current date line (e.g., "2026-08-30"). Always present so the
    /// model does not hallucinate a date.
    pub current_date: String,
}

/// Assemble the system prompt.
///
/// Fixed concatenation order: date header, template prefix, tool section
/// (sentinel first, then each tool as `name: description` in registration
/// order), instructions with `{tool_names}` substituted, optional persona
/// line, optional custom instructions, template suffix.
pub fn assemble(
    templates: &TemplateSet,
    tools: &[ToolDescriptor],
    options: &PromptOptions,
) -> String {
    let mut prompt = String::new();

    prompt.push_str("Current Date: ");
    prompt.push_str(&options.current_date);
    prompt.push_str("\n\n");

    prompt.push_str(&templates.prefix);
    prompt.push('\n');
    prompt.push_str(NO_TOOL_LINE);
    for tool in tools {
        prompt.push('\n');
        prompt.push_str(&tool.name);
        prompt.push_str(": ");
        prompt.push_str(&tool.description);
    }
    prompt.push_str("\n\n");

    prompt.push_str(&templates.instructions.replace(
        TOOL_NAMES_PLACEHOLDER,
        &action_names(tools),
    ));

    if let Some(persona) = options.persona_name.as_deref() {
        prompt.push_str("\n\nYou are \"");
        prompt.push_str(persona);
        prompt.push_str("\".");
    }

    if let Some(custom) = options.custom_instructions.as_deref() {
        prompt.push_str("\n\n");
        prompt.push_str(custom);
    }

    prompt.push_str("\n\n");
    prompt.push_str(&templates.suffix);

    prompt
}

/// Comma-joined action names: registered tools in order, then the no-tool
/// sentinel last.
fn action_names(tools: &[ToolDescriptor]) -> String {
    let mut names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    names.push(NO_TOOL_ACTION);
    names.join(", ")
}
