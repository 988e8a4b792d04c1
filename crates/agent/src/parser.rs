//! Completion parser for the text action protocol.
//!
//! Classifies a raw model completion into one of three steps: an action
//! request, a final answer, or a malformed response. A malformed response
//! is data, not an error: the loop's recovery policy decides what to do
//! with it.
//!
//! The parser is constructed with the registered tool names and validates
//! `Action:` values against them (plus the no-tool sentinel), so the loop
//! only ever dispatches actions that exist. An unknown name is a
//! recoverable parse failure, never a silent no-op.
//!
//! Normalization is deliberately minimal: outer whitespace is trimmed and
//! a code fence *surrounding* the whole completion is stripped, but the
//! lines in between stay byte-exact, so multi-line inputs and answers keep
//! their indentation and blank lines.
//!
//! Hand-rolled line scanner rather than regex: the protocol is line
//! oriented and the keyword set is fixed, so a scanner is both faster and
//! easier to reason about at the edge cases (keywords inside tool output,
//! fenced completions, multi-line inputs).

use std::collections::HashSet;

use reagent_core::tool::NO_TOOL_ACTION;

/// One parsed step from a model completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The model requested a tool invocation (possibly the no-tool
    /// sentinel). The name is validated against the registered set.
    Action {
        /// The `Thought:` text preceding the action, if any.
        thought: Option<String>,
        /// The requested action name.
        tool: String,
        /// The raw `Action Input:` text, which may span multiple lines.
        input: String,
    },

    /// The model produced its final answer; the turn is over.
    FinalAnswer {
        /// The `Thought:` text preceding the answer, if any.
        thought: Option<String>,
        answer: String,
    },

    /// The completion matched no valid form.
    Malformed { kind: ParseErrorKind, raw: String },
}

/// Why a completion failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The completion was empty (or only whitespace/fences).
    Empty,
    /// An `Action:` line appeared with no `Action Input:` after it.
    MissingActionInput,
    /// The `Action:` name is neither a registered tool nor the sentinel.
    UnknownTool,
    /// None of the protocol keywords were found.
    UnrecognizedFormat,
}

const THOUGHT: &str = "Thought:";
const ACTION: &str = "Action:";
const ACTION_INPUT: &str = "Action Input:";
const OBSERVATION: &str = "Observation:";
const FINAL_ANSWER: &str = "Final Answer:";

/// Parser for completions in the text action protocol.
pub struct ActionParser {
    names: HashSet<String>,
}

impl ActionParser {
    /// Build a parser accepting the given tool names. The no-tool
    /// sentinel is always accepted.
    pub fn new(tool_names: impl IntoIterator<Item = String>) -> Self {
        let mut names: HashSet<String> = tool_names.into_iter().collect();
        names.insert(NO_TOOL_ACTION.to_string());
        Self { names }
    }

    /// Parse a raw model completion into a [`Step`].
    ///
    /// `Final Answer:` always wins: if a completion contains both an
    /// action block and a final answer, the answer is taken and the
    /// action ignored. If several action blocks appear, only the first
    /// is taken.
    pub fn parse(&self, completion: &str) -> Step {
        let body = strip_fence(completion);
        if body.trim().is_empty() {
            return Step::Malformed {
                kind: ParseErrorKind::Empty,
                raw: completion.to_string(),
            };
        }
        let lines: Vec<&str> = body.lines().collect();

        // Final answer takes precedence over any action block. Everything
        // after the marker, to end-of-text, is the answer.
        for (i, line) in lines.iter().enumerate() {
            if let Some(rest) = keyword(line, FINAL_ANSWER) {
                let mut answer = rest.trim_start().to_string();
                for later in &lines[i + 1..] {
                    answer.push('\n');
                    answer.push_str(later);
                }
                return Step::FinalAnswer {
                    thought: last_thought(&lines[..i]),
                    answer: answer.trim().to_string(),
                };
            }
        }

        let mut thought: Option<String> = None;
        for (i, line) in lines.iter().enumerate() {
            if let Some(rest) = keyword(line, THOUGHT) {
                // Keep the last thought before the action.
                let text = rest.trim();
                if !text.is_empty() {
                    thought = Some(text.to_string());
                }
                continue;
            }

            // "Action Input:" would also pass an "Action" check, so the
            // longer keyword is tested first.
            if keyword(line, ACTION_INPUT).is_some() {
                continue;
            }
            if let Some(rest) = keyword(line, ACTION) {
                let tool = clean_tool_name(rest);
                if !self.names.contains(&tool) {
                    return Step::Malformed {
                        kind: ParseErrorKind::UnknownTool,
                        raw: completion.to_string(),
                    };
                }
                return match collect_input(&lines[i + 1..]) {
                    Some(input) => Step::Action {
                        thought,
                        tool,
                        input,
                    },
                    None => Step::Malformed {
                        kind: ParseErrorKind::MissingActionInput,
                        raw: completion.to_string(),
                    },
                };
            }
        }

        Step::Malformed {
            kind: ParseErrorKind::UnrecognizedFormat,
            raw: completion.to_string(),
        }
    }
}

/// The text after `kw` when the line begins with it, leading whitespace
/// tolerated.
fn keyword<'a>(line: &'a str, kw: &str) -> Option<&'a str> {
    line.trim_start().strip_prefix(kw)
}

/// Whether the line begins with any protocol keyword.
fn is_keyword_line(line: &str) -> bool {
    [THOUGHT, ACTION, ACTION_INPUT, OBSERVATION, FINAL_ANSWER]
        .iter()
        .any(|kw| keyword(line, kw).is_some())
}

/// The completion with a *surrounding* code fence removed. Models
/// following the fenced templates wrap the whole block in ``` markers;
/// only that outer wrapper carries no content. Interior lines, fences
/// included, stay byte-exact.
fn strip_fence(completion: &str) -> &str {
    let body = completion.trim();
    let Some((first, rest)) = body.split_once('\n') else {
        return body;
    };
    if !is_fence(first.trim()) {
        return body;
    }
    let rest = rest.trim_end();
    match rest.strip_suffix("```") {
        Some(inner) if inner.is_empty() || inner.ends_with('\n') => inner.trim_end_matches('\n'),
        _ => rest,
    }
}

/// A line that is only a code fence, optionally with a language tag.
fn is_fence(line: &str) -> bool {
    line.strip_prefix("```")
        .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// The last `Thought:` text among the given lines, if any.
fn last_thought(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .rev()
        .find_map(|line| keyword(line, THOUGHT))
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Tool name text after `Action:`, with decorations the models commonly
/// add stripped off (brackets from the template's `[name]` listing,
/// trailing punctuation).
fn clean_tool_name(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('[')
        .trim_end_matches('.')
        .trim_end_matches(']')
        .trim()
        .to_string()
}

/// The `Action Input:` text following an action line: the remainder of
/// that line plus any continuation lines, byte-exact, up to the next
/// keyword line or end-of-text.
fn collect_input(lines: &[&str]) -> Option<String> {
    let (start, first) = lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| keyword(line, ACTION_INPUT).map(|rest| (i, rest)))?;

    let mut input = first.trim().to_string();
    for line in &lines[start + 1..] {
        if is_keyword_line(line) {
            break;
        }
        input.push('\n');
        input.push_str(line);
    }
    Some(input.trim_end().trim_start_matches('\n').to_string())
}
