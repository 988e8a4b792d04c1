//! Builtin prompt template sets, keyed by model family.
//!
//! Different model families follow the action protocol with different
//! reliability, so each family gets its own phrasing. Older families get
//! verbose, guideline-heavy text; newer ones get terse variants wrapped in
//! code fences. Every `instructions` body carries a `{tool_names}`
//! placeholder that assembly substitutes with the registered tool names.
//!
//! Each prefix ends with the `# Available Actions & Tools:` header; the
//! assembler appends the no-tool sentinel line and the tool descriptions
//! directly beneath it.

use serde::{Deserialize, Serialize};

use reagent_core::{Error, Result};

/// The token in `instructions` replaced with the comma-joined tool names.
pub const TOOL_NAMES_PLACEHOLDER: &str = "{tool_names}";

/// A set of prompt fragments for one model family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSet {
    /// Objective statement and response guidance. Ends with the tool
    /// section header.
    pub prefix: String,

    /// The action-protocol format instructions. Contains
    /// [`TOOL_NAMES_PLACEHOLDER`].
    pub instructions: String,

    /// Closing reminders.
    pub suffix: String,
}

impl TemplateSet {
    pub fn new(
        prefix: impl Into<String>,
        instructions: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            instructions: instructions.into(),
            suffix: suffix.into(),
        }
    }
}

/// Registry of template sets, keyed by model-family key.
///
/// Lookup never fails: exact match first, then longest registered key that
/// is a prefix of the requested key, then the `"gpt3"` fallback.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    sets: Vec<(String, TemplateSet)>,
}

/// The fallback key used when nothing else matches.
const FALLBACK_KEY: &str = "gpt3";

impl TemplateRegistry {
    /// An empty registry. Use [`TemplateRegistry::with_builtins`] unless
    /// you register a `"gpt3"` fallback set yourself.
    pub fn new() -> Self {
        Self { sets: Vec::new() }
    }

    /// A registry pre-populated with the builtin template sets.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.insert("gpt3-v1", gpt3_v1());
        registry.insert("gpt3-v2", gpt3_v2());
        registry.insert("gpt3", gpt3());
        registry.insert("gpt4-v1", gpt4_v1());
        registry.insert("gpt4", gpt4());
        registry
    }

    /// Register (or replace) a template set under a key.
    ///
    /// A set whose instructions lack the `{tool_names}` placeholder could
    /// never advertise the tools, so it is rejected here rather than at
    /// assembly time.
    pub fn register(&mut self, key: impl Into<String>, set: TemplateSet) -> Result<()> {
        let key = key.into();
        if !set.instructions.contains(TOOL_NAMES_PLACEHOLDER) {
            return Err(Error::Config {
                message: format!(
                    "template set '{}' is missing the {} placeholder",
                    key, TOOL_NAMES_PLACEHOLDER
                ),
            });
        }
        self.insert(key, set);
        Ok(())
    }

    fn insert(&mut self, key: impl Into<String>, set: TemplateSet) {
        let key = key.into();
        if let Some(slot) = self.sets.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = set;
        } else {
            self.sets.push((key, set));
        }
    }

    /// Resolve the template set for a model key.
    ///
    /// Returns `None` only when neither the key, a prefix of it, nor the
    /// fallback is registered, which cannot happen with the builtin registry.
    pub fn lookup(&self, model_key: &str) -> Option<&TemplateSet> {
        if let Some((_, set)) = self.sets.iter().find(|(k, _)| k == model_key) {
            return Some(set);
        }

        // Longest registered key that prefixes the requested key, so
        // "gpt4-turbo" resolves to "gpt4" and "gpt3-v2-beta" to "gpt3-v2".
        let best = self
            .sets
            .iter()
            .filter(|(k, _)| model_key.starts_with(k.as_str()))
            .max_by_key(|(k, _)| k.len());
        if let Some((key, set)) = best {
            tracing::debug!(model_key, resolved = %key, "template resolved by prefix");
            return Some(set);
        }

        tracing::debug!(model_key, "template falling back to default");
        self.sets
            .iter()
            .find(|(k, _)| k == FALLBACK_KEY)
            .map(|(_, set)| set)
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

// ── Builtin template sets ──

fn gpt3_v1() -> TemplateSet {
    TemplateSet::new(
        "Objective: Understand human intentions using user input and available tools. Goal: Identify the most suitable actions to directly address user queries.

When responding:
- Choose actions relevant to the user's query, using multiple actions in a logical order if needed.
- Prioritize direct and specific thoughts to meet user expectations.
- Format results in a way compatible with open-API expectations.
- Offer concise, meaningful answers to user queries.
- Use tools when necessary but rely on your own knowledge for creative requests.
- Strive for variety, avoiding repetitive responses.

# Available Actions & Tools:",
        "Always adhere to the following format in your response to indicate actions taken:

Thought: Summarize your thought process.
Action: Select an action from [{tool_names}].
Action Input: Define the action's input.
Observation: Report the action's result.

Repeat steps 1-4 as needed, in order. When not using a tool, use N/A for Action, provide the result as Action Input, and include an Observation.

Upon reaching the final answer, use this format after completing all necessary actions:

Thought: Indicate that you've determined the final answer.
Final Answer: Present the answer to the user's query.",
        "Keep these guidelines in mind when crafting your response:
- Strictly adhere to the Action format for all responses, as they will be machine-parsed.
- If a tool is unnecessary, quickly move to the Thought/Final Answer format.
- Follow the logical sequence provided by the user without adding extra steps.
- Be honest; if you can't provide an appropriate answer using the given tools, use your own knowledge.
- Aim for efficiency and minimal actions to meet the user's needs effectively.",
    )
}

fn gpt3_v2() -> TemplateSet {
    TemplateSet::new(
        "Objective: Understand the human's query with available actions & tools. Let's work this out in a step by step way to be sure we fulfill the query.

When responding:
- Choose actions relevant to the user's query, using multiple actions in a logical order if needed.
- Prioritize direct and specific thoughts to meet user expectations.
- Format results in a way compatible with open-API expectations.
- Offer concise, meaningful answers to user queries.
- Use tools when necessary but rely on your own knowledge for creative requests.
- Strive for variety, avoiding repetitive responses.

# Available Actions & Tools:",
        "I want you to respond with this format and this format only, without comments or explanations, to indicate actions taken:
```
Thought: Summarize your thought process.
Action: Select an action from [{tool_names}].
Action Input: Define the action's input.
Observation: Report the action's result.
```

Repeat the format for each action as needed. When not using a tool, use N/A for Action, provide the result as Action Input, and include an Observation.

Upon reaching the final answer, use this format after completing all necessary actions:
```
Thought: Indicate that you've determined the final answer.
Final Answer: A conversational reply to the user's query as if you were answering them directly.
```",
        "Keep these guidelines in mind when crafting your response:
- Strictly adhere to the Action format for all responses, as they will be machine-parsed.
- If a tool is unnecessary, quickly move to the Thought/Final Answer format.
- Follow the logical sequence provided by the user without adding extra steps.
- Be honest; if you can't provide an appropriate answer using the given tools, use your own knowledge.
- Aim for efficiency and minimal actions to meet the user's needs effectively.",
    )
}

fn gpt3() -> TemplateSet {
    TemplateSet::new(
        "Objective: Understand the human's query with available actions & tools. Let's work this out in a step by step way to be sure we fulfill the query.

Use available actions and tools judiciously.

# Available Actions & Tools:",
        "I want you to respond with this format and this format only, without comments or explanations, to indicate actions taken:
```
Thought: Your thought process.
Action: Action from [{tool_names}].
Action Input: Action's input.
Observation: Action's result.
```

For each action, repeat the format. If no tool is used, use N/A for Action, and provide the result as Action Input.

Finally, complete with:
```
Thought: Convey final answer determination.
Final Answer: Reply to user's query conversationally.
```",
        "Remember:
- Adhere to the Action format strictly for parsing.
- Transition quickly to Thought/Final Answer format when a tool isn't needed.
- Follow user's logic without superfluous steps.
- If unable to use tools for a fitting answer, use your knowledge.
- Strive for efficient, minimal actions.",
    )
}

fn gpt4_v1() -> TemplateSet {
    TemplateSet::new(
        "Objective: Understand the human's query with available actions & tools. Let's work this out in a step by step way to be sure we fulfill the query.

When responding:
- Choose actions relevant to the query, using multiple actions in a step by step way.
- Prioritize direct and specific thoughts to meet user expectations.
- Be precise and offer meaningful answers to user queries.
- Use tools when necessary but rely on your own knowledge for creative requests.
- Strive for variety, avoiding repetitive responses.

# Available Actions & Tools:",
        "I want you to respond with this format and this format only, without comments or explanations, to indicate actions taken:
```
Thought: Summarize your thought process.
Action: Select an action from [{tool_names}].
Action Input: Define the action's input.
Observation: Report the action's result.
```

Repeat the format for each action as needed. When not using a tool, use N/A for Action, provide the result as Action Input, and include an Observation.

Upon reaching the final answer, use this format after completing all necessary actions:
```
Thought: Indicate that you've determined the final answer.
Final Answer: A conversational reply to the user's query as if you were answering them directly.
```",
        "Keep these guidelines in mind when crafting your final response:
- Strictly adhere to the Action format for all responses.
- If a tool is unnecessary, quickly move to the Thought/Final Answer format, only if no further actions are possible or necessary.
- Follow the logical sequence provided by the user without adding extra steps.
- Be honest: if you can't provide an appropriate answer using the given tools, use your own knowledge.
- Aim for efficiency and minimal actions to meet the user's needs effectively.",
    )
}

fn gpt4() -> TemplateSet {
    TemplateSet::new(
        "Objective: Understand the human's query with available actions & tools. Let's work this out in a step by step way to be sure we fulfill the query.

Use available actions and tools judiciously.

# Available Actions & Tools:",
        "Respond in this specific format without extraneous comments:
```
Thought: Your thought process.
Action: Action from [{tool_names}].
Action Input: Action's input.
Observation: Action's result.
```

For each action, repeat the format. If no tool is used, use N/A for Action, and provide the result as Action Input.

Finally, complete with:
```
Thought: Indicate that you've determined the final answer.
Final Answer: A conversational reply to the user's query, including your full answer.
```",
        "Remember:
- Adhere to the Action format strictly for parsing.
- Transition quickly to Thought/Final Answer format when a tool isn't needed.
- Follow user's logic without superfluous steps.
- If unable to use tools for a fitting answer, use your knowledge.
- Strive for efficient, minimal actions.",
    )
}
