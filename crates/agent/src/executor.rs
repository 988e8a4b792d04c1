//! The agent executor: composes one turn end to end.
//!
//! Per turn: resolve templates for the configured model key, assemble the
//! system prompt, splice in the windowed conversation history and the new
//! user input, pre-check the token budget, run the capability-appropriate
//! strategy, and commit the exchange to memory.

use std::sync::Arc;

use tracing::{debug, info};

use reagent_config::LoopConfig;
use reagent_core::token::estimate_tokens;
use reagent_core::{ConversationId, Error, MemoryEntry, ModelClient, Result, ToolRegistry};
use reagent_memory::ConversationMemory;
use reagent_prompt::{assemble, PromptOptions, TemplateRegistry};

use crate::dispatcher::ToolDispatcher;
use crate::strategy::{
    LoopBudget, NativeToolStrategy, TextProtocolStrategy, TurnContext, TurnResult, TurnStrategy,
};

pub struct AgentExecutor {
    model: Arc<dyn ModelClient>,
    tools: Arc<ToolRegistry>,
    memory: Arc<dyn ConversationMemory>,
    templates: TemplateRegistry,
    config: LoopConfig,
    dispatcher: ToolDispatcher,
}

impl AgentExecutor {
    pub fn new(
        model: Arc<dyn ModelClient>,
        tools: Arc<ToolRegistry>,
        memory: Arc<dyn ConversationMemory>,
        config: LoopConfig,
    ) -> Self {
        let dispatcher = ToolDispatcher::new(tools.clone(), config.tool_timeout_secs);
        Self {
            model,
            tools,
            memory,
            templates: TemplateRegistry::with_builtins(),
            config,
            dispatcher,
        }
    }

    /// Replace the template registry (for custom template sets).
    pub fn with_templates(mut self, templates: TemplateRegistry) -> Self {
        self.templates = templates;
        self
    }

    /// Run one turn of the conversation.
    ///
    /// `current_date` goes verbatim into the prompt's date header. On
    /// success the user input and the delivered answer (fallbacks
    /// included) are appended to memory; on error nothing is committed.
    pub async fn run_turn(
        &self,
        conversation: &ConversationId,
        user_input: &str,
        current_date: &str,
    ) -> Result<TurnResult> {
        let templates = self
            .templates
            .lookup(&self.config.model_key)
            .ok_or_else(|| Error::Config {
                message: format!("no template set for model key '{}'", self.config.model_key),
            })?;

        let system_prompt = assemble(
            templates,
            &self.tools.descriptors(),
            &PromptOptions {
                persona_name: self.config.persona_name.clone(),
                custom_instructions: self.config.custom_instructions.clone(),
                current_date: current_date.to_string(),
            },
        );

        let history = self
            .memory
            .window(conversation, self.config.memory_window_tokens)
            .await
            .map_err(Error::Memory)?;

        let mut prompt = system_prompt;
        prompt.push_str("\n\n");
        for entry in &history {
            prompt.push_str(&entry.transcript_line());
            prompt.push('\n');
        }
        prompt.push_str("User: ");
        prompt.push_str(user_input);

        // The prompt must fit before the first request is even worth
        // making.
        let prompt_cost = estimate_tokens(&prompt);
        if prompt_cost > self.config.token_budget {
            return Err(Error::BudgetExceeded {
                required: prompt_cost,
                budget: self.config.token_budget,
            });
        }
        let mut budget = LoopBudget::new(self.config.token_budget, self.config.max_iterations);
        budget.charge_tokens(prompt_cost);

        debug!(
            conversation = %conversation,
            prompt_tokens = prompt_cost,
            history_entries = history.len(),
            "turn prepared"
        );

        let ctx = TurnContext {
            model: self.model.as_ref(),
            dispatcher: &self.dispatcher,
            config: &self.config,
            prompt,
            budget,
        };

        let result = if self.model.supports_native_tools() {
            NativeToolStrategy.run(ctx).await?
        } else {
            TextProtocolStrategy.run(ctx).await?
        };

        // One atomic commit, so concurrent turns on this conversation
        // cannot interleave their entries.
        self.memory
            .append_turn(
                conversation,
                MemoryEntry::user(user_input),
                MemoryEntry::assistant(&result.answer),
            )
            .await
            .map_err(Error::Memory)?;

        info!(
            conversation = %conversation,
            outcome = ?result.outcome,
            iterations = result.iterations,
            "turn committed"
        );
        Ok(result)
    }
}
