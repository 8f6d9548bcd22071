//! Plan generation
//!
//! Turns a completed business record into one completion request and wraps
//! the agent's answer. One call per generation: a failure propagates to the
//! caller with the session untouched, so the user can simply try again.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use eyre::{Context, Report, Result};
use tracing::{debug, info};

use crate::llm::{CompletionRequest, LlmClient, LlmError, Message, TokenUsage};
use crate::prompts::PromptLoader;
use crate::record::BusinessRecord;

/// A generated marketing plan
///
/// The text is opaque: whatever the agent returned, displayed verbatim.
/// Never persisted; regenerating replaces it.
#[derive(Debug, Clone)]
pub struct MarketingPlan {
    pub text: String,
    pub model: String,
    pub usage: TokenUsage,
    pub generated_at: DateTime<Utc>,
}

/// Issues plan requests against the configured LLM
pub struct Planner {
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    model: String,
    max_tokens: u32,
}

impl Planner {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptLoader, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            llm,
            prompts,
            model: model.into(),
            max_tokens,
        }
    }

    /// Generate a marketing plan for the given record
    ///
    /// Renders the instruction and payload templates, issues exactly one
    /// completion call, and returns the agent's text verbatim.
    pub async fn generate(&self, record: &BusinessRecord) -> Result<MarketingPlan> {
        debug!(business = %record.business_name, "Planner::generate: called");

        let system_prompt = self.prompts.system_prompt()?;
        let payload = self.prompts.plan_request(record)?;

        let request = CompletionRequest {
            system_prompt,
            messages: vec![Message::user(payload)],
            max_tokens: self.max_tokens,
        };

        let response = self.llm.complete(request).await.context("Plan request failed")?;

        let text = match response.content {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(eyre::eyre!("Agent returned an empty plan")),
        };

        info!(
            model = %self.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Planner::generate: plan generated"
        );

        Ok(MarketingPlan {
            text,
            model: self.model.clone(),
            usage: response.usage,
            generated_at: Utc::now(),
        })
    }
}

/// User-facing line for a failed plan request
///
/// Rate limits carry a concrete wait, so surface it; anything else shows
/// the error chain as-is.
pub fn failure_message(err: &Report) -> String {
    match err.downcast_ref::<LlmError>().and_then(LlmError::retry_after) {
        Some(wait) => format!("Rate limited by the provider; try again in {}s", wait.as_secs()),
        None => format!("{:#}", err),
    }
}
