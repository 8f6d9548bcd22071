//! Planform - guided business intake and marketing plan generation
//!
//! Planform walks a business owner through a fixed interview, validates the
//! answers into a structured record, and asks an LLM for a social media
//! marketing plan built from that record.
//!
//! # Core Concepts
//!
//! - **Keyed Answers**: Every answer is stored under its question id, so the
//!   record never depends on question order
//! - **Owned Session State**: Interview progress lives in an explicit
//!   [`session::IntakeSession`] value that each surface drives
//! - **One Call Per Plan**: A plan is a single completion request; failures
//!   surface to the user instead of retrying silently
//!
//! # Modules
//!
//! - [`questions`] - The question catalog and its fingerprint
//! - [`session`] - Interview state machine
//! - [`record`] - The validated business record
//! - [`llm`] - LLM client trait with OpenAI and Anthropic implementations
//! - [`planner`] - Turns a record into a marketing plan
//! - [`prompts`] - Prompt templates with file overrides
//! - [`tui`] - Full-screen interview
//! - [`interview`] - Plain-terminal interview
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod interview;
pub mod llm;
pub mod planner;
pub mod prompts;
pub mod questions;
pub mod record;
pub mod session;
pub mod tui;

// Re-export commonly used types
pub use config::{Config, LlmConfig, QuestionsConfig};
pub use interview::Interview;
pub use llm::{
    AnthropicClient, CompletionRequest, CompletionResponse, LlmClient, LlmError, Message, OpenAIClient, Role,
    StopReason, TokenUsage, create_client,
};
pub use planner::{MarketingPlan, Planner};
pub use prompts::{PromptContext, PromptLoader};
pub use questions::{Question, QuestionId, QuestionSet, QuestionSetError};
pub use record::{BusinessRecord, RecordError};
pub use session::{Answer, IntakeSession, Phase, SessionError, SubmitOutcome};
