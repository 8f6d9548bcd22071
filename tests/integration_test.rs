//! Integration tests for Planform
//!
//! These tests drive the interview, record building, and plan generation
//! end-to-end against a stub LLM client.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serial_test::serial;
use tempfile::TempDir;

use planform::config::Config;
use planform::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, StopReason, TokenUsage};
use planform::planner::Planner;
use planform::prompts::PromptLoader;
use planform::questions::{QuestionId, QuestionSet};
use planform::record::BusinessRecord;
use planform::session::{IntakeSession, Phase, SubmitOutcome};

/// Stub client that records requests and returns a canned reply
struct StubLlm {
    reply: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubLlm {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn last_request(&self) -> CompletionRequest {
        self.requests.lock().unwrap().last().cloned().expect("No request captured")
    }
}

#[async_trait]
impl LlmClient for StubLlm {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request);
        match &self.reply {
            Some(text) => Ok(CompletionResponse {
                content: Some(text.clone()),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage {
                    input_tokens: 120,
                    output_tokens: 600,
                },
            }),
            None => Err(LlmError::ApiError {
                status: 500,
                message: "stub failure".to_string(),
            }),
        }
    }
}

fn planner_with(llm: Arc<StubLlm>) -> Planner {
    Planner::new(llm, PromptLoader::embedded_only(), "test-model", 4096)
}

const ANSWERS: [(QuestionId, &str); 9] = [
    (QuestionId::BusinessName, "Bloom's Coffee & Tea, Portland"),
    (QuestionId::Industry, "Specialty coffee roasting"),
    (QuestionId::Budget, "$800 per month"),
    (QuestionId::Website, "https://bloomcoffee.example"),
    (QuestionId::SocialPlatforms, "Instagram and Facebook"),
    (QuestionId::BusinessGoals, "Grow local followers and foot traffic"),
    (QuestionId::TargetAudience, "Young professionals in Portland"),
    (QuestionId::ContentCreation, "Behind-the-scenes roasting videos"),
    (QuestionId::AdditionalInfo, "We open a second location in October"),
];

// =============================================================================
// Interview Flow Tests
// =============================================================================

#[tokio::test]
async fn test_full_interview_to_plan() {
    let questions = QuestionSet::builtin();
    let mut session = IntakeSession::new(&questions);

    for (i, (_, answer)) in ANSWERS.iter().enumerate() {
        let outcome = session.submit(&questions, answer);
        if i < ANSWERS.len() - 1 {
            assert_eq!(outcome, SubmitOutcome::Accepted);
        } else {
            assert_eq!(outcome, SubmitOutcome::Completed);
        }
    }
    assert_eq!(session.phase(), Phase::Complete);

    let record = BusinessRecord::from_session(&session).expect("Record should build from a complete session");
    assert_eq!(record.business_name, "Bloom's Coffee & Tea, Portland");
    assert_eq!(record.additional_info, "We open a second location in October");

    let llm = StubLlm::replying("## Marketing Plan\n\nPost three times a week.");
    let planner = planner_with(Arc::clone(&llm));

    let plan = planner.generate(&record).await.expect("Plan generation should succeed");

    // The agent's text is displayed verbatim
    assert_eq!(plan.text, "## Marketing Plan\n\nPost three times a week.");
    assert_eq!(plan.usage.output_tokens, 600);

    // The request payload carries every collected answer
    let request = llm.last_request();
    let payload = &request.messages[0].content;
    for (_, answer) in ANSWERS {
        assert!(payload.contains(answer), "Payload should contain answer: {}", answer);
    }
    assert!(request.system_prompt.contains("marketing"));
}

#[tokio::test]
async fn test_blank_answers_are_rejected_until_filled() {
    let questions = QuestionSet::builtin();
    let mut session = IntakeSession::new(&questions);

    assert_eq!(session.submit(&questions, ""), SubmitOutcome::RejectedEmpty);
    assert_eq!(session.submit(&questions, "   \t  "), SubmitOutcome::RejectedEmpty);
    assert_eq!(session.step(), 0, "Rejected submits must not advance the session");

    assert_eq!(session.submit(&questions, "Bloom Coffee"), SubmitOutcome::Accepted);
    assert_eq!(session.step(), 1);
}

#[tokio::test]
async fn test_restart_discards_answers() {
    let questions = QuestionSet::builtin();
    let mut session = IntakeSession::new(&questions);

    session.submit(&questions, "Bloom Coffee");
    session.submit(&questions, "Coffee roasting");
    assert_eq!(session.step(), 2);

    session.reset(&questions);
    assert_eq!(session.step(), 0);
    assert_eq!(session.phase(), Phase::Collecting);
    assert!(session.answers().is_empty());
}

// =============================================================================
// Batch Replay Tests
// =============================================================================

#[test]
fn test_batch_replay_matches_interactive() {
    let questions = QuestionSet::builtin();

    let mut interactive = IntakeSession::new(&questions);
    for (_, answer) in ANSWERS {
        interactive.submit(&questions, answer);
    }

    let map: HashMap<QuestionId, String> = ANSWERS.iter().map(|(id, a)| (*id, a.to_string())).collect();
    let replayed = IntakeSession::from_saved_answers(&questions, &map).expect("Replay should succeed");

    let from_interactive = BusinessRecord::from_session(&interactive).unwrap();
    let from_replay = BusinessRecord::from_session(&replayed).unwrap();

    assert_eq!(from_interactive.business_name, from_replay.business_name);
    assert_eq!(from_interactive.budget, from_replay.budget);
    assert_eq!(from_interactive.target_audience, from_replay.target_audience);
}

#[test]
fn test_batch_replay_missing_answer_fails() {
    let questions = QuestionSet::builtin();

    let mut map: HashMap<QuestionId, String> = ANSWERS.iter().map(|(id, a)| (*id, a.to_string())).collect();
    map.remove(&QuestionId::Budget);

    let result = IntakeSession::from_saved_answers(&questions, &map);
    let err = result.expect_err("Replay with a missing answer must fail");
    assert!(err.to_string().contains("budget"), "Error should name the question: {}", err);
}

#[test]
fn test_batch_replay_blank_answer_fails() {
    let questions = QuestionSet::builtin();

    let mut map: HashMap<QuestionId, String> = ANSWERS.iter().map(|(id, a)| (*id, a.to_string())).collect();
    map.insert(QuestionId::Website, "   ".to_string());

    let result = IntakeSession::from_saved_answers(&questions, &map);
    assert!(result.is_err(), "Blank answers are as invalid in batch mode as interactively");
}

// =============================================================================
// Plan Generation Tests
// =============================================================================

#[tokio::test]
async fn test_plan_failure_surfaces_error() {
    let questions = QuestionSet::builtin();
    let mut session = IntakeSession::new(&questions);
    for (_, answer) in ANSWERS {
        session.submit(&questions, answer);
    }
    let record = BusinessRecord::from_session(&session).unwrap();

    let planner = planner_with(StubLlm::failing());
    let result = planner.generate(&record).await;

    let err = result.expect_err("A failed agent call must propagate");
    let chain = format!("{:#}", err);
    assert!(chain.contains("Plan request failed"), "Error should explain the stage: {}", chain);
}

#[tokio::test]
async fn test_answers_survive_plan_failure() {
    let questions = QuestionSet::builtin();
    let mut session = IntakeSession::new(&questions);
    for (_, answer) in ANSWERS {
        session.submit(&questions, answer);
    }

    let record = BusinessRecord::from_session(&session).unwrap();
    let planner = planner_with(StubLlm::failing());
    let _ = planner.generate(&record).await;

    // The session is untouched; a retry can build the same record
    assert_eq!(session.phase(), Phase::Complete);
    let retry_record = BusinessRecord::from_session(&session).unwrap();
    assert_eq!(retry_record.business_name, "Bloom's Coffee & Tea, Portland");
}

// =============================================================================
// Question Catalog Tests
// =============================================================================

#[test]
fn test_catalog_edit_invalidates_session() {
    let questions = QuestionSet::builtin();
    let mut session = IntakeSession::new(&questions);
    session.submit(&questions, "Bloom Coffee");

    let mut edited: Vec<_> = questions.iter().cloned().collect();
    edited[3].text = "Where can customers find you online?".to_string();
    let edited = QuestionSet::from_questions(edited).unwrap();

    assert!(session.ensure_fresh(&edited), "A text edit must discard the session");
    assert_eq!(session.step(), 0);

    // The same catalog leaves progress alone
    session.submit(&edited, "Bloom Coffee");
    assert!(!session.ensure_fresh(&edited));
    assert_eq!(session.step(), 1);
}

#[test]
fn test_questions_file_roundtrip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("questions.yml");

    let yaml = r#"
- id: business_name
  text: "What is the business called?"
- id: industry
  text: "What do you sell?"
- id: budget
  text: "What is the monthly budget?"
- id: website
  text: "Where is the website?"
- id: social_platforms
  text: "Which platforms are active?"
- id: business_goals
  text: "What is the goal?"
- id: target_audience
  text: "Who are the customers?"
- id: content_creation
  text: "What content should we make?"
- id: additional_info
  text: "Anything else?"
"#;
    std::fs::write(&path, yaml).expect("Failed to write questions file");

    let questions = QuestionSet::from_file(&path).expect("File catalog should load");
    assert_eq!(questions.len(), 9);
    assert_ne!(
        questions.fingerprint(),
        QuestionSet::builtin().fingerprint(),
        "Different texts must produce a different fingerprint"
    );
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
#[serial]
fn test_config_validation_missing_api_key() {
    let mut config = Config::default();
    config.llm.api_key_env = "PLANFORM_NONEXISTENT_TEST_KEY".to_string();

    let result = config.validate();

    assert!(result.is_err(), "Should fail without API key");
    let err = result.unwrap_err().to_string();
    assert!(
        err.contains("PLANFORM_NONEXISTENT_TEST_KEY"),
        "Error should mention the env var"
    );
}

#[test]
#[serial]
fn test_config_validation_with_api_key() {
    // SAFETY: We're in a single-threaded test environment
    unsafe {
        std::env::set_var("PLANFORM_PRESENT_TEST_KEY", "test-key");
    }

    let mut config = Config::default();
    config.llm.api_key_env = "PLANFORM_PRESENT_TEST_KEY".to_string();
    let result = config.validate();

    // Clean up
    // SAFETY: We're in a single-threaded test environment
    unsafe {
        std::env::remove_var("PLANFORM_PRESENT_TEST_KEY");
    }

    assert!(result.is_ok(), "Should pass with API key set");
}

#[test]
fn test_config_load_explicit_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("planform.yml");

    let yaml = r#"
llm:
  provider: anthropic
  model: claude-sonnet-4
  api-key-env: ANTHROPIC_API_KEY
  max-tokens: 2048
"#;
    std::fs::write(&path, yaml).expect("Failed to write config file");

    let config = Config::load(Some(&path)).expect("Explicit config should load");
    assert_eq!(config.llm.provider, "anthropic");
    assert_eq!(config.llm.model, "claude-sonnet-4");
    assert_eq!(config.llm.max_tokens, 2048);
    // Unspecified fields keep their defaults
    assert_eq!(config.llm.timeout_ms, 120_000);
}
