//! TUI application state
//!
//! Pure data structures for the TUI. No rendering logic here. The runner
//! consumes the pending flags (`pending_generate`, `cancel_generate`)
//! because it owns the background task handle.

use std::time::{Duration, Instant};

use crate::planner::MarketingPlan;
use crate::questions::QuestionSet;
use crate::session::{IntakeSession, SubmitOutcome};

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// One question at a time with a text input (default view)
    #[default]
    Form,
    /// Review of all collected answers
    Summary,
    /// Plan request in flight
    Generating,
    /// The generated marketing plan
    Plan,
}

impl View {
    /// Get the display name for the header
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Form => "Interview",
            Self::Summary => "Review",
            Self::Generating => "Generating",
            Self::Plan => "Plan",
        }
    }
}

/// Interaction mode (modal)
#[derive(Debug, Clone, Default)]
pub enum InteractionMode {
    /// Normal key handling for the current view
    #[default]
    Normal,
    /// Confirmation dialog
    Confirm(ConfirmDialog),
    /// Help overlay
    Help,
}

/// Confirmation dialog for destructive actions
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    pub message: String,
    pub action: ConfirmAction,
    pub selected_button: bool, // false = No, true = Yes
}

impl ConfirmDialog {
    pub fn new(action: ConfirmAction, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            action,
            selected_button: false,
        }
    }

    pub fn restart() -> Self {
        Self::new(ConfirmAction::Restart, "Discard all answers and start over?")
    }

    pub fn quit() -> Self {
        Self::new(ConfirmAction::Quit, "Your answers are not saved. Quit anyway?")
    }
}

/// Action to perform on confirm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Restart,
    Quit,
}

/// Main TUI application state
#[derive(Debug)]
pub struct AppState {
    /// Question catalog the session is bound to
    pub questions: QuestionSet,
    /// Interview progress
    pub session: IntakeSession,
    /// Current view
    pub view: View,
    /// Current interaction mode
    pub interaction_mode: InteractionMode,
    /// Text input buffer for the current question
    pub input: String,
    /// Validation message shown under the input
    pub validation: Option<String>,
    /// The generated plan, once available
    pub plan: Option<MarketingPlan>,
    /// Scroll offset for the plan view
    pub plan_scroll: u16,
    /// Last error message
    pub error_message: Option<String>,
    /// Transient notice (catalog reload etc)
    pub notice: Option<String>,
    /// When the in-flight plan request started
    pub generating_since: Option<Instant>,
    /// Queued generate for the runner to spawn
    pub pending_generate: bool,
    /// Queued cancel for the runner to abort
    pub cancel_generate: bool,
    /// Should the app quit
    pub should_quit: bool,
}

impl AppState {
    /// Create state with a fresh session over the given catalog
    pub fn new(questions: QuestionSet) -> Self {
        let session = IntakeSession::new(&questions);
        Self {
            questions,
            session,
            view: View::default(),
            interaction_mode: InteractionMode::default(),
            input: String::new(),
            validation: None,
            plan: None,
            plan_scroll: 0,
            error_message: None,
            notice: None,
            generating_since: None,
            pending_generate: false,
            cancel_generate: false,
            should_quit: false,
        }
    }

    /// Submit the input buffer as the answer to the current question
    ///
    /// An empty answer is rejected and leaves a visible validation message;
    /// the input buffer is kept so the user can keep typing.
    pub fn submit_input(&mut self) {
        let input = std::mem::take(&mut self.input);
        match self.session.submit(&self.questions, &input) {
            SubmitOutcome::Accepted => {
                self.validation = None;
            }
            SubmitOutcome::Completed => {
                self.validation = None;
                self.view = View::Summary;
            }
            SubmitOutcome::RejectedEmpty => {
                self.validation = Some("Please enter an answer before continuing.".to_string());
                self.input = input;
            }
            SubmitOutcome::AlreadyComplete => {
                self.view = View::Summary;
            }
        }
    }

    /// Discard all progress and return to the first question
    pub fn restart(&mut self) {
        self.session.reset(&self.questions);
        self.view = View::Form;
        self.input.clear();
        self.validation = None;
        self.plan = None;
        self.plan_scroll = 0;
        self.generating_since = None;
        self.pending_generate = false;
        self.cancel_generate = false;
    }

    /// Swap in a reloaded catalog
    ///
    /// A changed catalog invalidates the session; collected answers are
    /// discarded and the form starts over with a notice.
    pub fn adopt_catalog(&mut self, questions: QuestionSet) {
        let reset = self.session.ensure_fresh(&questions);
        self.questions = questions;
        if reset {
            self.view = View::Form;
            self.input.clear();
            self.validation = None;
            self.plan = None;
            self.plan_scroll = 0;
            self.notice = Some("Questions changed on disk. Starting over.".to_string());
        }
    }

    /// Mark the plan request as started
    pub fn begin_generating(&mut self) {
        self.view = View::Generating;
        self.generating_since = Some(Instant::now());
        self.error_message = None;
    }

    /// Store the finished plan and show it
    pub fn finish_generating(&mut self, plan: MarketingPlan) {
        self.plan = Some(plan);
        self.plan_scroll = 0;
        self.generating_since = None;
        self.view = View::Plan;
    }

    /// Record a failed plan request and fall back to the review view
    pub fn fail_generating(&mut self, message: impl Into<String>) {
        self.generating_since = None;
        self.view = View::Summary;
        self.error_message = Some(message.into());
    }

    /// Abandon the in-flight request and fall back to the review view
    pub fn cancel_generating(&mut self) {
        self.generating_since = None;
        self.cancel_generate = false;
        self.view = View::Summary;
        self.notice = Some("Plan generation cancelled.".to_string());
    }

    /// How long the current plan request has been running
    pub fn generating_elapsed(&self) -> Option<Duration> {
        self.generating_since.map(|since| since.elapsed())
    }

    /// Set an error message to display
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    /// Clear the error message
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(QuestionSet::builtin())
    }

    #[test]
    fn test_submit_advances_and_completes() {
        let mut state = state();

        for i in 0..9 {
            assert_eq!(state.view, View::Form);
            state.input = format!("answer {}", i);
            state.submit_input();
        }

        assert_eq!(state.view, View::Summary);
        assert!(state.session.is_complete());
    }

    #[test]
    fn test_empty_submit_sets_validation() {
        let mut state = state();

        state.input = "   ".to_string();
        state.submit_input();

        assert_eq!(state.view, View::Form);
        assert_eq!(state.session.step(), 0);
        assert!(state.validation.is_some());

        // A real answer clears the message
        state.input = "Acme".to_string();
        state.submit_input();
        assert!(state.validation.is_none());
        assert_eq!(state.session.step(), 1);
    }

    #[test]
    fn test_restart_clears_progress() {
        let mut state = state();
        state.input = "Acme".to_string();
        state.submit_input();

        state.restart();

        assert_eq!(state.session.step(), 0);
        assert_eq!(state.view, View::Form);
        assert!(state.input.is_empty());
    }

    #[test]
    fn test_adopt_changed_catalog_resets() {
        let mut state = state();
        state.input = "Acme".to_string();
        state.submit_input();

        let mut questions: Vec<_> = QuestionSet::builtin().iter().cloned().collect();
        questions[0].text = "Edited question".to_string();
        let edited = QuestionSet::from_questions(questions).unwrap();

        state.adopt_catalog(edited);

        assert_eq!(state.session.step(), 0);
        assert!(state.notice.is_some());
    }

    #[test]
    fn test_adopt_unchanged_catalog_keeps_progress() {
        let mut state = state();
        state.input = "Acme".to_string();
        state.submit_input();

        state.adopt_catalog(QuestionSet::builtin());

        assert_eq!(state.session.step(), 1);
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_generate_lifecycle() {
        let mut state = state();
        state.begin_generating();
        assert_eq!(state.view, View::Generating);
        assert!(state.generating_elapsed().is_some());

        state.fail_generating("boom");
        assert_eq!(state.view, View::Summary);
        assert_eq!(state.error_message.as_deref(), Some("boom"));
        assert!(state.generating_elapsed().is_none());
    }
}
