//! Intake session state machine
//!
//! A session walks the question catalog one confirmed answer at a time.
//! It is a single owned value passed through each interaction handler;
//! reset means constructing a fresh value, and a catalog fingerprint
//! mismatch forces that reset implicitly.

use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::questions::{Question, QuestionId, QuestionSet};

/// A confirmed answer, keyed by question id
#[derive(Debug, Clone)]
pub struct Answer {
    pub id: QuestionId,
    pub text: String,
}

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Collecting,
    Complete,
}

/// Outcome of a submit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Answer recorded, session advanced one step
    Accepted,
    /// Answer recorded and the session is now complete
    Completed,
    /// Empty or whitespace-only answer, nothing changed
    RejectedEmpty,
    /// Session already complete, nothing changed
    AlreadyComplete,
}

/// Errors raised when replaying a saved answer file
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No answer provided for question: {0}")]
    MissingAnswer(QuestionId),

    #[error("Answer for question {0} is empty")]
    EmptyAnswer(QuestionId),
}

/// One user's in-progress or completed questionnaire interaction
///
/// The step counter is the number of recorded answers, so the
/// answers-match-step invariant holds by construction. Each answer
/// carries the id of the question it was given for.
#[derive(Debug, Clone)]
pub struct IntakeSession {
    fingerprint: String,
    total: usize,
    answers: Vec<Answer>,
}

impl IntakeSession {
    /// Start a fresh session bound to the given catalog
    pub fn new(questions: &QuestionSet) -> Self {
        debug!(fingerprint = %questions.fingerprint(), "IntakeSession::new: starting fresh session");
        Self {
            fingerprint: questions.fingerprint().to_string(),
            total: questions.len(),
            answers: Vec::new(),
        }
    }

    /// Replay a full saved answer map through the state machine
    ///
    /// Used by batch mode. Every catalog question must have a non-empty
    /// answer under its id.
    pub fn from_saved_answers(
        questions: &QuestionSet,
        saved: &HashMap<QuestionId, String>,
    ) -> Result<Self, SessionError> {
        let mut session = Self::new(questions);
        for question in questions.iter() {
            let Some(raw) = saved.get(&question.id) else {
                return Err(SessionError::MissingAnswer(question.id));
            };
            if let SubmitOutcome::RejectedEmpty = session.submit(questions, raw) {
                return Err(SessionError::EmptyAnswer(question.id));
            }
        }
        Ok(session)
    }

    /// Number of confirmed answers
    pub fn step(&self) -> usize {
        self.answers.len()
    }

    /// Confirmed answers in question order
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// The answer recorded for the given id, if any
    pub fn answer(&self, id: QuestionId) -> Option<&str> {
        self.answers.iter().find(|a| a.id == id).map(|a| a.text.as_str())
    }

    pub fn phase(&self) -> Phase {
        if self.answers.len() >= self.total {
            Phase::Complete
        } else {
            Phase::Collecting
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == Phase::Complete
    }

    /// The question awaiting an answer, if any
    pub fn current_question<'q>(&self, questions: &'q QuestionSet) -> Option<&'q Question> {
        questions.get(self.step())
    }

    /// Record an answer for the current question
    ///
    /// Trims surrounding whitespace. A rejected submit (empty answer or
    /// already-complete session) changes nothing; the caller re-presents
    /// the same question with a validation message.
    pub fn submit(&mut self, questions: &QuestionSet, raw: &str) -> SubmitOutcome {
        let Some(question) = questions.get(self.step()) else {
            debug!("IntakeSession::submit: session already complete");
            return SubmitOutcome::AlreadyComplete;
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            debug!(id = %question.id, "IntakeSession::submit: rejected empty answer");
            return SubmitOutcome::RejectedEmpty;
        }

        debug!(id = %question.id, step = self.step(), "IntakeSession::submit: answer accepted");
        self.answers.push(Answer {
            id: question.id,
            text: trimmed.to_string(),
        });

        if self.is_complete() {
            SubmitOutcome::Completed
        } else {
            SubmitOutcome::Accepted
        }
    }

    /// Discard all progress, keeping the catalog binding
    pub fn reset(&mut self, questions: &QuestionSet) {
        debug!(step = self.step(), "IntakeSession::reset: discarding session");
        *self = Self::new(questions);
    }

    /// Replace the session if the catalog changed underneath it
    ///
    /// Returns true when a stale session was discarded.
    pub fn ensure_fresh(&mut self, questions: &QuestionSet) -> bool {
        if self.fingerprint != questions.fingerprint() {
            debug!(
                old = %self.fingerprint,
                new = %questions.fingerprint(),
                "IntakeSession::ensure_fresh: catalog changed, resetting"
            );
            *self = Self::new(questions);
            true
        } else {
            false
        }
    }
}
