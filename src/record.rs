//! The structured business record built from a completed session

use serde::Serialize;
use thiserror::Error;

use crate::questions::QuestionId;
use crate::session::IntakeSession;

/// Errors raised while building a record
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Session incomplete: {answered} of {expected} questions answered")]
    Incomplete { answered: usize, expected: usize },

    #[error("No answer recorded for question: {0}")]
    MissingAnswer(QuestionId),
}

/// Fixed-schema business profile assembled from all nine answers
///
/// Each field is filled from the answer carrying that field's question id,
/// so the catalog's ordering never changes what a field means. Content is
/// taken verbatim; there is no semantic validation.
#[derive(Debug, Clone, Serialize)]
pub struct BusinessRecord {
    pub business_name: String,
    pub industry: String,
    pub budget: String,
    pub website: String,
    pub social_platforms: String,
    pub business_goals: String,
    pub target_audience: String,
    pub content_creation: String,
    pub additional_info: String,
}

impl BusinessRecord {
    /// Build a record from a completed session
    pub fn from_session(session: &IntakeSession) -> Result<Self, RecordError> {
        if !session.is_complete() {
            return Err(RecordError::Incomplete {
                answered: session.step(),
                expected: QuestionId::ALL.len(),
            });
        }

        let field = |id: QuestionId| -> Result<String, RecordError> {
            session
                .answer(id)
                .map(str::to_string)
                .ok_or(RecordError::MissingAnswer(id))
        };

        Ok(Self {
            business_name: field(QuestionId::BusinessName)?,
            industry: field(QuestionId::Industry)?,
            budget: field(QuestionId::Budget)?,
            website: field(QuestionId::Website)?,
            social_platforms: field(QuestionId::SocialPlatforms)?,
            business_goals: field(QuestionId::BusinessGoals)?,
            target_audience: field(QuestionId::TargetAudience)?,
            content_creation: field(QuestionId::ContentCreation)?,
            additional_info: field(QuestionId::AdditionalInfo)?,
        })
    }

    /// Field values in canonical order, for readouts and the prompt payload
    pub fn fields(&self) -> [(QuestionId, &str); 9] {
        [
            (QuestionId::BusinessName, self.business_name.as_str()),
            (QuestionId::Industry, self.industry.as_str()),
            (QuestionId::Budget, self.budget.as_str()),
            (QuestionId::Website, self.website.as_str()),
            (QuestionId::SocialPlatforms, self.social_platforms.as_str()),
            (QuestionId::BusinessGoals, self.business_goals.as_str()),
            (QuestionId::TargetAudience, self.target_audience.as_str()),
            (QuestionId::ContentCreation, self.content_creation.as_str()),
            (QuestionId::AdditionalInfo, self.additional_info.as_str()),
        ]
    }
}
