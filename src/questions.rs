//! Intake question catalog
//!
//! Nine questions, each keyed by a stable identifier that names the
//! BusinessRecord field it fills. A built-in catalog ships in the binary;
//! a YAML file may replace the wording, but every identifier must appear
//! exactly once. The catalog's content fingerprint detects stale
//! in-progress sessions after the questions change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Stable identifier for an intake question
///
/// One variant per BusinessRecord field. Answers are mapped to record
/// fields by identifier, never by list position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionId {
    BusinessName,
    Industry,
    Budget,
    Website,
    SocialPlatforms,
    BusinessGoals,
    TargetAudience,
    ContentCreation,
    AdditionalInfo,
}

impl QuestionId {
    /// All identifiers in canonical record order
    pub const ALL: [QuestionId; 9] = [
        QuestionId::BusinessName,
        QuestionId::Industry,
        QuestionId::Budget,
        QuestionId::Website,
        QuestionId::SocialPlatforms,
        QuestionId::BusinessGoals,
        QuestionId::TargetAudience,
        QuestionId::ContentCreation,
        QuestionId::AdditionalInfo,
    ];

    /// Identifier as it appears in config and answer files
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionId::BusinessName => "business_name",
            QuestionId::Industry => "industry",
            QuestionId::Budget => "budget",
            QuestionId::Website => "website",
            QuestionId::SocialPlatforms => "social_platforms",
            QuestionId::BusinessGoals => "business_goals",
            QuestionId::TargetAudience => "target_audience",
            QuestionId::ContentCreation => "content_creation",
            QuestionId::AdditionalInfo => "additional_info",
        }
    }

    /// Short human label for readouts
    pub fn label(&self) -> &'static str {
        match self {
            QuestionId::BusinessName => "Business name",
            QuestionId::Industry => "Industry",
            QuestionId::Budget => "Budget",
            QuestionId::Website => "Website",
            QuestionId::SocialPlatforms => "Social platforms",
            QuestionId::BusinessGoals => "Business goals",
            QuestionId::TargetAudience => "Target audience",
            QuestionId::ContentCreation => "Content preferences",
            QuestionId::AdditionalInfo => "Additional info",
        }
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single intake question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
}

/// Errors raised while loading a question catalog
#[derive(Debug, Error)]
pub enum QuestionSetError {
    #[error("Failed to read questions file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse questions file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Duplicate question id: {0}")]
    DuplicateId(QuestionId),

    #[error("Missing question id: {0}")]
    MissingId(QuestionId),

    #[error("Empty question text for id: {0}")]
    EmptyText(QuestionId),
}

/// Ordered, immutable set of intake questions
///
/// Guaranteed to contain every QuestionId exactly once with non-empty text.
#[derive(Debug, Clone)]
pub struct QuestionSet {
    questions: Vec<Question>,
    fingerprint: String,
}

impl QuestionSet {
    /// The catalog compiled into the binary
    pub fn builtin() -> Self {
        let questions = vec![
            Question {
                id: QuestionId::BusinessName,
                text: "What's your business name and location?".to_string(),
            },
            Question {
                id: QuestionId::Industry,
                text: "What industry are you in, and what do you sell?".to_string(),
            },
            Question {
                id: QuestionId::Budget,
                text: "What's your monthly budget for social media marketing?".to_string(),
            },
            Question {
                id: QuestionId::Website,
                text: "Do you have a website or online store? Share the link.".to_string(),
            },
            Question {
                id: QuestionId::SocialPlatforms,
                text: "Which social platforms are you currently active on?".to_string(),
            },
            Question {
                id: QuestionId::BusinessGoals,
                text: "What's your main goal with Instagram & Facebook?".to_string(),
            },
            Question {
                id: QuestionId::TargetAudience,
                text: "Who are your ideal customers, and where are they mostly located?".to_string(),
            },
            Question {
                id: QuestionId::ContentCreation,
                text: "What kind of posts do you want to see more of?".to_string(),
            },
            Question {
                id: QuestionId::AdditionalInfo,
                text: "Any specific requirements, challenges, or additional information?".to_string(),
            },
        ];

        // Covers every id by construction, no validation needed
        let fingerprint = compute_fingerprint(&questions);
        Self { questions, fingerprint }
    }

    /// Load a catalog from a YAML file (a list of `{id, text}` entries)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, QuestionSetError> {
        debug!(path = %path.as_ref().display(), "QuestionSet::from_file: called");
        let content = fs::read_to_string(&path)?;
        let questions: Vec<Question> = serde_yaml::from_str(&content)?;
        Self::from_questions(questions)
    }

    /// Build a catalog from parsed questions, validating id coverage
    pub fn from_questions(questions: Vec<Question>) -> Result<Self, QuestionSetError> {
        let mut seen: Vec<QuestionId> = Vec::with_capacity(questions.len());
        for question in &questions {
            if seen.contains(&question.id) {
                return Err(QuestionSetError::DuplicateId(question.id));
            }
            if question.text.trim().is_empty() {
                return Err(QuestionSetError::EmptyText(question.id));
            }
            seen.push(question.id);
        }
        for id in QuestionId::ALL {
            if !seen.contains(&id) {
                return Err(QuestionSetError::MissingId(id));
            }
        }

        let fingerprint = compute_fingerprint(&questions);
        Ok(Self { questions, fingerprint })
    }

    /// Number of questions in the catalog
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Question at the given step, if any
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Question> {
        self.questions.iter()
    }

    /// Content fingerprint for staleness detection
    ///
    /// Changes whenever any question's id, text, or position changes.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Simple hash for content (not cryptographic, just for change detection)
fn content_hash(data: &[u8]) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    data.hash(&mut hasher);
    hasher.finish()
}

fn compute_fingerprint(questions: &[Question]) -> String {
    let mut joined = String::new();
    for question in questions {
        joined.push_str(question.id.as_str());
        joined.push(':');
        joined.push_str(&question.text);
        joined.push('\n');
    }
    format!("{:x}", content_hash(joined.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_all_ids_in_order() {
        let set = QuestionSet::builtin();

        assert_eq!(set.len(), 9);
        for (question, id) in set.iter().zip(QuestionId::ALL) {
            assert_eq!(question.id, id);
            assert!(!question.text.is_empty());
        }
    }

    #[test]
    fn test_fingerprint_stable_for_same_content() {
        let a = QuestionSet::builtin();
        let b = QuestionSet::builtin();

        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_changes_on_text_edit() {
        let a = QuestionSet::builtin();

        let mut questions: Vec<Question> = a.iter().cloned().collect();
        questions[3].text.push('!');
        let b = QuestionSet::from_questions(questions).unwrap();

        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_changes_on_reorder() {
        let a = QuestionSet::builtin();

        let mut questions: Vec<Question> = a.iter().cloned().collect();
        questions.swap(0, 8);
        let b = QuestionSet::from_questions(questions).unwrap();

        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut questions: Vec<Question> = QuestionSet::builtin().iter().cloned().collect();
        questions[1].id = QuestionId::BusinessName;

        let err = QuestionSet::from_questions(questions).unwrap_err();
        assert!(matches!(err, QuestionSetError::DuplicateId(QuestionId::BusinessName)));
    }

    #[test]
    fn test_missing_id_rejected() {
        let mut questions: Vec<Question> = QuestionSet::builtin().iter().cloned().collect();
        questions.pop();

        let err = QuestionSet::from_questions(questions).unwrap_err();
        assert!(matches!(err, QuestionSetError::MissingId(QuestionId::AdditionalInfo)));
    }

    #[test]
    fn test_empty_text_rejected() {
        let mut questions: Vec<Question> = QuestionSet::builtin().iter().cloned().collect();
        questions[0].text = "   ".to_string();

        let err = QuestionSet::from_questions(questions).unwrap_err();
        assert!(matches!(err, QuestionSetError::EmptyText(QuestionId::BusinessName)));
    }

    #[test]
    fn test_from_file_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("questions.yml");

        let yaml = r#"
- id: business_name
  text: "Name and location?"
- id: industry
  text: "Industry?"
- id: budget
  text: "Budget?"
- id: website
  text: "Website?"
- id: social_platforms
  text: "Platforms?"
- id: business_goals
  text: "Goals?"
- id: target_audience
  text: "Audience?"
- id: content_creation
  text: "Content?"
- id: additional_info
  text: "Anything else?"
"#;
        std::fs::write(&path, yaml).unwrap();

        let set = QuestionSet::from_file(&path).unwrap();
        assert_eq!(set.len(), 9);
        assert_eq!(set.get(0).unwrap().text, "Name and location?");
        assert_eq!(set.get(0).unwrap().id, QuestionId::BusinessName);
    }

    #[test]
    fn test_question_id_serde_snake_case() {
        let yaml = serde_yaml::to_string(&QuestionId::SocialPlatforms).unwrap();
        assert_eq!(yaml.trim(), "social_platforms");

        let id: QuestionId = serde_yaml::from_str("target_audience").unwrap();
        assert_eq!(id, QuestionId::TargetAudience);
    }
}
