//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use crate::record::BusinessRecord;

/// Context for rendering the plan request template
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
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

impl PromptContext {
    /// Build a rendering context from a business record
    pub fn from_record(record: &BusinessRecord) -> Self {
        Self {
            business_name: record.business_name.clone(),
            industry: record.industry.clone(),
            budget: record.budget.clone(),
            website: record.website.clone(),
            social_platforms: record.social_platforms.clone(),
            business_goals: record.business_goals.clone(),
            target_audience: record.target_audience.clone(),
            content_creation: record.content_creation.clone(),
            additional_info: record.additional_info.clone(),
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `.planform/prompts/`)
    user_dir: Option<PathBuf>,
    /// Repo default directory (e.g., `prompts/`)
    repo_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader rooted at the given directory
    ///
    /// # Arguments
    /// * `root` - Directory to find `.planform/prompts/` and `prompts/` under
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let user_dir = root.join(".planform/prompts");
        let repo_dir = root.join("prompts");

        Self {
            hbs: Self::renderer(),
            user_dir: if user_dir.exists() { Some(user_dir) } else { None },
            repo_dir: if repo_dir.exists() { Some(repo_dir) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        Self {
            hbs: Self::renderer(),
            user_dir: None,
            repo_dir: None,
        }
    }

    /// Handlebars tuned for plain-text prompts: answers must land in the
    /// payload verbatim, so HTML entity escaping is turned off.
    fn renderer() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `.planform/prompts/{name}.pmt`
    /// 2. Repo default: `prompts/{name}.pmt`
    /// 3. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        // Try user override first
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!("Loading prompt from user override: {:?}", path);
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
        }

        // Try repo default
        if let Some(ref repo_dir) = self.repo_dir {
            let path = repo_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!("Loading prompt from repo: {:?}", path);
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read repo prompt {}: {}", path.display(), e));
            }
        }

        // Fall back to embedded
        if let Some(content) = embedded::get_embedded(name) {
            debug!("Using embedded prompt: {}", name);
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// The fixed instruction prompt for plan generation
    pub fn system_prompt(&self) -> Result<String> {
        self.load_template("plan-system")
    }

    /// Render the plan request payload from a business record
    pub fn plan_request(&self, record: &BusinessRecord) -> Result<String> {
        let template = self.load_template("plan-request")?;
        let context = PromptContext::from_record(record);
        info!("Rendering plan request for '{}'", context.business_name);

        self.hbs
            .render_template(&template, &context)
            .map_err(|e| eyre!("Failed to render template plan-request: {}", e))
    }
}
