//! Embedded fallback prompts
//!
//! These are compiled into the binary and used when template files are not found.

/// System prompt for marketing plan generation
pub const PLAN_SYSTEM: &str = r#"You are a social media marketing strategist creating a plan for a small business.

You will receive a structured business profile: name and location, industry,
budget, website, active platforms, goals, target audience, content
preferences, and any additional notes.

Produce a practical plan that covers:
- Positioning: how the brand should present itself on its platforms
- Content pillars: 3-5 recurring themes matched to the stated preferences
- Posting cadence: a weekly schedule that fits the stated budget
- Growth tactics: concrete steps toward the stated goals
- Measurement: which numbers to watch and what good looks like

Ground every recommendation in the profile you were given. Where the profile
is vague, state the assumption you are making.

Output format: Write the complete plan as markdown.
"#;

/// User message carrying the business profile
pub const PLAN_REQUEST: &str = r#"Create a social media marketing plan for the following business:

business_name: {{business_name}}
industry: {{industry}}
budget: {{budget}}
website: {{website}}
social_platforms: {{social_platforms}}
business_goals: {{business_goals}}
target_audience: {{target_audience}}
content_creation: {{content_creation}}
additional_info: {{additional_info}}
"#;

/// Get an embedded prompt by template name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "plan-system" => Some(PLAN_SYSTEM),
        "plan-request" => Some(PLAN_REQUEST),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_plan_system() {
        assert!(get_embedded("plan-system").is_some());
        assert!(get_embedded("plan-system").unwrap().contains("marketing strategist"));
    }

    #[test]
    fn test_get_embedded_plan_request() {
        let template = get_embedded("plan-request").unwrap();
        assert!(template.contains("{{business_name}}"));
        assert!(template.contains("{{additional_info}}"));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("nonexistent").is_none());
    }
}
