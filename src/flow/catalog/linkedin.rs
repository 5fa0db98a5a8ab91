use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::flow::constants::{prompt, system_prompt};
use crate::flow::{FlowEngine, FlowSpec};
use crate::prompt::{FlowInput, PromptWriter};
use crate::schema::Schema;

pub const NAME: &str = "linkedin-optimizer";

/// LinkedIn 标题字数上限
pub const HEADLINE_LIMIT: usize = 220;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInInput {
    pub current_headline: String,
    pub about: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_role: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInOutput {
    pub headline: String,
    pub about: String,
    pub skills_to_add: Vec<String>,
    pub tips: Vec<String>,
}

pub fn input_schema() -> Schema {
    Schema::object()
        .field("currentHeadline", Schema::string().max_length(HEADLINE_LIMIT))
        .field("about", Schema::string().non_empty())
        .field("experience", Schema::string().optional())
        .field("targetRole", Schema::string().optional())
        .field("skills", Schema::array(Schema::string()).optional())
}

pub fn output_schema() -> Schema {
    Schema::object()
        .field("headline", Schema::string().non_empty().max_length(HEADLINE_LIMIT))
        .field("about", Schema::string().non_empty())
        .field("skillsToAdd", Schema::array(Schema::string()))
        .field("tips", Schema::array(Schema::string()))
}

fn template(input: &FlowInput<'_>) -> String {
    let mut w = PromptWriter::new();
    w.line("Rewrite this LinkedIn profile so it attracts recruiters.")
        .blank()
        .optional_field("Current Headline", input.optional_text("currentHeadline"))
        .block("About", input.text("about"))
        .section_if(input.optional_text("experience").is_some(), |w| {
            w.block("Experience", input.text("experience"));
        })
        .optional_field("Target Role", input.optional_text("targetRole"))
        .bullets("Listed Skills", &input.list("skills"))
        .blank()
        .line(format!(
            "Keep the headline under {HEADLINE_LIMIT} characters and keyword-rich."
        ))
        .line("Write the About section in the first person, suggest skills worth adding")
        .line("and give short profile tips.");
    w.finish()
}

pub fn spec() -> FlowSpec {
    FlowSpec::new(NAME, "LinkedIn Optimizer", input_schema(), output_schema(), template)
        .with_description("Rewrites a LinkedIn headline and summary for a target role.")
        .with_system(system_prompt(prompt::CAREER_COACH))
}

pub async fn optimize_profile(
    engine: &FlowEngine,
    input: &LinkedInInput,
) -> Result<LinkedInOutput> {
    engine.execute_typed(NAME, input).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_headline_is_allowed_but_omitted() {
        let value = json!({"currentHeadline": "", "about": "I build data pipelines."});
        assert!(spec().validate_input(&value).is_ok());
        let prompt = spec().render(&value).user;
        assert!(!prompt.contains("Current Headline"));
        assert!(!prompt.contains("Listed Skills"));
    }
}
