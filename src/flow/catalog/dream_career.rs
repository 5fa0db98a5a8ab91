use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::flow::constants::{prompt, system_prompt};
use crate::flow::{FlowEngine, FlowSpec};
use crate::prompt::{FlowInput, PromptWriter};
use crate::schema::Schema;

pub const NAME: &str = "dream-career";

pub const USER_CATEGORIES: [&str; 3] = ["Student", "Professional", "Career Changer"];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreamCareerInput {
    /// `Student`、`Professional` 或 `Career Changer`
    pub user_category: String,
    pub interests: String,
    pub skills: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_preferences: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerSuggestion {
    pub title: String,
    pub description: String,
    pub why_it_fits: String,
    pub required_skills: Vec<String>,
    pub growth_outlook: String,
    #[serde(default)]
    pub salary_range: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreamCareerOutput {
    pub careers: Vec<CareerSuggestion>,
    pub summary: String,
}

pub fn input_schema() -> Schema {
    Schema::object()
        .field("userCategory", Schema::enumeration(USER_CATEGORIES))
        .field("interests", Schema::string().non_empty())
        .field("skills", Schema::string().non_empty())
        .field("education", Schema::string().optional())
        .field("currentRole", Schema::string().optional())
        .field("yearsOfExperience", Schema::number().minimum(0).optional())
        .field("workPreferences", Schema::string().optional())
}

pub fn output_schema() -> Schema {
    let suggestion = Schema::object()
        .field("title", Schema::string().non_empty())
        .field("description", Schema::string().non_empty())
        .field("whyItFits", Schema::string().non_empty())
        .field("requiredSkills", Schema::array(Schema::string()))
        .field("growthOutlook", Schema::string())
        .field("salaryRange", Schema::string().optional());
    Schema::object()
        .field("careers", Schema::array(suggestion))
        .field("summary", Schema::string())
}

fn template(input: &FlowInput<'_>) -> String {
    let mut w = PromptWriter::new();
    w.line("Suggest three to five careers that would suit this person, ranked by fit.")
        .blank()
        .field("Category", input.text("userCategory"))
        .field("Interests", input.text("interests"))
        .field("Skills", input.text("skills"))
        .optional_field("Education", input.optional_text("education"))
        .optional_field("Current/Previous Role", input.optional_text("currentRole"))
        .optional_number("Years of Experience", input.number("yearsOfExperience"))
        .optional_field("Work Preferences", input.optional_text("workPreferences"))
        .blank();

    let guidance = match input.text("userCategory") {
        "Student" => "Favour entry paths such as internships, graduate programmes and degrees.",
        "Career Changer" => "Highlight transferable skills and realistic bridge roles.",
        _ => "Build on the person's existing seniority and suggest lateral or step-up moves.",
    };

    w.line(guidance)
        .line("For each career explain why it fits, list the key skills required")
        .line("and describe the growth outlook.");
    w.finish()
}

pub fn spec() -> FlowSpec {
    FlowSpec::new(NAME, "Dream Career Finder", input_schema(), output_schema(), template)
        .with_description("Suggests careers matching a person's interests, skills and situation.")
        .with_system(system_prompt(prompt::CAREER_COACH))
}

pub async fn find_dream_career(
    engine: &FlowEngine,
    input: &DreamCareerInput,
) -> Result<DreamCareerOutput> {
    engine.execute_typed(NAME, input).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn professional_details_render_when_present() {
        let value = json!({
            "userCategory": "Professional",
            "interests": "data",
            "skills": "SQL",
            "currentRole": "Analyst",
            "yearsOfExperience": 4
        });
        let prompt = spec().render(&value).user;
        assert!(prompt.contains("Current/Previous Role: Analyst"));
        assert!(prompt.contains("Years of Experience: 4"));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let value = json!({"userCategory": "Retiree", "interests": "x", "skills": "y"});
        assert!(spec().validate_input(&value).is_err());
    }
}
