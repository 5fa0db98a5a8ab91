use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::flow::constants::{prompt, system_prompt};
use crate::flow::{FlowEngine, FlowSpec};
use crate::prompt::{FlowInput, PromptWriter};
use crate::schema::Schema;

pub const NAME: &str = "career-roadmap";

pub const TIMEFRAMES: [&str; 4] = ["3 months", "6 months", "1 year", "2 years"];
pub const LEARNING_STYLES: [&str; 4] = ["Video", "Reading", "Hands-on", "Mixed"];
pub const RESOURCE_KINDS: [&str; 6] = [
    "Course",
    "Book",
    "Project",
    "Certification",
    "Community",
    "Article",
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapInput {
    pub career_goal: String,
    pub current_skills: String,
    pub timeframe: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_per_week: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_style: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningResource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub phase: String,
    pub duration: String,
    pub goals: Vec<String>,
    pub resources: Vec<LearningResource>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapOutput {
    pub title: String,
    pub overview: String,
    pub milestones: Vec<Milestone>,
}

pub fn input_schema() -> Schema {
    Schema::object()
        .field("careerGoal", Schema::string().non_empty().max_length(300))
        .field("currentSkills", Schema::string().non_empty())
        .field("timeframe", Schema::enumeration(TIMEFRAMES))
        .field("hoursPerWeek", Schema::number().range(0, 168).optional())
        .field("learningStyle", Schema::enumeration(LEARNING_STYLES).optional())
}

pub fn output_schema() -> Schema {
    let resource = Schema::object()
        .field("name", Schema::string().non_empty())
        .field("type", Schema::enumeration(RESOURCE_KINDS))
        .field("url", Schema::string().optional());
    let milestone = Schema::object()
        .field("phase", Schema::string().non_empty())
        .field("duration", Schema::string().non_empty())
        .field("goals", Schema::array(Schema::string()))
        .field("resources", Schema::array(resource));
    Schema::object()
        .field("title", Schema::string().non_empty())
        .field("overview", Schema::string())
        .field("milestones", Schema::array(milestone))
}

fn template(input: &FlowInput<'_>) -> String {
    let mut w = PromptWriter::new();
    w.line("Create a step-by-step learning roadmap.")
        .blank()
        .field("Career Goal", input.text("careerGoal"))
        .field("Current Skills", input.text("currentSkills"))
        .field("Timeframe", input.text("timeframe"))
        .optional_number("Hours Available per Week", input.number("hoursPerWeek"))
        .optional_field("Preferred Learning Style", input.optional_text("learningStyle"))
        .blank()
        .line("Split the timeframe into sequential milestones. Each milestone needs a phase name,")
        .line("a duration, concrete goals and a few well-known resources.")
        .line("Only include URLs you are sure of.");
    w.finish()
}

pub fn spec() -> FlowSpec {
    FlowSpec::new(NAME, "Roadmap Generator", input_schema(), output_schema(), template)
        .with_description("Builds a milestone-based learning plan towards a career goal.")
        .with_system(system_prompt(prompt::CAREER_COACH))
}

pub async fn generate_roadmap(engine: &FlowEngine, input: &RoadmapInput) -> Result<RoadmapOutput> {
    engine.execute_typed(NAME, input).await
}
