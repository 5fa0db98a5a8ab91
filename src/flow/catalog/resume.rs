use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::flow::constants::{llm, prompt, system_prompt};
use crate::flow::{FlowEngine, FlowSpec};
use crate::llm::ModelConfig;
use crate::prompt::{FlowInput, PromptWriter};
use crate::schema::Schema;

pub const NAME: &str = "resume-analysis";

/// 页面层允许上传的简历格式
pub const ACCEPTED_RESUME_TYPES: &[&str] = &[
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
    "image/*",
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysisInput {
    /// `data:<mimetype>;base64,<payload>`
    pub resume_data_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionFeedback {
    pub section: String,
    pub feedback: String,
}

/// `success` 为 false 时表示文档无法识别为简历，此时 `message` 给出原因
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysisOutput {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub overall_score: i64,
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub ats_keywords: Vec<String>,
    pub section_feedback: Vec<SectionFeedback>,
}

pub fn input_schema() -> Schema {
    Schema::object()
        .field(
            "resumeDataUri",
            Schema::string()
                .non_empty()
                .with_description("Resume file as a data URI: data:<mimetype>;base64,<payload>."),
        )
        .field("targetRole", Schema::string().optional())
        .field("jobDescription", Schema::string().optional())
}

pub fn output_schema() -> Schema {
    Schema::object()
        .field("success", Schema::boolean())
        .field("message", Schema::string().optional())
        .field(
            "overallScore",
            Schema::integer()
                .range(0, 100)
                .with_description("Score from 0 to 100."),
        )
        .field("summary", Schema::string())
        .field("strengths", Schema::array(Schema::string()))
        .field("improvements", Schema::array(Schema::string()))
        .field("atsKeywords", Schema::array(Schema::string()))
        .field(
            "sectionFeedback",
            Schema::array(
                Schema::object()
                    .field("section", Schema::string().non_empty())
                    .field("feedback", Schema::string().non_empty()),
            ),
        )
}

fn template(input: &FlowInput<'_>) -> String {
    let target_role = input.optional_text("targetRole");
    let job_description = input.optional_text("jobDescription");

    let mut w = PromptWriter::new();
    w.line("Analyze the attached resume document.")
        .optional_field("Target Role", target_role)
        .section_if(job_description.is_some(), |w| {
            w.blank();
            w.block("Compare it against this job description", job_description.unwrap_or_default());
        })
        .blank()
        .line("Score the resume from 0 to 100, summarise it, and list concrete strengths")
        .line("and improvements.")
        .line("Give feedback per section and the ATS keywords the resume should contain")
        .line(if job_description.is_some() {
            "based on the job description."
        } else {
            "for the target role or, if none is given, for the role the resume is aimed at."
        })
        .line("If the document is not a resume, set `success` to false, explain why in `message`,")
        .line("use 0 for `overallScore` and leave every list empty.");
    w.finish()
}

pub fn spec() -> FlowSpec {
    FlowSpec::new(NAME, "Resume Analyzer", input_schema(), output_schema(), template)
        .with_description("Scores an uploaded resume and suggests improvements.")
        .with_system(system_prompt(prompt::CAREER_COACH))
        .with_attachment_field("resumeDataUri")
        .with_model(ModelConfig::default().with_temperature(llm::ANALYTICAL_TEMPERATURE))
}

pub async fn analyze_resume(
    engine: &FlowEngine,
    input: &ResumeAnalysisInput,
) -> Result<ResumeAnalysisOutput> {
    engine.execute_typed(NAME, input).await
}
