use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::flow::constants::{llm, prompt, system_prompt};
use crate::flow::{FlowEngine, FlowSpec};
use crate::llm::ModelConfig;
use crate::prompt::{FlowInput, PromptWriter};
use crate::schema::Schema;

pub const NAME: &str = "cover-letter";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterTone {
    Professional,
    Enthusiastic,
    Conversational,
}

impl LetterTone {
    pub const ALL: [&'static str; 3] = ["Professional", "Enthusiastic", "Conversational"];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterInput {
    pub job_title: String,
    pub company_name: String,
    pub job_description: String,
    pub skills: String,
    pub experience: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<LetterTone>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterOutput {
    pub cover_letter: String,
}

pub fn input_schema() -> Schema {
    Schema::object()
        .field("jobTitle", Schema::string().non_empty().max_length(200))
        .field("companyName", Schema::string().non_empty().max_length(200))
        .field("jobDescription", Schema::string().non_empty())
        .field("skills", Schema::string().non_empty())
        .field("experience", Schema::string().non_empty())
        .field("tone", Schema::enumeration(LetterTone::ALL).optional())
}

pub fn output_schema() -> Schema {
    Schema::object().field(
        "coverLetter",
        Schema::string()
            .non_empty()
            .with_description("The complete cover letter, ready to send."),
    )
}

fn template(input: &FlowInput<'_>) -> String {
    let mut w = PromptWriter::new();
    w.line("Write a tailored cover letter for the following application.")
        .blank()
        .field("Job Title", input.text("jobTitle"))
        .field("Company", input.text("companyName"))
        .block("Job Description", input.text("jobDescription"))
        .field("Candidate Skills", input.text("skills"))
        .field("Candidate Experience", input.text("experience"))
        .optional_field("Preferred Tone", input.optional_text("tone"))
        .blank()
        .line("Keep it under 400 words and address the hiring manager generically.")
        .line("Connect the candidate's skills and experience directly to the responsibilities")
        .line("in the job description.")
        .line("Return the letter in the `coverLetter` field.");
    w.finish()
}

pub fn spec() -> FlowSpec {
    FlowSpec::new(NAME, "Cover Letter", input_schema(), output_schema(), template)
        .with_description("Drafts a cover letter tailored to a specific job posting.")
        .with_system(system_prompt(prompt::CAREER_COACH))
        .with_model(ModelConfig::default().with_temperature(llm::CREATIVE_TEMPERATURE))
}

pub async fn generate_cover_letter(
    engine: &FlowEngine,
    input: &CoverLetterInput,
) -> Result<CoverLetterOutput> {
    engine.execute_typed(NAME, input).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tone_line_only_appears_when_requested() {
        let spec = spec();
        let without = json!({
            "jobTitle": "Software Engineer",
            "companyName": "Acme",
            "jobDescription": "Build things",
            "skills": "Go, SQL",
            "experience": "3 years backend"
        });
        assert!(!spec.render(&without).user.contains("Preferred Tone"));

        let mut with = without.clone();
        with["tone"] = json!("Enthusiastic");
        assert!(spec.validate_input(&with).is_ok());
        assert!(spec.render(&with).user.contains("Preferred Tone: Enthusiastic"));
    }
}
