//! 求职相关能力：岗位匹配、HR 联系人查找与薪资参考

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::flow::constants::{llm, prompt, system_prompt, values};
use crate::flow::{FlowEngine, FlowSpec};
use crate::llm::ModelConfig;
use crate::prompt::{FlowInput, PromptWriter};
use crate::schema::Schema;

pub const JOB_MATCH: &str = "job-match";
pub const HR_CONTACT_FINDER: &str = "hr-contact-finder";
pub const SALARY_INSIGHTS: &str = "salary-insights";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchInput {
    pub resume_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_preferences: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_only: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatch {
    pub job_title: String,
    pub match_score: i64,
    pub reasons: Vec<String>,
    pub missing_skills: Vec<String>,
}

/// `matches` 可以为空，此时 `advice` 说明原因
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchOutput {
    pub matches: Vec<JobMatch>,
    pub advice: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HrContactInput {
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HrContact {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub linkedin_search_url: Option<String>,
    #[serde(default)]
    pub email_pattern: Option<String>,
    pub confidence: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HrContactOutput {
    pub found: bool,
    pub message: String,
    pub contacts: Vec<HrContact>,
    pub outreach_tips: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryInput {
    pub job_title: String,
    pub location: String,
    pub years_of_experience: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryOutput {
    pub currency: String,
    pub low: f64,
    pub median: f64,
    pub high: f64,
    pub factors: Vec<String>,
    pub negotiation_tips: Vec<String>,
}

fn job_match_template(input: &FlowInput<'_>) -> String {
    let mut w = PromptWriter::new();
    w.line("Suggest up to five job titles this candidate is a strong match for.")
        .blank()
        .block("Resume", input.text("resumeText"))
        .optional_field("Preferences", input.optional_text("jobPreferences"))
        .optional_field("Location", input.optional_text("location"))
        .section_if(input.flag("remoteOnly"), |w| {
            w.line("Only consider roles that can be done fully remotely.");
        })
        .blank()
        .line("Score each match from 0 to 100 and explain the reasons and any missing skills.")
        .line("If the resume text is too thin to judge, return an empty `matches` list")
        .line("and say why in `advice`.");
    w.finish()
}

fn hr_contact_template(input: &FlowInput<'_>) -> String {
    let mut w = PromptWriter::new();
    w.line("Identify the people a job seeker should contact about openings at this company.")
        .blank()
        .field("Company", input.text("companyName"))
        .optional_field("Role of Interest", input.optional_text("role"))
        .optional_field("Department", input.optional_text("department"))
        .optional_field("Location", input.optional_text("location"))
        .blank()
        .line("Only list publicly known recruiting or HR roles.")
        .line("Never invent personal email addresses.")
        .line("Give a LinkedIn people-search URL and the company's likely email pattern")
        .line("where possible, and rate your confidence in each contact.")
        .line("If you cannot identify anyone, set `found` to false, explain in `message`")
        .line("and return no contacts.");
    w.finish()
}

fn salary_template(input: &FlowInput<'_>) -> String {
    let mut w = PromptWriter::new();
    w.line("Estimate the annual base salary range for this position.")
        .blank()
        .field("Job Title", input.text("jobTitle"))
        .field("Location", input.text("location"))
        .optional_number("Years of Experience", input.number("yearsOfExperience"))
        .optional_field("Industry", input.optional_text("industry"))
        .blank()
        .line("Use the local currency code and give low, median and high figures.")
        .line("List the factors that move the number and offer practical negotiation tips.");
    w.finish()
}

pub fn job_match_spec() -> FlowSpec {
    let input = Schema::object()
        .field("resumeText", Schema::string().min_length(20))
        .field("jobPreferences", Schema::string().optional())
        .field("location", Schema::string().optional())
        .field("remoteOnly", Schema::boolean().optional());
    let matched = Schema::object()
        .field("jobTitle", Schema::string().non_empty())
        .field("matchScore", Schema::integer().range(0, 100))
        .field("reasons", Schema::array(Schema::string()))
        .field("missingSkills", Schema::array(Schema::string()));
    let output = Schema::object()
        .field("matches", Schema::array(matched))
        .field("advice", Schema::string());

    FlowSpec::new(JOB_MATCH, "Job Matcher", input, output, job_match_template)
        .with_description("Matches a resume against suitable job titles.")
        .with_system(system_prompt(prompt::CAREER_COACH))
        .with_model(ModelConfig::default().with_temperature(llm::ANALYTICAL_TEMPERATURE))
}

pub fn hr_contact_spec() -> FlowSpec {
    let input = Schema::object()
        .field("companyName", Schema::string().non_empty())
        .field("role", Schema::string().optional())
        .field("department", Schema::string().optional())
        .field("location", Schema::string().optional());
    let contact = Schema::object()
        .field("name", Schema::string().non_empty())
        .field("title", Schema::string())
        .field("linkedinSearchUrl", Schema::string().optional())
        .field("emailPattern", Schema::string().optional())
        .field("confidence", Schema::enumeration(values::CONFIDENCE_LEVELS.iter().copied()));
    let output = Schema::object()
        .field("found", Schema::boolean())
        .field("message", Schema::string())
        .field("contacts", Schema::array(contact))
        .field("outreachTips", Schema::array(Schema::string()));

    FlowSpec::new(HR_CONTACT_FINDER, "HR Contact Finder", input, output, hr_contact_template)
        .with_description("Suggests recruiters and HR contacts to reach out to at a company.")
        .with_system(system_prompt(prompt::CAREER_COACH))
        .with_model(ModelConfig::default().with_temperature(llm::ANALYTICAL_TEMPERATURE))
}

pub fn salary_spec() -> FlowSpec {
    let input = Schema::object()
        .field("jobTitle", Schema::string().non_empty())
        .field("location", Schema::string().non_empty())
        .field("yearsOfExperience", Schema::number().minimum(0))
        .field("industry", Schema::string().optional());
    let output = Schema::object()
        .field("currency", Schema::string().min_length(3).max_length(3))
        .field("low", Schema::number())
        .field("median", Schema::number())
        .field("high", Schema::number())
        .field("factors", Schema::array(Schema::string()))
        .field("negotiationTips", Schema::array(Schema::string()));

    FlowSpec::new(SALARY_INSIGHTS, "Salary Insights", input, output, salary_template)
        .with_description("Estimates a salary range and negotiation levers for a role.")
        .with_system(system_prompt(prompt::CAREER_COACH))
        .with_model(ModelConfig::default().with_temperature(llm::ANALYTICAL_TEMPERATURE))
}

pub async fn match_jobs(engine: &FlowEngine, input: &JobMatchInput) -> Result<JobMatchOutput> {
    engine.execute_typed(JOB_MATCH, input).await
}

pub async fn find_hr_contacts(
    engine: &FlowEngine,
    input: &HrContactInput,
) -> Result<HrContactOutput> {
    engine.execute_typed(HR_CONTACT_FINDER, input).await
}

pub async fn estimate_salary(engine: &FlowEngine, input: &SalaryInput) -> Result<SalaryOutput> {
    engine.execute_typed(SALARY_INSIGHTS, input).await
}
