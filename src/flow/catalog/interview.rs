//! 面试练习：题目生成、回答点评与多轮模拟面试
//!
//! 模拟面试本身无状态，每一轮都把完整对话记录放进输入。

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::flow::constants::{llm, prompt, system_prompt, values};
use crate::flow::{FlowEngine, FlowSpec};
use crate::llm::ModelConfig;
use crate::prompt::{FlowInput, PromptWriter};
use crate::schema::Schema;

pub const QUESTIONS: &str = "interview-questions";
pub const FEEDBACK: &str = "interview-feedback";
pub const CHAT: &str = "interview-chat";

pub const INTERVIEW_TYPES: [&str; 4] = ["Behavioral", "Technical", "Situational", "Mixed"];
pub const SPEAKERS: [&str; 2] = ["interviewer", "candidate"];

/// 未指定题目数量时的默认值
pub const DEFAULT_QUESTION_COUNT: u32 = 5;
pub const MAX_QUESTION_COUNT: u32 = 20;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsInput {
    pub job_role: String,
    pub experience_level: String,
    pub interview_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_questions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewQuestion {
    pub question: String,
    pub category: String,
    pub difficulty: String,
    pub what_they_look_for: String,
    pub sample_answer_outline: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsOutput {
    pub questions: Vec<InterviewQuestion>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackInput {
    pub job_role: String,
    pub question: String,
    pub answer: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackOutput {
    pub score: i64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improved_answer: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Interviewer,
    Candidate,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Speaker,
    pub content: String,
}

impl Turn {
    pub fn interviewer(content: impl Into<String>) -> Self {
        Self {
            role: Speaker::Interviewer,
            content: content.into(),
        }
    }

    pub fn candidate(content: impl Into<String>) -> Self {
        Self {
            role: Speaker::Candidate,
            content: content.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatInput {
    pub job_role: String,
    #[serde(default)]
    pub transcript: Vec<Turn>,
    pub candidate_message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatOutput {
    pub reply: String,
    pub is_complete: bool,
    #[serde(default)]
    pub feedback: Option<String>,
}

fn questions_template(input: &FlowInput<'_>) -> String {
    let count = input
        .number("numberOfQuestions")
        .map(|n| n as u32)
        .unwrap_or(DEFAULT_QUESTION_COUNT);

    let mut w = PromptWriter::new();
    w.line(format!("Generate {count} interview questions for this candidate."))
        .blank()
        .field("Role", input.text("jobRole"))
        .field("Experience Level", input.text("experienceLevel"))
        .field("Interview Type", input.text("interviewType"))
        .section_if(input.optional_text("jobDescription").is_some(), |w| {
            w.block("Job Description", input.text("jobDescription"));
        })
        .blank()
        .line("Match the difficulty to the experience level. For each question state what the")
        .line("interviewer is looking for and give a short outline of a strong answer.");
    w.finish()
}

fn feedback_template(input: &FlowInput<'_>) -> String {
    let mut w = PromptWriter::new();
    w.line("Evaluate the candidate's answer to an interview question.")
        .blank()
        .field("Role", input.text("jobRole"))
        .field("Question", input.text("question"))
        .block("Answer", input.text("answer"))
        .blank()
        .line("Score the answer from 0 to 10, list its strengths and weaknesses,")
        .line("and rewrite it as an improved answer in the candidate's own voice.");
    w.finish()
}

fn chat_template(input: &FlowInput<'_>) -> String {
    let transcript = input.items("transcript");

    let mut w = PromptWriter::new();
    w.line(format!("You are interviewing a candidate for the role of {}.", input.text("jobRole")))
        .line("Ask one question at a time and react briefly to the previous answer.")
        .blank();

    if transcript.is_empty() {
        w.line("This is the start of the interview.");
    } else {
        w.line("Conversation so far:");
        for turn in transcript {
            let turn = FlowInput::new(turn);
            let speaker = match turn.text("role") {
                "interviewer" => "Interviewer",
                _ => "Candidate",
            };
            w.field(speaker, turn.text("content"));
        }
    }

    w.field("Candidate", input.text("candidateMessage"))
        .blank()
        .line("Reply as the interviewer. After about six questions, close the interview,")
        .line("set `isComplete` to true and give overall feedback in `feedback`.")
        .line("Until then leave `feedback` out.");
    w.finish()
}

pub fn questions_spec() -> FlowSpec {
    let input = Schema::object()
        .field("jobRole", Schema::string().non_empty().max_length(200))
        .field("experienceLevel", Schema::enumeration(values::EXPERIENCE_LEVELS.iter().copied()))
        .field("interviewType", Schema::enumeration(INTERVIEW_TYPES))
        .field(
            "numberOfQuestions",
            Schema::integer().range(1, MAX_QUESTION_COUNT).optional(),
        )
        .field("jobDescription", Schema::string().optional());
    let question = Schema::object()
        .field("question", Schema::string().non_empty())
        .field("category", Schema::string())
        .field("difficulty", Schema::enumeration(values::DIFFICULTY_LEVELS.iter().copied()))
        .field("whatTheyLookFor", Schema::string())
        .field("sampleAnswerOutline", Schema::array(Schema::string()));
    let output = Schema::object().field("questions", Schema::array(question));

    FlowSpec::new(QUESTIONS, "Interview Questions", input, output, questions_template)
        .with_description("Generates practice questions for an upcoming interview.")
        .with_system(system_prompt(prompt::INTERVIEWER))
}

pub fn feedback_spec() -> FlowSpec {
    let input = Schema::object()
        .field("jobRole", Schema::string().non_empty())
        .field("question", Schema::string().non_empty())
        .field("answer", Schema::string().non_empty());
    let output = Schema::object()
        .field("score", Schema::integer().range(0, 10))
        .field("strengths", Schema::array(Schema::string()))
        .field("weaknesses", Schema::array(Schema::string()))
        .field("improvedAnswer", Schema::string().non_empty());

    FlowSpec::new(FEEDBACK, "Interview Feedback", input, output, feedback_template)
        .with_description("Scores a practice answer and suggests a stronger version.")
        .with_system(system_prompt(prompt::INTERVIEWER))
        .with_model(ModelConfig::default().with_temperature(llm::ANALYTICAL_TEMPERATURE))
}

pub fn chat_spec() -> FlowSpec {
    let turn = Schema::object()
        .field("role", Schema::enumeration(SPEAKERS))
        .field("content", Schema::string());
    let input = Schema::object()
        .field("jobRole", Schema::string().non_empty())
        .field("transcript", Schema::array(turn))
        .field("candidateMessage", Schema::string().non_empty());
    let output = Schema::object()
        .field("reply", Schema::string().non_empty())
        .field("isComplete", Schema::boolean())
        .field("feedback", Schema::string().optional());

    FlowSpec::new(CHAT, "Mock Interview", input, output, chat_template)
        .with_description("Plays the interviewer in a turn-by-turn mock interview.")
        .with_system(system_prompt(prompt::INTERVIEWER))
}

pub async fn generate_questions(
    engine: &FlowEngine,
    input: &QuestionsInput,
) -> Result<QuestionsOutput> {
    engine.execute_typed(QUESTIONS, input).await
}

pub async fn review_answer(engine: &FlowEngine, input: &FeedbackInput) -> Result<FeedbackOutput> {
    engine.execute_typed(FEEDBACK, input).await
}

pub async fn interview_turn(engine: &FlowEngine, input: &ChatInput) -> Result<ChatOutput> {
    engine.execute_typed(CHAT, input).await
}
