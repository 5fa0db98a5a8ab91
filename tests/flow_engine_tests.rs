use std::sync::Arc;

use anyhow::Result;
use careerflow::flow::catalog::cover_letter::{self, CoverLetterInput};
use careerflow::flow::catalog::dream_career;
use careerflow::flow::catalog::jobs;
use careerflow::flow::catalog::resume;
use careerflow::ViolationKind;
use careerflow::prompt::ensure_no_placeholders;
use careerflow::{
    default_registry, CareerFlowError, FlowEngine, ScriptedClient, GENERIC_FAILURE_MESSAGE,
};
use serde_json::{json, Value};

fn engine_with(client: &Arc<ScriptedClient>) -> FlowEngine {
    FlowEngine::with_client(client.clone())
}

fn cover_letter_input() -> Value {
    json!({
        "jobTitle": "Software Engineer",
        "companyName": "Acme",
        "jobDescription": "Build things",
        "skills": "Go, SQL",
        "experience": "3 years backend"
    })
}

#[tokio::test]
async fn cover_letter_returns_single_non_empty_field() -> Result<()> {
    let client = Arc::new(ScriptedClient::new().with_json(json!({
        "coverLetter": "Dear Hiring Manager, I would love to build things at Acme."
    })));
    let engine = engine_with(&client);

    let output = engine.execute(cover_letter::NAME, cover_letter_input()).await?;
    let object = output.as_object().expect("object output");
    assert_eq!(object.len(), 1);
    assert!(!object["coverLetter"].as_str().unwrap_or_default().is_empty());

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].user.contains("Job Title: Software Engineer"));
    assert!(requests[0].response_schema.is_some());
    Ok(())
}

#[tokio::test]
async fn typed_cover_letter_round_trips_through_serde() -> Result<()> {
    let client = Arc::new(ScriptedClient::new().with_json(json!({"coverLetter": "Hello Acme"})));
    let engine = engine_with(&client);
    let input: CoverLetterInput = serde_json::from_value(cover_letter_input())?;

    let output = cover_letter::generate_cover_letter(&engine, &input).await?;
    assert_eq!(output.cover_letter, "Hello Acme");
    Ok(())
}

#[tokio::test]
async fn empty_job_title_is_rejected_before_any_call() {
    let client = Arc::new(ScriptedClient::new().with_json(json!({"coverLetter": "unused"})));
    let engine = engine_with(&client);

    let mut input = cover_letter_input();
    input["jobTitle"] = json!("");
    let err = engine.execute(cover_letter::NAME, input).await.unwrap_err();

    match err {
        CareerFlowError::InputValidation(errors) => {
            assert_eq!(errors.for_path("jobTitle").len(), 1)
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn enum_violation_is_rejected_before_any_call() {
    let client = Arc::new(ScriptedClient::new());
    let engine = engine_with(&client);

    let mut input = cover_letter_input();
    input["tone"] = json!("Sarcastic");
    assert!(engine.execute(cover_letter::NAME, input).await.is_err());
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn nonconforming_output_is_never_returned() {
    let client = Arc::new(
        ScriptedClient::new()
            .with_json(json!({"letter": "wrong field"}))
            .with_json(json!({"coverLetter": ""})),
    );
    let engine = engine_with(&client);

    let first = engine.execute(cover_letter::NAME, cover_letter_input()).await.unwrap_err();
    assert!(matches!(first, CareerFlowError::OutputValidation(_)));
    assert_eq!(first.kind(), "provider.output_invalid");
    assert!(!first.is_retryable());

    let second = engine.execute(cover_letter::NAME, cover_letter_input()).await.unwrap_err();
    assert!(matches!(second, CareerFlowError::OutputValidation(_)));
    assert_eq!(second.user_message(), GENERIC_FAILURE_MESSAGE);
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn fenced_json_is_accepted_and_prose_is_not() {
    let client = Arc::new(
        ScriptedClient::new()
            .with_content("```json\n{\"coverLetter\": \"Fenced\"}\n```")
            .with_content("Sure! Here is your letter."),
    );
    let engine = engine_with(&client);

    let output = engine.execute(cover_letter::NAME, cover_letter_input()).await.unwrap();
    assert_eq!(output["coverLetter"], "Fenced");

    let err = engine.execute(cover_letter::NAME, cover_letter_input()).await.unwrap_err();
    assert!(matches!(err, CareerFlowError::OutputParse(_)));
    assert_eq!(err.kind(), "provider.output_unparseable");
    assert!(!err.is_retryable());
    assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
}

#[tokio::test]
async fn transport_failure_is_surfaced_once_without_retry() {
    let client = Arc::new(
        ScriptedClient::new()
            .with_failure("503 service unavailable", true)
            .with_json(json!({"coverLetter": "would only appear on retry"})),
    );
    let engine = engine_with(&client);

    let err = engine.execute(cover_letter::NAME, cover_letter_input()).await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(err.kind(), "provider.transport");
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn unknown_flow_is_reported() {
    let engine = engine_with(&Arc::new(ScriptedClient::new()));
    let err = engine.execute("sticky-notes", json!({})).await.unwrap_err();
    assert!(matches!(err, CareerFlowError::FlowNotRegistered(name) if name == "sticky-notes"));
}

#[test]
fn student_dream_career_prompt_omits_professional_lines() {
    let engine = FlowEngine::with_client(Arc::new(ScriptedClient::new()));
    let input = json!({
        "userCategory": "Student",
        "interests": "biology, drawing",
        "skills": "research, illustration"
    });

    let prompt = engine.render(dream_career::NAME, &input).unwrap();
    assert!(!prompt.user.contains("Current/Previous Role"));
    assert!(!prompt.user.contains("Years of Experience"));
    assert!(prompt.user.contains("Category: Student"));
}

#[test]
fn rendering_is_deterministic() {
    let engine = FlowEngine::with_client(Arc::new(ScriptedClient::new()));
    let first = engine.render(cover_letter::NAME, &cover_letter_input()).unwrap();
    let second = engine.render(cover_letter::NAME, &cover_letter_input()).unwrap();
    assert_eq!(first, second);
}

/// 每个内置 flow 在只给必填字段时都不应留下占位符
#[test]
fn minimal_inputs_render_without_placeholders() {
    let minimal: Vec<(&str, Value)> = vec![
        ("cover-letter", cover_letter_input()),
        (
            "dream-career",
            json!({"userCategory": "Professional", "interests": "x", "skills": "y"}),
        ),
        (
            "resume-analysis",
            json!({"resumeDataUri": "data:application/pdf;base64,JVBERg=="}),
        ),
        (
            "career-roadmap",
            json!({"careerGoal": "Data engineer", "currentSkills": "SQL", "timeframe": "1 year"}),
        ),
        (
            "job-match",
            json!({"resumeText": "Five years of frontend work with React and CSS."}),
        ),
        ("hr-contact-finder", json!({"companyName": "Acme"})),
        (
            "salary-insights",
            json!({"jobTitle": "Nurse", "location": "Leeds", "yearsOfExperience": 3}),
        ),
        (
            "portfolio-website",
            json!({
                "fullName": "A",
                "headline": "B",
                "about": "C",
                "skills": [],
                "theme": "Modern"
            }),
        ),
        (
            "interview-questions",
            json!({"jobRole": "QA", "experienceLevel": "Entry", "interviewType": "Mixed"}),
        ),
        (
            "interview-feedback",
            json!({"jobRole": "QA", "question": "Why QA?", "answer": "I like breaking things."}),
        ),
        (
            "interview-chat",
            json!({"jobRole": "QA", "transcript": [], "candidateMessage": "Hello"}),
        ),
        (
            "linkedin-optimizer",
            json!({"currentHeadline": "", "about": "Tester"}),
        ),
    ];

    let engine = FlowEngine::with_client(Arc::new(ScriptedClient::new()));
    assert_eq!(minimal.len(), default_registry().len());
    for (name, input) in minimal {
        let prompt = engine
            .render(name, &input)
            .unwrap_or_else(|err| panic!("{name}: {err}"));
        assert_eq!(ensure_no_placeholders(&prompt.user), Ok(()), "{name}");
    }
}

#[tokio::test]
async fn empty_match_list_is_a_successful_result() -> Result<()> {
    let client = Arc::new(ScriptedClient::new().with_json(json!({
        "matches": [],
        "advice": "Add more detail about your projects."
    })));
    let engine = engine_with(&client);
    let input = jobs::JobMatchInput {
        resume_text: "Some short text about my work history.".into(),
        job_preferences: None,
        location: None,
        remote_only: None,
    };

    let output = jobs::match_jobs(&engine, &input).await?;
    assert!(output.matches.is_empty());
    assert!(!output.advice.is_empty());
    Ok(())
}

#[tokio::test]
async fn interview_session_resends_the_growing_transcript() -> Result<()> {
    use careerflow::InterviewSession;

    let client = Arc::new(
        ScriptedClient::new()
            .with_json(json!({"reply": "Tell me about a recent project.", "isComplete": false}))
            .with_json(json!({
                "reply": "Thanks, that's all.",
                "isComplete": true,
                "feedback": "Clear answers."
            })),
    );
    let engine = engine_with(&client);
    let mut session = InterviewSession::new("Data Analyst");

    session.send(&engine, "Hi, I'm ready.").await?;
    assert_eq!(session.transcript().len(), 2);
    assert!(!session.is_complete());

    session.send(&engine, "I built a churn dashboard.").await?;
    assert!(session.is_complete());
    assert_eq!(session.feedback(), Some("Clear answers."));

    let requests = client.requests();
    assert!(!requests[0].user.contains("Conversation so far"));
    assert!(requests[1].user.contains("Interviewer: Tell me about a recent project."));
    assert!(requests[1].user.contains("Candidate: I built a churn dashboard."));
    Ok(())
}

#[tokio::test]
async fn failed_turn_leaves_transcript_untouched() {
    use careerflow::InterviewSession;

    let client = Arc::new(ScriptedClient::new().with_failure("timeout", true));
    let engine = engine_with(&client);
    let mut session = InterviewSession::new("Data Analyst");

    assert!(session.send(&engine, "Hello").await.is_err());
    assert!(session.transcript().is_empty());
}

#[tokio::test]
async fn malformed_resume_data_uri_is_rejected_before_any_call() {
    let client = Arc::new(ScriptedClient::new().with_json(json!({"success": true})));
    let engine = engine_with(&client);

    let malformed = [
        "not a data uri",
        "data:application/pdf,JVBERg==",
        "data:application/pdf;base64,***",
        "   ",
    ];
    for bad in malformed {
        let err = engine
            .execute(resume::NAME, json!({"resumeDataUri": bad}))
            .await
            .unwrap_err();
        let CareerFlowError::InputValidation(errors) = err else {
            panic!("{bad}: expected input validation error, got {err:?}");
        };
        let violations = errors.for_path("resumeDataUri");
        assert!(
            matches!(violations[..], [ViolationKind::MalformedDataUri { .. }]),
            "{bad}: {errors}"
        );
    }
    assert_eq!(client.call_count(), 0);
}
