use tracing::debug;

use crate::error::Result;
use crate::flow::catalog::interview::{self, ChatInput, ChatOutput, Turn};
use crate::flow::FlowEngine;

/// 模拟面试会话
///
/// flow 本身无状态；会话在客户端累积对话记录，
/// 每轮把完整记录随输入重新发送。
/// 调用失败时记录保持不变，可以直接重发同一条消息。
#[derive(Clone, Debug)]
pub struct InterviewSession {
    job_role: String,
    transcript: Vec<Turn>,
    complete: bool,
    feedback: Option<String>,
}

impl InterviewSession {
    pub fn new(job_role: impl Into<String>) -> Self {
        Self {
            job_role: job_role.into(),
            transcript: Vec::new(),
            complete: false,
            feedback: None,
        }
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    pub async fn send(
        &mut self,
        engine: &FlowEngine,
        message: impl Into<String>,
    ) -> Result<ChatOutput> {
        let message = message.into();
        let input = ChatInput {
            job_role: self.job_role.clone(),
            transcript: self.transcript.clone(),
            candidate_message: message.clone(),
        };

        let output = interview::interview_turn(engine, &input).await?;

        self.transcript.push(Turn::candidate(message));
        self.transcript.push(Turn::interviewer(output.reply.clone()));
        self.complete = output.is_complete;
        if output.feedback.is_some() {
            self.feedback = output.feedback.clone();
        }
        debug!(turns = self.transcript.len(), complete = self.complete, "interview turn recorded");
        Ok(output)
    }

    /// 重新开始一场面试
    pub fn restart(&mut self) {
        self.transcript.clear();
        self.complete = false;
        self.feedback = None;
    }
}
