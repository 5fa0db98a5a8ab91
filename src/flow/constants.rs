/// 流程相关的常量定义
///
/// 统一管理各个 flow 共用的提示词片段与取值集合

/// Prompt 片段常量
pub mod prompt {
    /// 所有 flow 共用的输出约束
    pub const JSON_ONLY: &str =
        "Respond with a single JSON object that matches the requested output schema. \
        Do not wrap it in Markdown code fences and do not add any text outside the JSON object.";

    pub const CAREER_COACH: &str =
        "You are an experienced career coach and recruiter who gives specific, \
        honest and encouraging guidance.";

    pub const INTERVIEWER: &str =
        "You are a seasoned hiring manager conducting realistic job interviews.";

    pub const WEB_DESIGNER: &str =
        "You are a senior web designer who writes clean, accessible, responsive HTML and CSS.";
}

/// 模型参数常量
pub mod llm {
    /// 事实性分析使用的温度
    pub const ANALYTICAL_TEMPERATURE: f32 = 0.2;
    /// 写作类任务使用的温度
    pub const CREATIVE_TEMPERATURE: f32 = 0.7;
}

/// 多个 flow 共用的取值集合
pub mod values {
    pub const EXPERIENCE_LEVELS: &[&str] = &["Entry", "Mid", "Senior", "Lead"];
    pub const CONFIDENCE_LEVELS: &[&str] = &["High", "Medium", "Low"];
    pub const DIFFICULTY_LEVELS: &[&str] = &["Easy", "Medium", "Hard"];
}

/// 拼接系统提示：角色描述加统一的 JSON 输出约束
pub fn system_prompt(role: &str) -> String {
    format!("{role}\n\n{}", prompt::JSON_ONLY)
}
