//! 内置能力目录
//!
//! 每个子模块给出一个或多个能力：输入/输出 Shape、显式的模板函数，
//! 以及带类型的调用入口。

pub mod cover_letter;
pub mod dream_career;
pub mod interview;
pub mod jobs;
pub mod linkedin;
pub mod resume;
pub mod roadmap;
pub mod website;

use super::FlowSpec;

/// 全部内置能力
pub fn builtin_flows() -> Vec<FlowSpec> {
    vec![
        cover_letter::spec(),
        dream_career::spec(),
        resume::spec(),
        roadmap::spec(),
        jobs::job_match_spec(),
        jobs::hr_contact_spec(),
        jobs::salary_spec(),
        website::spec(),
        interview::questions_spec(),
        interview::feedback_spec(),
        interview::chat_spec(),
        linkedin::spec(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_names_are_unique() {
        let flows = builtin_flows();
        let names: HashSet<_> = flows.iter().map(FlowSpec::name).collect();
        assert_eq!(names.len(), flows.len());
        assert_eq!(flows.len(), 12);
    }

    #[test]
    fn every_flow_has_a_json_system_prompt() {
        for flow in builtin_flows() {
            let system = flow.system().unwrap_or_default();
            assert!(system.contains("single JSON object"), "{}", flow.name());
        }
    }
}
