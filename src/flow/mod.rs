// Flow 模块 - 能力定义、注册与执行

pub mod catalog;
pub mod constants;
pub mod engine;
pub mod registry;
pub mod spec;

// 重新导出核心类型
pub use engine::FlowEngine;
pub use registry::{default_registry, FlowRegistry};
pub use spec::FlowSpec;
