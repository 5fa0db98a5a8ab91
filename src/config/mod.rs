// 配置：服务商连接参数与环境变量

pub mod env;
pub mod provider;

pub use env::EnvConfig;
pub use provider::ProviderConfig;
