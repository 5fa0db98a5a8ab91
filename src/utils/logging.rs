use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::env::ENV_DEBUG;

const DEFAULT_FILTER: &str = "careerflow=info,warn";
const DEBUG_FILTER: &str = "careerflow=debug,info";

/// 日志配置
pub struct LoggingConfig;

impl LoggingConfig {
    /// 初始化日志系统
    ///
    /// - `RUST_LOG`: 覆盖默认过滤规则
    /// - `CAREERFLOW_DEBUG`: 输出文件、行号与线程信息
    ///
    /// 重复调用时保留第一次安装的 subscriber。
    ///
    /// ```no_run
    /// use careerflow::utils::LoggingConfig;
    ///
    /// LoggingConfig::init();
    /// tracing::info!("ready");
    /// ```
    pub fn init() {
        let is_debug = Self::is_debug();

        let default_filter = if is_debug { DEBUG_FILTER } else { DEFAULT_FILTER };
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(is_debug)
            .with_file(is_debug)
            .with_line_number(is_debug)
            .with_thread_ids(is_debug);

        let installed = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .is_ok();

        if installed && is_debug {
            tracing::debug!("调试模式已启用");
        }
    }

    /// 使用自定义过滤器初始化
    pub fn init_with_filter(filter: &str) {
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::new(filter))
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init();
    }

    pub fn is_debug() -> bool {
        std::env::var(ENV_DEBUG).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_does_not_panic() {
        LoggingConfig::init_with_filter("careerflow=trace");
        LoggingConfig::init_with_filter("careerflow=info");
        LoggingConfig::init();
    }
}
