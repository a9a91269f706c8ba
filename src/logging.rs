use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::EnvFilter;

/// 日志过滤环境变量，例如 `INFRA_ARCHITECT_LOG=infra_architect=debug`
pub const LOG_ENV: &str = "INFRA_ARCHITECT_LOG";

const DEFAULT_FILTER: &str = "warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// 初始化 tracing，输出到 stderr，避免与 REPL 输出混在一起
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_timer(ChronoUtc::new("%Y-%m-%dT%H:%M:%S%.3fZ".to_string()))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
