use tracing_subscriber::{fmt, EnvFilter};

/// ログ初期化（RUST_LOG があれば優先）
pub fn init(verbose: bool) {
    let default_level = if verbose {
        "sprinkler_report=debug,sprinkler_report_common=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 二重初期化は無視
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
