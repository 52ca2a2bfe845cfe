use tracing_subscriber::{fmt, EnvFilter};

pub fn init_tracing() {
    let default = if db_debug_enabled() {
        "info,sqlx=debug"
    } else {
        "info,sqlx=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt().with_env_filter(env_filter).with_target(false).init();
}

/// DB_DEBUG echoes every SQL statement, as in development setups.
fn db_debug_enabled() -> bool {
    std::env::var("DB_DEBUG")
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "t"))
        .unwrap_or(false)
}
