//! Shared logging utilities for consistent tracing across the harness crates

use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the tracing subscriber at the default `info` level.
pub fn init_tracing() {
    init_tracing_with_level(None);
}

/// Initialize the tracing subscriber, scoping the filter to the harness
/// crates so caller-side noise stays out of test output.
pub fn init_tracing_with_level(log_level: Option<&str>) {
    let base_level = log_level.unwrap_or("info");
    let env_filter = format!("frames={base_level},harness={base_level}");

    fmt()
        .with_env_filter(EnvFilter::new(&env_filter))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
