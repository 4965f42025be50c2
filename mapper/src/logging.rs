//! Logging setup
//!
//! The library only emits `tracing` events. Binaries and tests that want to
//! see them call [`init_logging`] (or [`init_test_logging`]) once.

use crate::config::MapperConfig;
use crate::constants::{APP_NAME_LOWER, ENV_LOG};

fn env_filter(debug: bool) -> String {
    let level = if debug { "debug" } else { "info" };
    let default_filter = format!("warn,{}={}", APP_NAME_LOWER, level);

    std::env::var(ENV_LOG)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or(default_filter)
}

/// Install a compact formatter filtered by `EXPRMAP_LOG` or `RUST_LOG`
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    install(false);
}

/// Like [`init_logging`], defaulting to debug output when `config.debug` is set
pub fn init_logging_for(config: &MapperConfig) {
    install(config.debug);
}

fn install(debug: bool) {
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .with_ansi(true)
        .compact()
        .with_env_filter(env_filter(debug))
        .try_init();
}

/// Same as [`init_logging`] but writes through the test harness capture
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_env_filter(env_filter(true))
        .with_test_writer()
        .try_init();
}
