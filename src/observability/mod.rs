//! Structured logging setup.
//!
//! The core only emits `tracing` events; installing a subscriber is the
//! embedding application's (or the CLI's) job.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "pivotgraph=info";

/// Initialize structured logging with `RUST_LOG` environment variable support.
///
/// Defaults to `pivotgraph=info`. Logs go to stderr so JSON written to stdout
/// by the CLI stays parseable. Subsequent calls are silently ignored.
pub fn init_logging() {
    init_logging_with(None);
}

/// Like [`init_logging`], with an explicit filter taking precedence over
/// `RUST_LOG` (the CLI's `--verbose` flag).
pub fn init_logging_with(directive: Option<&str>) {
    let filter = match directive {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    // try_init so double-init in tests doesn't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_does_not_panic() {
        init_logging();
        // Second call should also not panic (try_init ignores re-init).
        init_logging();
        init_logging_with(Some("pivotgraph=debug"));
    }
}
