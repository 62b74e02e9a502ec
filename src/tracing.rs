//! Logging for the hilite binary
//!
//! Two sinks: stderr, filtered by `RUST_LOG` (default `warn`), and a daily
//! rolling file under the config dir that always records `debug`.
//! Useful targets:
//! - `hilite::scheduler` - debounce and render pass timing
//! - `hilite::controller` - profile loads, saves and skipped entries
//! - `hilite::renderer=trace` - every style bind

use std::path::PathBuf;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "hilite.log";

/// Install the global subscriber; call once at startup
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries match output, so logs stay on stderr
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(dir) => Some(file_layer(dir)),
        Err(e) => {
            eprintln!("hilite: file logging disabled: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

fn file_layer<S>(dir: PathBuf) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_filter(EnvFilter::new("debug"))
}
