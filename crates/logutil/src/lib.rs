//! Utilities for logging.

use std::io;

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    HumanReadable,
    Compact,
    Json,
}

impl LogFormat {
    pub fn from_str_opt(s: &str) -> Option<Self> {
        Some(match s {
            "human" | "human_readable" => LogFormat::HumanReadable,
            "compact" => LogFormat::Compact,
            "json" => LogFormat::Json,
            _ => return None,
        })
    }
}

/// Build the env filter, using `default_level` unless overridden by
/// `RUST_LOG`.
fn env_filter(default_level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
}

/// Configure the global logger.
///
/// Only the first call installs a subscriber. Later calls are ignored so that
/// tests and binaries can both call this without coordinating.
pub fn configure_global_logger<W>(default_level: Level, format: LogFormat, writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = env_filter(default_level);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_file(true)
        .with_line_number(true);

    let result = match format {
        LogFormat::HumanReadable => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    // Already initialized.
    let _ = result;
}

/// Configure a logger suitable for tests, writing through the test harness.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(Level::DEBUG))
        .with_test_writer()
        .try_init();
}

/// Configure the global logger writing to stderr.
pub fn configure_stderr_logger(default_level: Level, format: LogFormat) {
    configure_global_logger(default_level, format, io::stderr);
}
