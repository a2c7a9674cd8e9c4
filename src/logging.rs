//! Logging setup.

use anyhow::Result;
use std::fmt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

/// Timestamp layout used on every log line, e.g. `2024-05-01 14:03:22,117`.
pub const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Local wall-clock timer for log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTimestamp;

impl FormatTime for LocalTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format(LOG_TIME_FORMAT))
    }
}

/// Initialize logging to stderr.
///
/// Every line carries a local timestamp, the level and the message. The level
/// filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_logging() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(LocalTimestamp)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(())
}
