use tracing_subscriber::EnvFilter;

use stakepick_config::{LogFormat, LogLevel};

/// Install the global tracing subscriber.
///
/// `RUST_LOG`, when set, takes precedence over the configured level. Logs go
/// to stderr so that the console report on stdout stays clean.
pub fn init(log_level: LogLevel, log_format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // Ignore the error if a subscriber is already installed
    let _ = match log_format {
        LogFormat::Plain => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
