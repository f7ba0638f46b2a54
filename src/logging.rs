use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming the log file.
pub const LOG_ENV: &str = "COUNTRY_EXPLORER_LOG";

/// Initialize tracing.
///
/// The TUI owns the terminal, so logs only go to the file named by
/// `COUNTRY_EXPLORER_LOG`; without it nothing is recorded. The level comes
/// from `RUST_LOG` and defaults to `info`.
pub fn init() {
    let Some(log_path) = std::env::var_os(LOG_ENV) else {
        return;
    };

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: failed to open log file {}: {}", log_path.to_string_lossy(), e);
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}
