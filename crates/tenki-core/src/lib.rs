pub mod config;
pub mod error;
pub mod scheduler;

pub use config::{Config, LoggingConfig, StorageConfig, UiConfig, ValidationResult, WeatherConfig};
pub use error::{AppError, ConfigError};
pub use scheduler::RefreshScheduler;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;

/// Keeps the background log writer alive; logs stop flushing once dropped.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: std::path::PathBuf,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &std::path::Path {
        &self.log_dir
    }
}

/// Initialize tracing/logging
///
/// The terminal UI owns stdout, so logs go to a daily-rolling file under the
/// configured log directory. `RUST_LOG` overrides the configured level.
///
/// # Errors
/// The log directory cannot be created or a global subscriber is already set.
pub fn init_logging(config: &Config) -> Result<LoggingGuard> {
    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let appender = tracing_appender::rolling::daily(&log_dir, "tenki.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.logging.level))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))?;

    tracing::info!("Tenki core initialized, logging to {}", log_dir.display());
    Ok(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}
