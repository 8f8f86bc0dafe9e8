//! Centralized error types for Tenki.
//!
//! A failed forecast load reaches the board as an [`AppError`], and
//! `user_message()` gives the text for the on-screen error panel. Full
//! details go to the log.

use thiserror::Error;

use tenki_weather::WeatherError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    /// Work that never reported back (task panicked or was dropped).
    #[error("Background task failed: {0}")]
    Task(String),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Weather(e) => e.user_message(),
            AppError::Task(_) => "Loading was interrupted. Please try again.",
        }
    }

    /// Whether asking again could plausibly succeed. Rejected requests and
    /// malformed responses will fail the same way next time.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Weather(WeatherError::Status { status, .. }) => {
                *status >= 500 || *status == 408 || *status == 429
            }
            AppError::Weather(WeatherError::Parse(_)) => false,
            AppError::Weather(WeatherError::Network(_)) | AppError::Task(_) => true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
