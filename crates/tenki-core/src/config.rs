use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use tenki_weather::{City, ForecastWindow, HistoryWindow};

/// Open-Meteo accepts at most 92 hours of history.
const MAX_PAST_HOURS: u32 = 92;
/// And at most 16 days ahead.
const MAX_FORECAST_HOURS: u32 = 384;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding config.toml, the preference database and logs
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Forecast endpoint
    pub api_url: String,

    /// IANA timezone the API reports local times in
    pub timezone: String,

    /// Hours of history requested; the "now" sample sits at this index
    pub past_hours: u32,

    /// Hours of forecast requested
    pub forecast_hours: u32,

    /// Refresh interval in minutes (0 disables periodic refresh)
    pub refresh_minutes: u32,

    pub request_timeout_secs: u64,

    /// City shown when nothing has been saved yet
    pub default_city: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_url: tenki_weather::provider::OPEN_METEO_URL.to_string(),
            timezone: tenki_weather::provider::DEFAULT_TIMEZONE.to_string(),
            past_hours: 24,
            forecast_hours: 48,
            refresh_minutes: 5,
            request_timeout_secs: 10,
            default_city: tenki_weather::DEFAULT_CITY_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Chart window on startup
    pub default_window: ForecastWindow,

    /// Redraw/poll period for terminal input, in milliseconds
    pub tick_rate_ms: u64,

    /// Accept mouse clicks as activation
    pub mouse: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_window: ForecastWindow::Hours24,
            tick_rate_ms: 250,
            mouse: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file name, relative to the config directory
    pub database_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_file: "tenki.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is unset
    pub level: String,

    /// Log directory; defaults to `<config_dir>/logs`
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tenki")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            weather: WeatherConfig::default(),
            ui: UiConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the user config directory, creating a default
    /// file if it doesn't exist
    ///
    /// # Errors
    /// The config directory is unknown, or the file cannot be read, parsed or
    /// written.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    ///
    /// # Errors
    /// The file cannot be read, parsed or (when missing) written.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let mut config = Self::default();
            if let Some(parent) = path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; errors fail the load.
    ///
    /// # Errors
    /// Loading fails, or validation reports at least one error.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(crate::ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_url(&self.weather.api_url, "weather.api_url", &mut result);

        if self.weather.timezone.trim().is_empty() {
            result.add_error("weather.timezone", "Timezone must not be empty");
        }

        if self.weather.past_hours > MAX_PAST_HOURS {
            result.add_error(
                "weather.past_hours",
                format!("At most {} hours of history can be requested", MAX_PAST_HOURS),
            );
        }

        if self.weather.forecast_hours == 0 {
            result.add_error("weather.forecast_hours", "Forecast hours must be greater than 0");
        } else if self.weather.forecast_hours > MAX_FORECAST_HOURS {
            result.add_error(
                "weather.forecast_hours",
                format!("At most {} forecast hours can be requested", MAX_FORECAST_HOURS),
            );
        } else if (self.weather.forecast_hours as usize) < ForecastWindow::Hours48.hours() {
            result.add_warning(
                "weather.forecast_hours",
                "Less than 48 forecast hours; the 48h view will be cut short",
            );
        }

        if self.weather.refresh_minutes == 0 {
            result.add_warning(
                "weather.refresh_minutes",
                "Weather refresh disabled (0 minutes)",
            );
        } else if self.weather.refresh_minutes > 1440 {
            result.add_warning(
                "weather.refresh_minutes",
                "Weather refresh interval is more than 24 hours",
            );
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        }

        if City::find(&self.weather.default_city).is_none() {
            result.add_warning(
                "weather.default_city",
                format!(
                    "Unknown city '{}', falling back to {}",
                    self.weather.default_city,
                    City::default_city().name
                ),
            );
        }

        if self.ui.tick_rate_ms == 0 {
            result.add_error("ui.tick_rate_ms", "Tick rate must be greater than 0");
        }

        if self.storage.database_file.trim().is_empty() {
            result.add_error("storage.database_file", "Database file name must not be empty");
        }

        if tracing_subscriber::EnvFilter::try_new(&self.logging.level).is_err() {
            result.add_error(
                "logging.level",
                format!("Invalid log filter: {}", self.logging.level),
            );
        }

        result
    }

    fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }
                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// # Errors
    /// The directory cannot be created or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents).context("Failed to write config file")?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("tenki");

        Ok(config_dir.join("config.toml"))
    }

    pub fn history_window(&self) -> HistoryWindow {
        HistoryWindow {
            past_hours: self.weather.past_hours,
            forecast_hours: self.weather.forecast_hours,
        }
    }

    /// `None` when periodic refresh is disabled.
    pub fn refresh_interval(&self) -> Option<Duration> {
        match self.weather.refresh_minutes {
            0 => None,
            m => Some(Duration::from_secs(u64::from(m) * 60)),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.weather.request_timeout_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.ui.tick_rate_ms)
    }

    pub fn database_path(&self) -> PathBuf {
        self.config_dir.join(&self.storage.database_file)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.logging
            .directory
            .clone()
            .unwrap_or_else(|| self.config_dir.join("logs"))
    }
}
