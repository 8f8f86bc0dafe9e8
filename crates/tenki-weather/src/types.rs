use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weather condition categories mapped from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Sleet,
    Thunderstorm,
    Unknown,
}

impl WeatherCondition {
    /// Convert WMO weather code to WeatherCondition
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1..=2 => Self::PartlyCloudy,
            3 => Self::Cloudy,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            56 | 57 => Self::Sleet, // Freezing drizzle
            61 | 63 | 80 => Self::Rain,
            65 | 81 | 82 => Self::HeavyRain,
            66 | 67 => Self::Sleet, // Freezing rain
            71 | 73 | 75 | 77 | 85 | 86 => Self::Snow,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::Unknown,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Sleet => "Sleet",
            Self::Thunderstorm => "Thunderstorm",
            Self::Unknown => "Unknown",
        }
    }

    /// Japanese label shown next to the English one on the board.
    pub fn label_ja(&self) -> &'static str {
        match self {
            Self::Clear => "晴れ",
            Self::PartlyCloudy => "晴れ時々曇り",
            Self::Cloudy => "曇り",
            Self::Fog => "霧",
            Self::Drizzle => "霧雨",
            Self::Rain => "雨",
            Self::HeavyRain => "大雨",
            Self::Snow => "雪",
            Self::Sleet => "みぞれ",
            Self::Thunderstorm => "雷雨",
            Self::Unknown => "不明",
        }
    }

    /// Single-cell glyph for terminal display.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Clear => "☀",
            Self::PartlyCloudy => "⛅",
            Self::Cloudy => "☁",
            Self::Fog => "≡",
            Self::Drizzle | Self::Rain => "☂",
            Self::HeavyRain => "☔",
            Self::Snow => "❄",
            Self::Sleet => "✱",
            Self::Thunderstorm => "⚡",
            Self::Unknown => "?",
        }
    }
}

/// How far ahead the chart looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ForecastWindow {
    #[default]
    #[serde(rename = "24h")]
    Hours24,
    #[serde(rename = "48h")]
    Hours48,
}

impl ForecastWindow {
    pub fn hours(self) -> usize {
        match self {
            Self::Hours24 => 24,
            Self::Hours48 => 48,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Hours24 => "24h",
            Self::Hours48 => "48h",
        }
    }
}

/// One hour of data. Any field may be missing from the upstream response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    pub time: NaiveDateTime,
    pub temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub humidity: Option<u8>,
    pub wind_speed: Option<f64>,
    pub condition: WeatherCondition,
}

/// Past and future hourly samples for one city.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub city_id: String,
    pub timezone: String,
    pub samples: Vec<HourlySample>,
    /// Index of the first non-past sample; everything before it is history.
    pub now_index: usize,
    pub fetched_at: DateTime<Utc>,
}

impl Forecast {
    /// The sample treated as "now".
    pub fn current(&self) -> Option<&HourlySample> {
        self.samples.get(self.now_index)
    }

    pub fn history(&self) -> &[HourlySample] {
        &self.samples[..self.now_index.min(self.samples.len())]
    }

    /// Samples from now up to (not including) `window` hours ahead.
    pub fn upcoming(&self, window: ForecastWindow) -> &[HourlySample] {
        let start = self.now_index.min(self.samples.len());
        let end = start.saturating_add(window.hours()).min(self.samples.len());
        &self.samples[start..end]
    }

    /// Total precipitation expected over `window`, in mm.
    pub fn precipitation_total(&self, window: ForecastWindow) -> f64 {
        self.upcoming(window)
            .iter()
            .filter_map(|s| s.precipitation)
            .sum()
    }

    /// Highest and lowest temperatures over `window`.
    pub fn temperature_range(&self, window: ForecastWindow) -> Option<(f64, f64)> {
        self.upcoming(window)
            .iter()
            .filter_map(|s| s.temperature)
            .fold(None, |acc, t| match acc {
                None => Some((t, t)),
                Some((hi, lo)) => Some((hi.max(t), lo.min(t))),
            })
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Forecast API returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    /// Short text for the on-screen error panel.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(e) if e.is_timeout() => "The forecast service timed out.",
            Self::Network(_) => "Unable to reach the forecast service.",
            Self::Status { status, .. } if *status >= 500 => {
                "The forecast service is having trouble. Try again later."
            }
            Self::Status { .. } => "The forecast request was rejected.",
            Self::Parse(_) => "Received an unexpected forecast response.",
        }
    }
}
