//! Open-Meteo hourly forecast client.
//!
//! One request per load: the configured number of past hours plus the
//! configured number of forecast hours, as parallel arrays keyed by field.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::cities::City;
use crate::retry::{send_with_backoff, RetryConfig};
use crate::types::{Forecast, HourlySample, WeatherCondition, WeatherError};

pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_TIMEZONE: &str = "Asia/Tokyo";
const USER_AGENT: &str = concat!("tenki/", env!("CARGO_PKG_VERSION"));
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub const HOURLY_FIELDS: [&str; 5] = [
    "temperature_2m",
    "precipitation",
    "relative_humidity_2m",
    "wind_speed_10m",
    "weather_code",
];

/// How many hours of history and forecast to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    pub past_hours: u32,
    pub forecast_hours: u32,
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self {
            past_hours: 24,
            forecast_hours: 48,
        }
    }
}

impl HistoryWindow {
    /// Index of the "now" sample in a series of `len` samples.
    ///
    /// The series starts `past_hours` before the current hour, so the current
    /// hour sits at `past_hours`. Short series clamp to their last sample.
    pub fn now_index(&self, len: usize) -> usize {
        (self.past_hours as usize).min(len.saturating_sub(1))
    }
}

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    hourly: Option<HourlyBlock>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HourlyBlock {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    precipitation: Vec<Option<f64>>,
    relative_humidity_2m: Vec<Option<f64>>,
    wind_speed_10m: Vec<Option<f64>>,
    weather_code: Vec<Option<i32>>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoError {
    reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    timezone: String,
    window: HistoryWindow,
    retry: RetryConfig,
}

impl WeatherProvider {
    /// # Errors
    /// Fails when the HTTP client cannot be built (TLS backend unavailable).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.into(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            window: HistoryWindow::default(),
            retry: RetryConfig::default(),
        })
    }

    pub fn with_history(mut self, window: HistoryWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn history(&self) -> HistoryWindow {
        self.window
    }

    fn query(&self, city: &City) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", city.latitude.to_string()),
            ("longitude", city.longitude.to_string()),
            ("hourly", HOURLY_FIELDS.join(",")),
            ("past_hours", self.window.past_hours.to_string()),
            ("forecast_hours", self.window.forecast_hours.to_string()),
            ("timezone", self.timezone.clone()),
        ]
    }

    /// Fetch past and upcoming hourly data for `city`.
    ///
    /// # Errors
    /// Network failures (after retries), non-success HTTP statuses, and
    /// responses whose arrays are empty, misaligned or carry bad timestamps.
    #[instrument(skip(self, city), fields(city = city.id), level = "info")]
    pub async fn fetch(&self, city: &City) -> Result<Forecast, WeatherError> {
        let query = self.query(city);
        let response = send_with_backoff(&self.retry, || {
            self.client.get(&self.base_url).query(&query).send()
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenMeteoError>(&body)
                .ok()
                .and_then(|e| e.reason)
                .unwrap_or(body);
            tracing::warn!(%status, "Forecast request failed: {}", message);
            return Err(WeatherError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: OpenMeteoResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        let forecast = parse_forecast(city.id, &self.timezone, body, self.window)?;
        tracing::info!(
            samples = forecast.samples.len(),
            now_index = forecast.now_index,
            "Forecast fetched"
        );
        Ok(forecast)
    }
}

fn parse_forecast(
    city_id: &str,
    timezone: &str,
    body: OpenMeteoResponse,
    window: HistoryWindow,
) -> Result<Forecast, WeatherError> {
    let hourly = body
        .hourly
        .ok_or_else(|| WeatherError::Parse("response has no hourly block".into()))?;

    let len = hourly.time.len();
    if len == 0 {
        return Err(WeatherError::Parse("hourly series is empty".into()));
    }

    check_len("temperature_2m", hourly.temperature_2m.len(), len)?;
    check_len("precipitation", hourly.precipitation.len(), len)?;
    check_len("relative_humidity_2m", hourly.relative_humidity_2m.len(), len)?;
    check_len("wind_speed_10m", hourly.wind_speed_10m.len(), len)?;
    check_len("weather_code", hourly.weather_code.len(), len)?;

    let mut samples = Vec::with_capacity(len);
    for (i, raw_time) in hourly.time.iter().enumerate() {
        let time = NaiveDateTime::parse_from_str(raw_time, TIME_FORMAT)
            .map_err(|e| WeatherError::Parse(format!("bad timestamp {:?}: {}", raw_time, e)))?;

        samples.push(HourlySample {
            time,
            temperature: value_at(&hourly.temperature_2m, i),
            precipitation: value_at(&hourly.precipitation, i),
            humidity: value_at(&hourly.relative_humidity_2m, i)
                .map(|h| h.round().clamp(0.0, 100.0) as u8),
            wind_speed: value_at(&hourly.wind_speed_10m, i),
            condition: value_at(&hourly.weather_code, i)
                .map(WeatherCondition::from_wmo_code)
                .unwrap_or(WeatherCondition::Unknown),
        });
    }

    Ok(Forecast {
        city_id: city_id.to_string(),
        timezone: timezone.to_string(),
        now_index: window.now_index(samples.len()),
        samples,
        fetched_at: Utc::now(),
    })
}

/// An omitted field comes back as an empty array; anything else must line up
/// with `time`.
fn check_len(field: &str, actual: usize, expected: usize) -> Result<(), WeatherError> {
    if actual == 0 || actual == expected {
        Ok(())
    } else {
        Err(WeatherError::Parse(format!(
            "{} has {} values, expected {}",
            field, actual, expected
        )))
    }
}

fn value_at<T: Copy>(values: &[Option<T>], index: usize) -> Option<T> {
    values.get(index).copied().flatten()
}
