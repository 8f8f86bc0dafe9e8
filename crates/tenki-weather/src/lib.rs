//! Weather data for Tenki
//!
//! Hourly forecasts from the Open-Meteo API for a fixed catalogue of Japanese
//! cities, plus the chart model the front-end draws from them.

pub mod chart;
pub mod cities;
pub mod provider;
pub mod retry;
pub mod types;

pub use chart::{AxisRange, ChartAxis, ChartKind, ChartSeries, ChartSpec, Readout};
pub use cities::{City, CITIES, DEFAULT_CITY_ID};
pub use provider::{HistoryWindow, WeatherProvider};
pub use retry::RetryConfig;
pub use types::*;
