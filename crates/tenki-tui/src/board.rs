//! Forecast state shown on the board.
//!
//! Loads are tagged with a generation number. Only the newest generation
//! may land; anything older finished too late and is dropped.

use chrono::{DateTime, Local};

use tenki_core::AppError;
use tenki_weather::{City, Forecast, ForecastWindow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Failed {
        message: &'static str,
        retryable: bool,
    },
}

#[derive(Debug)]
pub struct Board {
    city: &'static City,
    window: ForecastWindow,
    forecast: Option<Forecast>,
    state: LoadState,
    last_updated: Option<DateTime<Local>>,
    /// Chart cursor in hours from "now".
    cursor: i64,
    generation: u64,
}

impl Board {
    pub fn new(city: &'static City, window: ForecastWindow) -> Self {
        Self {
            city,
            window,
            forecast: None,
            state: LoadState::Idle,
            last_updated: None,
            cursor: 0,
            generation: 0,
        }
    }

    pub fn city(&self) -> &'static City {
        self.city
    }

    pub fn window(&self) -> ForecastWindow {
        self.window
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        self.forecast.as_ref()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Move the chart cursor by `hours`, stopping at the first and last
    /// charted sample. Returns whether it moved.
    pub fn move_cursor(&mut self, hours: i64) -> bool {
        let Some((first, last)) = self.cursor_bounds() else {
            return false;
        };
        let next = self.cursor.saturating_add(hours).clamp(first, last);
        if next == self.cursor {
            return false;
        }
        self.cursor = next;
        true
    }

    /// Cursor range for the current forecast and window, as hour offsets.
    fn cursor_bounds(&self) -> Option<(i64, i64)> {
        let forecast = self.forecast.as_ref()?;
        if forecast.samples.is_empty() {
            return None;
        }
        let now = forecast.now_index;
        let end = now
            .saturating_add(self.window.hours())
            .min(forecast.samples.len());
        let first = -(now as i64);
        let last = (end.saturating_sub(1) as i64 - now as i64).max(first);
        Some((first, last))
    }

    fn clamp_cursor(&mut self) {
        self.cursor = match self.cursor_bounds() {
            Some((first, last)) => self.cursor.clamp(first, last),
            None => 0,
        };
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// A forecast is on screen but the latest attempt to replace it failed.
    pub fn is_stale(&self) -> bool {
        self.forecast.is_some() && matches!(self.state, LoadState::Failed { .. })
    }

    /// Whether the retry control should be offered.
    pub fn shows_retry(&self) -> bool {
        matches!(self.state, LoadState::Failed { .. })
    }

    /// Switch the chart window. Data is already loaded for both windows.
    pub fn set_window(&mut self, window: ForecastWindow) -> bool {
        if self.window == window {
            return false;
        }
        self.window = window;
        self.clamp_cursor();
        true
    }

    /// Point the board at another city. The old city's forecast is dropped so
    /// it is never shown under the new name.
    pub fn set_city(&mut self, city: &'static City) {
        if self.city.id != city.id {
            self.forecast = None;
            self.last_updated = None;
            self.cursor = 0;
        }
        self.city = city;
    }

    /// Start a load and return its generation tag.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.state = LoadState::Loading;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Apply a finished load. Returns `false` if it was superseded.
    pub fn finish(&mut self, generation: u64, result: Result<Forecast, AppError>) -> bool {
        if !self.is_current(generation) {
            tracing::debug!(
                generation,
                newest = self.generation,
                "Dropping superseded forecast load"
            );
            return false;
        }

        match result {
            Ok(forecast) if forecast.city_id == self.city.id => {
                tracing::info!(
                    city = self.city.id,
                    samples = forecast.samples.len(),
                    "Forecast loaded"
                );
                self.forecast = Some(forecast);
                self.state = LoadState::Idle;
                self.last_updated = Some(Local::now());
                self.clamp_cursor();
            }
            Ok(forecast) => {
                tracing::warn!(
                    expected = self.city.id,
                    got = %forecast.city_id,
                    "Forecast for the wrong city ignored"
                );
                self.state = LoadState::Idle;
            }
            Err(e) => {
                tracing::error!(city = self.city.id, "Forecast load failed: {}", e);
                self.state = LoadState::Failed {
                    message: e.user_message(),
                    retryable: e.is_retryable(),
                };
            }
        }
        true
    }
}
