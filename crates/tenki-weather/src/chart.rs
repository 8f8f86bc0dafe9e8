//! Renderer-independent description of the temperature/precipitation chart.
//!
//! A [`ChartSpec`] is rebuilt from scratch for every redraw. The front-end
//! owns layout and styling; this module owns which samples are shown, how
//! they are split into series, and the axis bounds.

use chrono::NaiveDateTime;

use crate::types::{Forecast, ForecastWindow, HourlySample};

/// Minimum top of the precipitation axis, in mm.
const MIN_PRECIPITATION_AXIS: f64 = 1.0;
/// Degrees of headroom above and below the temperature series.
const TEMPERATURE_PADDING: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartAxis {
    /// Left axis, °C
    Temperature,
    /// Right axis, mm
    Precipitation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: &'static str,
    pub unit: &'static str,
    pub axis: ChartAxis,
    pub kind: ChartKind,
    pub points: Vec<(NaiveDateTime, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Values under the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Readout {
    pub time: NaiveDateTime,
    pub temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub humidity: Option<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub series: Vec<ChartSeries>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub now: NaiveDateTime,
    pub temperature_range: AxisRange,
    pub precipitation_range: AxisRange,
    samples: Vec<HourlySample>,
}

impl ChartSpec {
    /// Lay out the full history plus `window` hours past "now".
    ///
    /// Returns `None` when the forecast has no samples.
    pub fn build(forecast: &Forecast, window: ForecastWindow) -> Option<Self> {
        let now = forecast.current()?.time;
        let end_index = forecast
            .now_index
            .saturating_add(window.hours())
            .min(forecast.samples.len());
        let samples: Vec<HourlySample> = forecast.samples[..end_index].to_vec();

        let start = samples.first()?.time;
        let end = samples.last()?.time;

        let temperature: Vec<(NaiveDateTime, f64)> = samples
            .iter()
            .filter_map(|s| s.temperature.map(|t| (s.time, t)))
            .collect();
        let precipitation: Vec<(NaiveDateTime, f64)> = samples
            .iter()
            .filter_map(|s| s.precipitation.map(|p| (s.time, p)))
            .collect();

        let temperature_range = temperature_bounds(&temperature);
        let precipitation_range = AxisRange {
            min: 0.0,
            max: precipitation
                .iter()
                .map(|(_, p)| *p)
                .fold(MIN_PRECIPITATION_AXIS, f64::max),
        };

        Some(Self {
            series: vec![
                ChartSeries {
                    name: "Temperature",
                    unit: "°C",
                    axis: ChartAxis::Temperature,
                    kind: ChartKind::Line,
                    points: temperature,
                },
                ChartSeries {
                    name: "Precipitation",
                    unit: "mm",
                    axis: ChartAxis::Precipitation,
                    kind: ChartKind::Bar,
                    points: precipitation,
                },
            ],
            start,
            end,
            now,
            temperature_range,
            precipitation_range,
            samples,
        })
    }

    pub fn series_for(&self, axis: ChartAxis) -> Option<&ChartSeries> {
        self.series.iter().find(|s| s.axis == axis)
    }

    /// Hours between the chart start and `time`.
    pub fn x_of(&self, time: NaiveDateTime) -> f64 {
        (time - self.start).num_minutes() as f64 / 60.0
    }

    pub fn x_span(&self) -> f64 {
        self.x_of(self.end)
    }

    /// Map a precipitation value onto the temperature axis so both series can
    /// share one plotting area.
    pub fn precipitation_on_temperature_axis(&self, mm: f64) -> f64 {
        let share = (mm / self.precipitation_range.span()).clamp(0.0, 1.0);
        self.temperature_range.min + share * self.temperature_range.span()
    }

    /// Sample nearest to `time`.
    pub fn readout(&self, time: NaiveDateTime) -> Option<Readout> {
        self.samples
            .iter()
            .min_by_key(|s| (s.time - time).num_minutes().abs())
            .map(|s| Readout {
                time: s.time,
                temperature: s.temperature,
                precipitation: s.precipitation,
                humidity: s.humidity,
            })
    }

    /// Time `offset_hours` away from "now", kept inside the charted range.
    pub fn cursor_time(&self, offset_hours: i64) -> NaiveDateTime {
        (self.now + chrono::Duration::hours(offset_hours)).clamp(self.start, self.end)
    }

    pub fn cursor_readout(&self, offset_hours: i64) -> Option<Readout> {
        self.readout(self.cursor_time(offset_hours))
    }
}

fn temperature_bounds(points: &[(NaiveDateTime, f64)]) -> AxisRange {
    let (lo, hi) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, t)| {
        (lo.min(*t), hi.max(*t))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return AxisRange { min: 0.0, max: 1.0 };
    }
    AxisRange {
        min: (lo - TEMPERATURE_PADDING).floor(),
        max: (hi + TEMPERATURE_PADDING).ceil(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WeatherCondition;
    use chrono::{NaiveDate, Utc};

    fn forecast(len: usize, now_index: usize) -> Forecast {
        let base = NaiveDate::from_ymd_opt(2026, 10, 15)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let samples = (0..len)
            .map(|h| HourlySample {
                time: base + chrono::Duration::hours(h as i64),
                temperature: if h == 3 { None } else { Some(15.0 + (h % 5) as f64) },
                precipitation: Some(if h == 30 { 2.5 } else { 0.0 }),
                humidity: Some(55),
                wind_speed: Some(4.0),
                condition: WeatherCondition::Clear,
            })
            .collect();
        Forecast {
            city_id: "sendai".into(),
            timezone: "Asia/Tokyo".into(),
            samples,
            now_index,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_build_covers_history_and_window() {
        let f = forecast(72, 24);

        let day = ChartSpec::build(&f, ForecastWindow::Hours24).unwrap();
        assert_eq!(day.start, f.samples[0].time);
        assert_eq!(day.end, f.samples[47].time);
        assert_eq!(day.now, f.samples[24].time);
        assert!((day.x_span() - 47.0).abs() < 1e-9);

        let two_days = ChartSpec::build(&f, ForecastWindow::Hours48).unwrap();
        assert_eq!(two_days.end, f.samples[71].time);
    }

    #[test]
    fn test_series_split_by_axis() {
        let spec = ChartSpec::build(&forecast(72, 24), ForecastWindow::Hours24).unwrap();
        let temps = spec.series_for(ChartAxis::Temperature).unwrap();
        let rain = spec.series_for(ChartAxis::Precipitation).unwrap();

        assert_eq!(temps.kind, ChartKind::Line);
        assert_eq!(rain.kind, ChartKind::Bar);
        // Hour 3 has no temperature and is skipped rather than plotted as zero.
        assert_eq!(temps.points.len(), 47);
        assert_eq!(rain.points.len(), 48);
    }

    #[test]
    fn test_axis_bounds() {
        let spec = ChartSpec::build(&forecast(72, 24), ForecastWindow::Hours24).unwrap();
        assert_eq!(spec.temperature_range, AxisRange { min: 13.0, max: 21.0 });
        assert_eq!(spec.precipitation_range, AxisRange { min: 0.0, max: 2.5 });
    }

    #[test]
    fn test_dry_forecast_keeps_minimum_precipitation_axis() {
        let mut f = forecast(72, 24);
        for s in &mut f.samples {
            s.precipitation = Some(0.0);
        }
        let spec = ChartSpec::build(&f, ForecastWindow::Hours24).unwrap();
        assert_eq!(spec.precipitation_range.max, MIN_PRECIPITATION_AXIS);
    }

    #[test]
    fn test_precipitation_projection() {
        let spec = ChartSpec::build(&forecast(72, 24), ForecastWindow::Hours24).unwrap();
        assert_eq!(spec.precipitation_on_temperature_axis(0.0), 13.0);
        assert_eq!(spec.precipitation_on_temperature_axis(2.5), 21.0);
        assert_eq!(spec.precipitation_on_temperature_axis(10.0), 21.0);
    }

    #[test]
    fn test_cursor_readout_at_now() {
        let f = forecast(72, 24);
        let spec = ChartSpec::build(&f, ForecastWindow::Hours24).unwrap();
        let readout = spec.cursor_readout(0).unwrap();
        assert_eq!(readout.time, f.samples[24].time);
        assert_eq!(readout.temperature, Some(19.0));
    }

    #[test]
    fn test_cursor_moves_by_hours_and_stays_in_range() {
        let f = forecast(72, 24);
        let spec = ChartSpec::build(&f, ForecastWindow::Hours24).unwrap();

        let rain = spec.cursor_readout(6).unwrap();
        assert_eq!(rain.time, f.samples[30].time);
        assert_eq!(rain.precipitation, Some(2.5));

        assert_eq!(spec.cursor_readout(-3).unwrap().time, f.samples[21].time);
        // Hour 3 has no temperature; the readout reports it as missing.
        assert_eq!(spec.cursor_readout(-21).unwrap().temperature, None);

        assert_eq!(spec.cursor_time(-100), spec.start);
        assert_eq!(spec.cursor_time(100), spec.end);
    }

    #[test]
    fn test_empty_forecast_builds_nothing() {
        assert!(ChartSpec::build(&forecast(0, 0), ForecastWindow::Hours24).is_none());
    }
}
