//! Draws a [`ChartSpec`] with ratatui's `Chart` widget.
//!
//! ratatui has a single y axis, so precipitation bars are projected onto the
//! temperature scale and the precipitation range goes in the title.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use chrono::NaiveDateTime;
use tenki_weather::{ChartAxis, ChartSpec, Readout};

const TEMPERATURE_COLOR: Color = Color::LightRed;
const PRECIPITATION_COLOR: Color = Color::LightBlue;
const NOW_COLOR: Color = Color::DarkGray;
const CURSOR_COLOR: Color = Color::Yellow;

/// Draw the chart with the cursor `cursor` hours away from now.
pub fn render_chart(frame: &mut Frame, area: Rect, spec: &ChartSpec, cursor: i64) {
    let [plot_area, readout_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

    let temperature = temperature_points(spec);
    let precipitation = precipitation_points(spec);
    let now_line = vertical_at(spec, spec.now);
    let cursor_time = spec.cursor_time(cursor);
    let cursor_line = vertical_at(spec, cursor_time);

    let mut datasets = vec![
        Dataset::default()
            .name("precip")
            .marker(Marker::HalfBlock)
            .graph_type(GraphType::Bar)
            .style(Style::default().fg(PRECIPITATION_COLOR))
            .data(&precipitation),
        Dataset::default()
            .name("temp")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(TEMPERATURE_COLOR))
            .data(&temperature),
        Dataset::default()
            .name("now")
            .marker(Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(NOW_COLOR))
            .data(&now_line),
    ];
    if cursor_time != spec.now {
        datasets.push(
            Dataset::default()
                .name("cursor")
                .marker(Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(CURSOR_COLOR))
                .data(&cursor_line),
        );
    }

    let title = Line::from(vec![
        Span::styled(" °C ", Style::default().fg(TEMPERATURE_COLOR)),
        Span::styled(
            format!("precip 0-{:.1} mm ", spec.precipitation_range.max),
            Style::default().fg(PRECIPITATION_COLOR),
        ),
    ]);

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, spec.x_span().max(1.0)])
                .labels(x_labels(spec)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([spec.temperature_range.min, spec.temperature_range.max])
                .labels(y_labels(spec)),
        )
        .hidden_legend_constraints((Constraint::Ratio(1, 4), Constraint::Ratio(1, 4)));
    frame.render_widget(chart, plot_area);

    frame.render_widget(
        Paragraph::new(readout_line(spec.cursor_readout(cursor), spec.now)),
        readout_area,
    );
}

fn vertical_at(spec: &ChartSpec, time: NaiveDateTime) -> [(f64, f64); 2] {
    let x = spec.x_of(time);
    [
        (x, spec.temperature_range.min),
        (x, spec.temperature_range.max),
    ]
}

/// Bars for wet hours only. A dry hour would still plot a dot on the
/// bottom row, since 0 mm lands on the temperature minimum.
fn precipitation_points(spec: &ChartSpec) -> Vec<(f64, f64)> {
    spec.series_for(ChartAxis::Precipitation)
        .map(|series| {
            series
                .points
                .iter()
                .filter(|(_, mm)| *mm > 0.0)
                .map(|(time, mm)| (spec.x_of(*time), spec.precipitation_on_temperature_axis(*mm)))
                .collect()
        })
        .unwrap_or_default()
}

fn temperature_points(spec: &ChartSpec) -> Vec<(f64, f64)> {
    spec.series_for(ChartAxis::Temperature)
        .map(|series| {
            series
                .points
                .iter()
                .map(|(time, t)| (spec.x_of(*time), *t))
                .collect()
        })
        .unwrap_or_default()
}

fn x_labels(spec: &ChartSpec) -> Vec<Span<'static>> {
    // Labels are spread evenly, so the middle one is the midpoint time.
    let mid = spec.start + (spec.end - spec.start) / 2;
    [spec.start, mid, spec.end]
        .into_iter()
        .map(|t| Span::raw(t.format("%a %H:%M").to_string()))
        .collect()
}

fn y_labels(spec: &ChartSpec) -> Vec<Span<'static>> {
    let range = spec.temperature_range;
    let mid = range.min + range.span() / 2.0;
    [range.min, mid, range.max]
        .into_iter()
        .map(|t| Span::raw(format!("{:.0}°", t)))
        .collect()
}

/// "Now 14:00  21.3°C  0.5 mm  62%", or the weekday in place of "Now" when
/// the readout is for another hour.
pub fn readout_line(readout: Option<Readout>, now: NaiveDateTime) -> Line<'static> {
    let Some(r) = readout else {
        return Line::default();
    };
    let dash = || "--".to_string();
    let when = if r.time == now {
        r.time.format("Now %H:%M").to_string()
    } else {
        r.time.format("%a %H:%M").to_string()
    };
    Line::from(vec![
        Span::styled(
            format!("{} ", when),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                " {} ",
                r.temperature
                    .map(|t| format!("{:.1}°C", t))
                    .unwrap_or_else(dash)
            ),
            Style::default().fg(TEMPERATURE_COLOR),
        ),
        Span::styled(
            format!(
                " {} ",
                r.precipitation
                    .map(|p| format!("{:.1} mm", p))
                    .unwrap_or_else(dash)
            ),
            Style::default().fg(PRECIPITATION_COLOR),
        ),
        Span::raw(format!(
            " {}",
            r.humidity.map(|h| format!("{}%", h)).unwrap_or_else(dash)
        )),
    ])
}
