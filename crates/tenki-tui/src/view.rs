//! Board layout.
//!
//! Rendering also feeds back into [`Screen`]: clickable areas and the
//! overlay height are only known once a frame has been laid out.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use tenki_nav::NavigationMode;
use tenki_weather::{ChartSpec, ForecastWindow, CITIES};

use crate::board::{Board, LoadState};
use crate::chart_view::render_chart;
use crate::surface::{Element, Screen};

const NOW_PANEL_WIDTH: u16 = 30;
const OVERLAY_WIDTH: u16 = 34;
const KEY_HINTS: &str = "←↑↓→ move · Enter select · Esc back · [ ] scrub · r refresh · q quit";

fn focused_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn render(frame: &mut Frame, screen: &mut Screen, board: &Board, mode: NavigationMode) {
    screen.clear_hit_areas();

    let [header, body, controls, status] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(6),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header, board);

    let [now_panel, chart_panel] = Layout::horizontal([
        Constraint::Length(NOW_PANEL_WIDTH),
        Constraint::Min(10),
    ])
    .areas(body);
    render_now_panel(frame, now_panel, board);
    render_chart_panel(frame, chart_panel, board);

    render_controls(frame, controls, screen, board);
    render_status(frame, status, screen, board);

    if mode.is_overlay() {
        render_city_overlay(frame, body, screen, board);
    }
}

fn render_header(frame: &mut Frame, area: Rect, board: &Board) {
    let mut spans = vec![Span::styled(
        board.city().display_name(),
        Style::default().add_modifier(Modifier::BOLD),
    )];

    if board.is_loading() {
        spans.push(Span::styled("  Loading…", Style::default().fg(Color::Yellow)));
    } else if let Some(updated) = board.last_updated() {
        spans.push(Span::styled(
            format!("  Updated {}", updated.format("%H:%M")),
            Style::default().fg(Color::Gray),
        ));
    }
    if board.is_stale() {
        spans.push(Span::styled("  [stale]", Style::default().fg(Color::Red)));
    }

    let block = Block::default().borders(Borders::ALL).title(" Tenki 天気 ");
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_now_panel(frame: &mut Frame, area: Rect, board: &Board) {
    let block = Block::default().borders(Borders::ALL).title(" Now ");
    let dash = || "--".to_string();

    let lines = match board.forecast().and_then(|f| f.current().map(|s| (f, s))) {
        Some((forecast, sample)) => {
            let window = board.window();
            let range = forecast
                .temperature_range(window)
                .map(|(hi, lo)| format!("{:.0}° / {:.0}°", hi, lo))
                .unwrap_or_else(dash);
            vec![
                Line::from(format!(
                    "{} {}",
                    sample.condition.glyph(),
                    sample.condition.description()
                )),
                Line::from(Span::styled(
                    sample.condition.label_ja(),
                    Style::default().fg(Color::Gray),
                )),
                Line::default(),
                Line::from(format!(
                    "Temp      {}",
                    sample
                        .temperature
                        .map(|t| format!("{:.1}°C", t))
                        .unwrap_or_else(dash)
                )),
                Line::from(format!(
                    "Humidity  {}",
                    sample.humidity.map(|h| format!("{}%", h)).unwrap_or_else(dash)
                )),
                Line::from(format!(
                    "Wind      {}",
                    sample
                        .wind_speed
                        .map(|w| format!("{:.1} km/h", w))
                        .unwrap_or_else(dash)
                )),
                Line::from(format!(
                    "Precip    {}",
                    sample
                        .precipitation
                        .map(|p| format!("{:.1} mm", p))
                        .unwrap_or_else(dash)
                )),
                Line::default(),
                Line::from(format!("Next {}  {}", window.label(), range)),
                Line::from(format!(
                    "Rain {}  {:.1} mm",
                    window.label(),
                    forecast.precipitation_total(window)
                )),
            ]
        }
        None => vec![Line::from(placeholder_text(board))],
    };

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_chart_panel(frame: &mut Frame, area: Rect, board: &Board) {
    match board
        .forecast()
        .and_then(|f| ChartSpec::build(f, board.window()))
    {
        Some(spec) => render_chart(frame, area, &spec, board.cursor()),
        None => {
            let block = Block::default().borders(Borders::ALL).title(" Forecast ");
            frame.render_widget(
                Paragraph::new(placeholder_text(board)).block(block),
                area,
            );
        }
    }
}

fn placeholder_text(board: &Board) -> &'static str {
    match board.state() {
        LoadState::Failed { message, .. } => *message,
        LoadState::Loading => "Loading forecast…",
        LoadState::Idle => "No data",
    }
}

fn control_label(element: Element, board: &Board) -> String {
    let window_label = |w: ForecastWindow| {
        if board.window() == w {
            format!("● {}", w.label())
        } else {
            format!("○ {}", w.label())
        }
    };
    match element {
        Element::CitySelector => format!("City: {} ▾", board.city().name),
        Element::Window24 => window_label(ForecastWindow::Hours24),
        Element::Window48 => window_label(ForecastWindow::Hours48),
        Element::Retry => "Retry".to_string(),
        Element::City(i) => CITIES.get(i).map(|c| c.display_name()).unwrap_or_default(),
    }
}

fn render_controls(frame: &mut Frame, area: Rect, screen: &mut Screen, board: &Board) {
    let mut elements = vec![Element::CitySelector, Element::Window24, Element::Window48];
    if screen.retry_visible() {
        elements.push(Element::Retry);
    }

    let labels: Vec<String> = elements.iter().map(|e| control_label(*e, board)).collect();
    let constraints = labels
        .iter()
        .map(|l| Constraint::Length(Line::from(l.as_str()).width() as u16 + 4));
    let areas = Layout::horizontal(constraints)
        .flex(Flex::Start)
        .spacing(1)
        .split(area);

    for ((element, label), rect) in elements.iter().zip(labels).zip(areas.iter()) {
        let mut style = Style::default();
        if *element == Element::Retry {
            style = style.fg(Color::Red);
        }
        if screen.is_focused(*element) {
            style = focused_style();
        }
        let button = Paragraph::new(Line::from(format!(" {} ", label)))
            .style(style)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(button, *rect);
        screen.record_hit_area(*rect, *element);
    }
}

fn render_status(frame: &mut Frame, area: Rect, screen: &Screen, board: &Board) {
    let hint = match board.state() {
        LoadState::Failed { message, retryable } => {
            let suffix = if *retryable { " · r to retry" } else { "" };
            Span::styled(format!("{}{}", message, suffix), Style::default().fg(Color::Red))
        }
        _ => Span::raw(screen.input_focus().map(Element::hint).unwrap_or_default()),
    };

    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(KEY_HINTS.chars().count() as u16)])
            .areas(area);
    frame.render_widget(Paragraph::new(Line::from(hint)), left);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            KEY_HINTS,
            Style::default().fg(Color::DarkGray),
        ))),
        right,
    );
}

fn render_city_overlay(frame: &mut Frame, body: Rect, screen: &mut Screen, board: &Board) {
    let height = (CITIES.len() as u16 + 2).min(body.height);
    let [vertical] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(body);
    let [area] = Layout::horizontal([Constraint::Length(OVERLAY_WIDTH)])
        .flex(Flex::Center)
        .areas(vertical);

    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Select city ")
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    screen.set_list_rows(inner.height as usize);
    screen.set_overlay_area(area);

    let items: Vec<ListItem> = CITIES
        .iter()
        .map(|city| {
            let marker = if city.id == board.city().id { "✓ " } else { "  " };
            ListItem::new(format!("{}{}", marker, city.display_name()))
        })
        .collect();

    let selected = (0..CITIES.len()).find(|i| screen.is_focused(Element::City(*i)));
    let offset = screen.list_offset();
    let mut state = ListState::default()
        .with_offset(offset)
        .with_selected(selected);
    let list = List::new(items).block(block).highlight_style(focused_style());
    frame.render_stateful_widget(list, area, &mut state);

    let visible = CITIES.len().saturating_sub(offset).min(inner.height as usize);
    for row in 0..visible {
        let rect = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
        screen.record_hit_area(rect, Element::City(offset + row));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tenki_nav::FocusController;
    use tenki_weather::City;

    fn draw(
        screen: &mut Screen,
        board: &Board,
        mode: NavigationMode,
        width: u16,
        height: u16,
    ) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| render(f, screen, board, mode))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn board() -> Board {
        Board::new(City::default_city(), ForecastWindow::Hours24)
    }

    #[test]
    fn test_controls_are_clickable() {
        let mut screen = Screen::default();
        let board = board();
        let text = draw(&mut screen, &board, NavigationMode::Normal, 100, 30);

        assert!(text.contains("City: Tokyo"));
        assert!(text.contains("● 24h"));
        assert!(text.contains("○ 48h"));
        assert!(!text.contains("Retry"));

        // Controls row starts at y = 30 - 1 (status) - 3.
        assert_eq!(screen.hit_test(2, 27), Some(Element::CitySelector));
    }

    #[test]
    fn test_retry_button_drawn_when_visible() {
        let mut screen = Screen::default();
        screen.set_retry_visible(true);
        let mut board = board();
        let generation = board.begin_load();
        board.finish(generation, Err(tenki_core::AppError::Task("dropped".into())));

        let text = draw(&mut screen, &board, NavigationMode::Normal, 100, 30);
        assert!(text.contains("Retry"));
        assert!(text.contains("Loading was interrupted"));
    }

    #[test]
    fn test_overlay_rows_are_recorded() {
        let mut screen = Screen::default();
        let mut controller = FocusController::new();
        controller.set_mode(&mut screen, NavigationMode::OverlayOpen);
        let board = board();

        let text = draw(&mut screen, &board, NavigationMode::OverlayOpen, 100, 30);
        assert!(text.contains("Select city"));
        assert!(text.contains("Sapporo"));

        let sapporo = (0..100u16)
            .flat_map(|x| (0..30u16).map(move |y| (x, y)))
            .find(|(x, y)| screen.hit_test(*x, *y) == Some(Element::City(0)));
        assert!(sapporo.is_some());
    }

    #[test]
    fn test_small_overlay_scrolls_to_focus() {
        let mut screen = Screen::default();
        let mut controller = FocusController::new();
        controller.set_mode(&mut screen, NavigationMode::OverlayOpen);
        for _ in 0..9 {
            controller.move_next(&mut screen);
        }
        let board = board();

        // Body is 20 - 3 - 3 - 1 = 13 rows, so the overlay fits 10 rows inside borders.
        let text = draw(&mut screen, &board, NavigationMode::OverlayOpen, 80, 20);
        assert!(text.contains("Naha"));

        let text = draw(&mut screen, &board, NavigationMode::OverlayOpen, 80, 14);
        assert!(text.contains("Naha"));
        assert!(screen.list_offset() > 0);
    }
}
