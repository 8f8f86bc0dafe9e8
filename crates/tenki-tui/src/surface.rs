//! Focusable elements of the terminal board.

use ratatui::layout::{Position, Rect};
use tenki_nav::{FocusSurface, NavigationMode};
use tenki_weather::{ForecastWindow, CITIES};

/// Overlay rows assumed before the first frame reports the real height.
const DEFAULT_LIST_ROWS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    CitySelector,
    Window24,
    Window48,
    Retry,
    /// Row `i` of the city picker, indexing [`CITIES`].
    City(usize),
}

impl Element {
    /// One-line hint shown in the status bar while the element has input focus.
    pub fn hint(self) -> &'static str {
        match self {
            Element::CitySelector => "Enter: choose a city",
            Element::Window24 => "Enter: show the next 24 hours",
            Element::Window48 => "Enter: show the next 48 hours",
            Element::Retry => "Enter: try loading again",
            Element::City(_) => "Enter: show this city · Esc: cancel",
        }
    }
}

/// What activating an element asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    OpenCityPicker,
    SetWindow(ForecastWindow),
    Retry,
    SelectCity(usize),
}

/// Per-element presentation state the controller drives.
#[derive(Debug)]
pub struct Screen {
    focused: Option<Element>,
    input_focus: Option<Element>,
    retry_visible: bool,
    city_count: usize,
    list_offset: usize,
    list_rows: usize,
    hit_areas: Vec<(Rect, Element)>,
    overlay_area: Option<Rect>,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(CITIES.len())
    }
}

impl Screen {
    pub fn new(city_count: usize) -> Self {
        Self {
            focused: None,
            input_focus: None,
            retry_visible: false,
            city_count,
            list_offset: 0,
            list_rows: DEFAULT_LIST_ROWS,
            hit_areas: Vec::new(),
            overlay_area: None,
        }
    }

    pub fn is_focused(&self, element: Element) -> bool {
        self.focused == Some(element)
    }

    pub fn input_focus(&self) -> Option<Element> {
        self.input_focus
    }

    pub fn retry_visible(&self) -> bool {
        self.retry_visible
    }

    pub fn set_retry_visible(&mut self, visible: bool) {
        self.retry_visible = visible;
    }

    pub fn list_offset(&self) -> usize {
        self.list_offset
    }

    /// Called by the renderer with the overlay's real height.
    pub fn set_list_rows(&mut self, rows: usize) {
        let rows = rows.max(1);
        if rows == self.list_rows {
            return;
        }
        self.list_rows = rows;
        self.list_offset = self
            .list_offset
            .min(self.city_count.saturating_sub(rows));
        if let Some(Element::City(i)) = self.focused {
            self.scroll_to_row(i);
        }
    }

    pub fn clear_hit_areas(&mut self) {
        self.hit_areas.clear();
        self.overlay_area = None;
    }

    pub fn set_overlay_area(&mut self, area: Rect) {
        self.overlay_area = Some(area);
    }

    /// Whether a click landed on the drawn overlay, rows or border.
    pub fn is_inside_overlay(&self, column: u16, row: u16) -> bool {
        self.overlay_area
            .is_some_and(|area| area.contains(Position::new(column, row)))
    }

    pub fn record_hit_area(&mut self, area: Rect, element: Element) {
        self.hit_areas.push((area, element));
    }

    /// Topmost element under a click. Later recordings (the overlay) win.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<Element> {
        let pos = Position::new(column, row);
        self.hit_areas
            .iter()
            .rev()
            .find(|(area, _)| area.contains(pos))
            .map(|(_, element)| *element)
    }

    fn scroll_to_row(&mut self, row: usize) {
        if row < self.list_offset {
            self.list_offset = row;
        } else if row >= self.list_offset + self.list_rows {
            self.list_offset = row + 1 - self.list_rows;
        }
    }
}

impl FocusSurface for Screen {
    type Target = Element;
    type Action = UiAction;

    fn targets(&self, mode: NavigationMode) -> Vec<Element> {
        match mode {
            NavigationMode::Normal => vec![
                Element::CitySelector,
                Element::Window24,
                Element::Window48,
                Element::Retry,
            ],
            NavigationMode::OverlayOpen => (0..self.city_count).map(Element::City).collect(),
        }
    }

    fn is_interactable(&self, target: Element) -> bool {
        match target {
            Element::Retry => self.retry_visible,
            Element::City(i) => i < self.city_count,
            Element::CitySelector | Element::Window24 | Element::Window48 => true,
        }
    }

    fn clear_focused(&mut self, target: Element) {
        if self.focused == Some(target) {
            self.focused = None;
        }
        if self.input_focus == Some(target) {
            self.input_focus = None;
        }
    }

    fn mark_focused(&mut self, target: Element) {
        self.focused = Some(target);
    }

    fn take_input_focus(&mut self, target: Element) {
        self.input_focus = Some(target);
    }

    fn scroll_into_view(&mut self, target: Element) {
        if let Element::City(i) = target {
            self.scroll_to_row(i);
        }
    }

    fn activate(&mut self, target: Element) -> UiAction {
        match target {
            Element::CitySelector => UiAction::OpenCityPicker,
            Element::Window24 => UiAction::SetWindow(ForecastWindow::Hours24),
            Element::Window48 => UiAction::SetWindow(ForecastWindow::Hours48),
            Element::Retry => UiAction::Retry,
            Element::City(i) => UiAction::SelectCity(i),
        }
    }
}
