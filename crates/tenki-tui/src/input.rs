//! Terminal events to board input.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use tenki_nav::NavKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Nav(NavKey),
    /// Left click at (column, row).
    Click(u16, u16),
    /// Move the chart cursor by this many hours.
    Scrub(i8),
    Refresh,
    Quit,
    Resize,
}

pub fn translate(event: Event) -> Option<Input> {
    match event {
        Event::Key(key) => translate_key(key),
        Event::Mouse(mouse) => translate_mouse(mouse),
        Event::Resize(_, _) => Some(Input::Resize),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<Input> {
    // Windows reports releases too.
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Input::Quit),
            _ => None,
        };
    }

    let nav = |k| Some(Input::Nav(k));
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => nav(NavKey::Up),
        KeyCode::Down | KeyCode::Char('j') => nav(NavKey::Down),
        KeyCode::Left | KeyCode::Char('h') => nav(NavKey::Left),
        KeyCode::Right | KeyCode::Char('l') => nav(NavKey::Right),
        KeyCode::Enter | KeyCode::Char(' ') => nav(NavKey::Select),
        KeyCode::Esc | KeyCode::Backspace => nav(NavKey::Back),
        KeyCode::Char('[') | KeyCode::Char(',') => Some(Input::Scrub(-1)),
        KeyCode::Char(']') | KeyCode::Char('.') => Some(Input::Scrub(1)),
        KeyCode::Char('r') => Some(Input::Refresh),
        KeyCode::Char('q') => Some(Input::Quit),
        _ => None,
    }
}

fn translate_mouse(mouse: MouseEvent) -> Option<Input> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Input::Click(mouse.column, mouse.row)),
        _ => None,
    }
}
