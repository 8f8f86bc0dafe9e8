//! Terminal front-end for Tenki.
//!
//! A remote-control style weather board: every control is reachable with
//! arrow keys, Enter and Esc, and the mouse works as a shortcut.

pub mod app;
pub mod board;
pub mod chart_view;
pub mod input;
pub mod surface;
pub mod terminal;
pub mod view;

pub use app::{App, AppEvent};
pub use board::{Board, LoadState};
pub use surface::{Element, Screen, UiAction};

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc::UnboundedSender;

use tenki_core::Config;
use tenki_store::{MemoryStore, Preferences, SqliteStore};

use crate::terminal::TerminalGuard;

/// Run the board until the user quits.
///
/// # Errors
/// The runtime, the HTTP client or the terminal could not be set up, or a
/// frame failed to draw.
pub fn run(config: Config) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("tenki-tokio")
        .build()
        .context("Failed to create tokio runtime")?;

    runtime.block_on(run_board(config))
}

async fn run_board(config: Config) -> Result<()> {
    let prefs = open_preferences(&config);
    let mut app = App::new(&config, prefs)?;

    let guard = TerminalGuard::new(config.ui.mouse).context("Failed to set up terminal")?;
    guard.install_panic_hook();
    let mut terminal =
        Terminal::new(CrosstermBackend::new(io::stdout())).context("Failed to open terminal")?;
    terminal.clear().context("Failed to clear terminal")?;

    let stop = Arc::new(AtomicBool::new(false));
    let reader = spawn_input_reader(app.sender(), config.tick_rate(), Arc::clone(&stop));

    let result = app.run(&mut terminal).await;

    stop.store(true, Ordering::SeqCst);
    app.dispose().await;
    drop(guard);
    if reader.join().is_err() {
        tracing::warn!("Input reader thread panicked");
    }

    result
}

/// SQLite-backed preferences, or an in-memory store when the database cannot
/// be opened. The board still works; the city just is not remembered.
fn open_preferences(config: &Config) -> Preferences {
    let path = config.database_path();
    match SqliteStore::open(&path) {
        Ok(store) => {
            tracing::info!("Preferences stored in {}", path.display());
            Preferences::new(Arc::new(store))
        }
        Err(e) => {
            tracing::warn!(
                "Failed to open preferences at {}: {}. Selections will not be saved.",
                path.display(),
                e
            );
            Preferences::new(Arc::new(MemoryStore::new()))
        }
    }
}

/// crossterm's event reading blocks, so it gets its own thread. Polling with
/// a timeout lets the thread notice `stop` without waiting for a key press.
fn spawn_input_reader(
    tx: UnboundedSender<AppEvent>,
    tick: Duration,
    stop: Arc<AtomicBool>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        forward_input(&tx, &stop, || {
            if crossterm::event::poll(tick)? {
                crossterm::event::read().map(Some)
            } else {
                Ok(None)
            }
        });
        tracing::debug!("Input reader stopped");
    })
}

/// Pump terminal events into the app until `stop` is set or the app is gone.
///
/// `next_event` yields `Ok(None)` when nothing arrived within one tick. If it
/// fails the terminal is unusable, so the app is told to quit rather than left
/// running with no way to reach it.
fn forward_input<F>(tx: &UnboundedSender<AppEvent>, stop: &AtomicBool, mut next_event: F)
where
    F: FnMut() -> io::Result<Option<crossterm::event::Event>>,
{
    while !stop.load(Ordering::SeqCst) {
        let event = match next_event() {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                tracing::error!("Failed to read terminal input: {}", e);
                let _ = tx.send(AppEvent::Input(input::Input::Quit));
                return;
            }
        };
        if let Some(input) = input::translate(event) {
            if tx.send(AppEvent::Input(input)).is_err() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use tokio::sync::mpsc;

    use crate::input::Input;

    #[test]
    fn test_read_failure_asks_app_to_quit() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let stop = AtomicBool::new(false);
        let mut script = vec![
            Ok(Some(Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))),
            Ok(None),
            Err(io::Error::other("tty gone")),
        ]
        .into_iter();

        forward_input(&tx, &stop, || script.next().unwrap_or(Ok(None)));

        assert!(matches!(
            rx.try_recv(),
            Ok(AppEvent::Input(Input::Nav(tenki_nav::NavKey::Select)))
        ));
        assert!(matches!(rx.try_recv(), Ok(AppEvent::Input(Input::Quit))));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_stop_flag_ends_forwarding() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let stop = AtomicBool::new(false);
        let mut polls = 0;

        forward_input(&tx, &stop, || {
            polls += 1;
            if polls == 3 {
                stop.store(true, Ordering::SeqCst);
            }
            Ok(None)
        });

        assert_eq!(polls, 3);
        assert!(rx.try_recv().is_err());
    }
}
