//! Application state and the event loop.
//!
//! One task owns everything on screen and handles one [`AppEvent`] at a time.
//! Network work runs on spawned tasks and reports back on the same channel.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use ratatui::backend::Backend;
use ratatui::Terminal;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use tenki_core::{AppError, Config, RefreshScheduler};
use tenki_nav::{FocusController, NavigationMode};
use tenki_store::Preferences;
use tenki_weather::{City, Forecast, ForecastWindow, RetryConfig, WeatherProvider, CITIES};

use crate::board::Board;
use crate::input::Input;
use crate::surface::{Element, Screen, UiAction};
use crate::view;

#[derive(Debug)]
pub enum AppEvent {
    Input(Input),
    /// Periodic refresh tick.
    Refresh,
    Loaded {
        generation: u64,
        result: Result<Forecast, AppError>,
    },
}

pub struct App {
    provider: Arc<WeatherProvider>,
    prefs: Preferences,
    controller: FocusController<Element>,
    screen: Screen,
    board: Board,
    tx: UnboundedSender<AppEvent>,
    rx: UnboundedReceiver<AppEvent>,
    refresh_period: Option<Duration>,
    scheduler: Option<RefreshScheduler>,
    should_quit: bool,
}

impl App {
    /// Build the app from configuration. Nothing is fetched until [`App::start`].
    ///
    /// # Errors
    /// The HTTP client cannot be built.
    pub fn new(config: &Config, prefs: Preferences) -> Result<Self> {
        let provider = WeatherProvider::new(config.weather.api_url.clone(), config.request_timeout())
            .context("Failed to create weather provider")?
            .with_history(config.history_window())
            .with_timezone(config.weather.timezone.clone())
            .with_retry(RetryConfig::default());

        let city = initial_city(&prefs, &config.weather.default_city);
        tracing::info!(city = city.id, "Starting with city");

        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            provider: Arc::new(provider),
            prefs,
            controller: FocusController::new(),
            screen: Screen::default(),
            board: Board::new(city, config.ui.default_window),
            tx,
            rx,
            refresh_period: config.refresh_interval(),
            scheduler: None,
            should_quit: false,
        })
    }

    /// Sender for events produced outside the app (terminal input).
    pub fn sender(&self) -> UnboundedSender<AppEvent> {
        self.tx.clone()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn controller(&self) -> &FocusController<Element> {
        &self.controller
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Focus the first control, issue the first load and start the refresh
    /// timer. Must run inside a tokio runtime.
    pub fn start(&mut self) {
        self.controller.start(&mut self.screen);
        self.load();

        if let Some(period) = self.refresh_period {
            let scheduler = RefreshScheduler::spawn(period, self.tx.clone(), || AppEvent::Refresh);
            self.scheduler = Some(scheduler);
        } else {
            tracing::info!("Periodic refresh disabled");
        }
    }

    /// Draw and handle events until quit is requested or every sender is gone.
    ///
    /// # Errors
    /// Drawing to the terminal failed.
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.start();

        while !self.should_quit {
            self.draw(terminal)?;
            if !self.step().await {
                break;
            }
        }
        Ok(())
    }

    /// Wait for the next event and handle it, plus anything queued behind it.
    /// Returns `false` once the channel is closed.
    pub async fn step(&mut self) -> bool {
        let Some(event) = self.rx.recv().await else {
            return false;
        };
        self.handle_event(event);
        while let Ok(event) = self.rx.try_recv() {
            self.handle_event(event);
        }
        true
    }

    /// Render one frame.
    ///
    /// # Errors
    /// The backend failed to draw.
    pub fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mode = self.controller.mode();
        let screen = &mut self.screen;
        let board = &self.board;
        terminal
            .draw(|frame| view::render(frame, screen, board, mode))
            .context("Failed to draw frame")?;
        Ok(())
    }

    /// Stop the refresh timer. In-flight loads are abandoned.
    pub async fn dispose(mut self) {
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.shutdown().await;
        }
        tracing::info!("Tenki stopped");
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(input) => self.handle_input(input),
            AppEvent::Refresh => {
                tracing::debug!(city = self.board.city().id, "Periodic refresh");
                self.load();
            }
            AppEvent::Loaded { generation, result } => {
                self.board.finish(generation, result);
            }
        }
        self.sync_surface();
    }

    fn handle_input(&mut self, input: Input) {
        match input {
            Input::Nav(key) => {
                if let Some(action) = self.controller.handle(&mut self.screen, key.into()) {
                    self.perform(action);
                }
            }
            Input::Click(column, row) => self.handle_click(column, row),
            Input::Scrub(hours) => {
                self.board.move_cursor(i64::from(hours));
            }
            Input::Refresh => self.load(),
            Input::Quit => {
                tracing::info!("Quit requested");
                self.should_quit = true;
            }
            Input::Resize => {}
        }
    }

    /// Clicks focus and activate in one step. A click outside the open
    /// overlay dismisses it.
    fn handle_click(&mut self, column: u16, row: u16) {
        if self.controller.mode().is_overlay() && !self.screen.is_inside_overlay(column, row) {
            self.controller.close_overlay(&mut self.screen);
            return;
        }

        let Some(element) = self.screen.hit_test(column, row) else {
            return;
        };
        if !self.controller.focus_target(&mut self.screen, element) {
            return;
        }
        if let Some(action) = self.controller.activate_current(&mut self.screen) {
            self.perform(action);
        }
    }

    fn perform(&mut self, action: UiAction) {
        tracing::debug!(?action, "perform");
        match action {
            UiAction::OpenCityPicker => {
                self.controller
                    .set_mode(&mut self.screen, NavigationMode::OverlayOpen);
            }
            UiAction::SetWindow(window) => self.set_window(window),
            UiAction::Retry => self.load(),
            UiAction::SelectCity(index) => self.select_city(index),
        }
    }

    fn set_window(&mut self, window: ForecastWindow) {
        if self.board.set_window(window) {
            tracing::debug!(window = window.label(), "Forecast window changed");
        }
    }

    fn select_city(&mut self, index: usize) {
        let Some(city) = CITIES.get(index) else {
            tracing::warn!(index, "City index out of range");
            return;
        };

        self.prefs.set_selected_city(city.id);
        self.controller.close_overlay(&mut self.screen);
        self.board.set_city(city);
        self.load();
    }

    fn load(&mut self) {
        let generation = self.board.begin_load();
        request_fetch(
            &self.tx,
            Arc::clone(&self.provider),
            self.board.city(),
            generation,
        );
    }

    /// Mirror board state into the surface. The controller only rebuilds its
    /// ring if that changed what is focusable, and never while the overlay is
    /// open.
    fn sync_surface(&mut self) {
        let retry = self.board.shows_retry();
        if self.screen.retry_visible() != retry {
            self.screen.set_retry_visible(retry);
            self.controller.refresh_targets(&mut self.screen);
        }
    }
}

/// Saved city if it is still in the catalogue, otherwise the configured
/// default, otherwise the built-in default.
fn initial_city(prefs: &Preferences, configured: &str) -> &'static City {
    if let Some(saved) = prefs.selected_city() {
        match City::find(&saved) {
            Some(city) => return city,
            None => tracing::warn!(saved = %saved, "Saved city is not in the catalogue"),
        }
    }
    City::find_or_default(configured)
}

/// Fetch `city` off the UI task and post the result as [`AppEvent::Loaded`].
fn request_fetch(
    tx: &UnboundedSender<AppEvent>,
    provider: Arc<WeatherProvider>,
    city: &'static City,
    generation: u64,
) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let fetch = tokio::spawn(async move { provider.fetch(city).await });
        let result = match fetch.await {
            Ok(result) => result.map_err(AppError::from),
            Err(e) => Err(AppError::Task(e.to_string())),
        };
        if tx.send(AppEvent::Loaded { generation, result }).is_err() {
            tracing::debug!(generation, "App gone before forecast arrived");
        }
    });
}
