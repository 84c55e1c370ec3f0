//! Main TUI application state and loop

use crate::dashboard::{Dashboard, DashboardView, SharedDashboard};
use crate::event::{Event, EventHandler};
use crate::input::{action_for_key, Dispatched, InputDispatcher};
use crate::refresh::{RefreshWorker, Refresher, TickOutcome};
use crate::ui;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dockdash_provider::{ContainerProvider, ProviderError, ProviderInfo};
use ratatui::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

pub type AppResult<T> = Result<T, AppError>;

/// How often the terminal is polled for input
const INPUT_POLL_RATE: Duration = Duration::from_millis(250);

/// Application state
pub struct App {
    dashboard: SharedDashboard,
    dispatcher: InputDispatcher,
    refresher: Arc<Refresher>,
    refresh_interval: Duration,
    provider_info: ProviderInfo,
    pub should_quit: bool,
}

impl App {
    /// Create the app. Nothing is fetched until `run` starts the refresh worker.
    pub fn new(provider: Arc<dyn ContainerProvider>, refresh_interval: Duration) -> Self {
        let provider_info = provider.info();
        let dashboard = SharedDashboard::new(Dashboard::new());
        let refresher = Arc::new(Refresher::new(provider.clone(), dashboard.clone()));
        let dispatcher = InputDispatcher::new(provider, dashboard.clone());

        Self {
            dashboard,
            dispatcher,
            refresher,
            refresh_interval,
            provider_info,
            should_quit: false,
        }
    }

    /// Run the main loop until the operator quits
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> AppResult<()> {
        let mut events = EventHandler::new(INPUT_POLL_RATE);
        let worker = RefreshWorker::spawn(
            self.refresher.clone(),
            self.refresh_interval,
            events.sender(),
        );
        self.dispatcher.set_refresh(worker.requester());

        let result = self.event_loop(terminal, &mut events).await;

        // Quitting never waits for a refresh in flight
        worker.shutdown();
        result
    }

    async fn event_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &mut EventHandler,
    ) -> AppResult<()> {
        while !self.should_quit {
            let view = self.view().await;
            terminal.draw(|frame| ui::draw(frame, &view))?;

            match events.next().await {
                Some(event) => self.handle_event(event).await,
                None => break,
            }
        }
        Ok(())
    }

    /// Snapshot of the dashboard for one frame
    pub async fn view(&self) -> DashboardView {
        self.dashboard.view().await.with_provider(self.provider_info.clone())
    }

    pub fn dashboard(&self) -> &SharedDashboard {
        &self.dashboard
    }

    /// Run one refresh tick in place of the background worker
    pub async fn refresh_now(&self) -> TickOutcome {
        self.refresher.tick().await
    }

    /// Handle an event
    async fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key).await,
            Event::Refreshed | Event::Resize(_, _) => {
                // The loop redraws after every event
            }
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        let Some(action) = action_for_key(key) else {
            return;
        };
        if self.dispatcher.dispatch(action).await == Dispatched::Quit {
            self.should_quit = true;
        }
    }

    /// Feed a key press through the same path as the terminal does
    pub async fn send_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        self.handle_key(KeyEvent::new(code, modifiers)).await;
    }
}
