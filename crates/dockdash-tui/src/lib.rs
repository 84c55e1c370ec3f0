//! Terminal dashboard for Docker and Podman containers
//!
//! Built with Ratatui. A background worker keeps the container list and the
//! selected container's stats fresh while the UI loop handles keys.

pub mod app;
pub mod dashboard;
mod demo;
mod event;
pub mod input;
pub mod refresh;
pub mod selection;
pub mod ui;

pub use app::{App, AppError, AppResult};
pub use dashboard::{Dashboard, DashboardView, RefreshUpdate, SharedDashboard};
pub use demo::DemoProvider;
pub use event::{Event, EventHandler};
pub use input::{action_for_key, Action, Dispatched, InputDispatcher};
pub use refresh::{RefreshRequester, RefreshWorker, Refresher, TickOutcome};
pub use selection::Selection;

use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dockdash_provider::ContainerProvider;
use ratatui::prelude::*;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;

/// Options for [`run`]
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Time between refresh ticks
    pub refresh_interval: Duration,
    /// Swap in a no-op subscriber while the TUI owns the terminal
    pub suppress_logs: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(1),
            suppress_logs: true,
        }
    }
}

/// Run the TUI application
pub async fn run(provider: Arc<dyn ContainerProvider>, options: RunOptions) -> AppResult<()> {
    // Fail before touching the terminal when the runtime is unreachable
    provider.ping().await?;

    // Logs written to stderr would corrupt the display. The guard restores
    // the previous subscriber when dropped.
    let _guard = options.suppress_logs.then(|| {
        tracing::subscriber::set_default(
            tracing_subscriber::registry().with(tracing_subscriber::layer::Identity::new()),
        )
    });

    // Setup terminal. Until the explicit restore below, any early return
    // (setup failure or panic) still leaves raw mode.
    enable_raw_mode()?;
    let restore = RestoreOnDrop::new(|| {
        let _ = restore_terminal();
    });
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(provider, options.refresh_interval);
    let res = app.run(&mut terminal).await;

    restore.disarm();
    restore_terminal()?;

    res
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)
}

/// Runs a cleanup when dropped unless it was disarmed first
struct RestoreOnDrop<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> RestoreOnDrop<F> {
    fn new(cleanup: F) -> Self {
        Self(Some(cleanup))
    }

    fn disarm(mut self) {
        self.0 = None;
    }
}

impl<F: FnOnce()> Drop for RestoreOnDrop<F> {
    fn drop(&mut self) {
        if let Some(cleanup) = self.0.take() {
            cleanup();
        }
    }
}
