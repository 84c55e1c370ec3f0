//! Key handling: selection movement and container actions
//!
//! Runtime actions are fire-and-forget. The dispatcher spawns the call and
//! returns at once; the next refresh tick is what brings the table in line
//! with the runtime.

use crate::dashboard::SharedDashboard;
use crate::refresh::RefreshRequester;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use dockdash_provider::{ContainerId, ContainerProvider};
use std::sync::Arc;
use tracing::instrument::WithSubscriber;

/// Something the operator asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    /// Start a stopped container, stop a running one
    ToggleRun,
    /// Force-remove the selected container
    Remove,
    /// Refresh now instead of waiting for the next tick
    Refresh,
}

/// Map a key press to an action
pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('s') if ctrl => Some(Action::ToggleRun),
        KeyCode::Char('d') if ctrl => Some(Action::Remove),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Char('r') | KeyCode::F(5) => Some(Action::Refresh),
        _ => None,
    }
}

/// What the app loop should do after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    Quit,
    Redraw,
    /// Precondition not met, nothing changed
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuntimeAction {
    Start,
    Stop,
    Remove,
}

impl RuntimeAction {
    fn verb(self) -> &'static str {
        match self {
            Self::Start => "Starting",
            Self::Stop => "Stopping",
            Self::Remove => "Removing",
        }
    }
}

/// Applies actions to the shared dashboard and the runtime
pub struct InputDispatcher {
    provider: Arc<dyn ContainerProvider>,
    dashboard: SharedDashboard,
    refresh: Option<RefreshRequester>,
}

impl InputDispatcher {
    pub fn new(provider: Arc<dyn ContainerProvider>, dashboard: SharedDashboard) -> Self {
        Self {
            provider,
            dashboard,
            refresh: None,
        }
    }

    /// Route `Action::Refresh` to a running refresh worker
    pub fn set_refresh(&mut self, requester: RefreshRequester) {
        self.refresh = Some(requester);
    }

    pub async fn dispatch(&self, action: Action) -> Dispatched {
        match action {
            Action::Quit => Dispatched::Quit,
            Action::MoveUp => redraw_if(self.dashboard.lock().await.move_up()),
            Action::MoveDown => redraw_if(self.dashboard.lock().await.move_down()),
            Action::ToggleRun => self.runtime_action(false).await,
            Action::Remove => self.runtime_action(true).await,
            Action::Refresh => match &self.refresh {
                Some(requester) => {
                    requester.request();
                    Dispatched::Redraw
                }
                None => Dispatched::Ignored,
            },
        }
    }

    async fn runtime_action(&self, remove: bool) -> Dispatched {
        let (id, action) = {
            let mut dashboard = self.dashboard.lock().await;
            let Some(container) = dashboard.selected_container() else {
                return Dispatched::Ignored;
            };
            let action = if remove {
                RuntimeAction::Remove
            } else if container.is_running() {
                RuntimeAction::Stop
            } else {
                RuntimeAction::Start
            };
            let message = format!("{} {}", action.verb(), container.display_name());
            let id = container.id.clone();
            dashboard.set_status(message);
            (id, action)
        };

        spawn_action(self.provider.clone(), id, action);
        Dispatched::Redraw
    }
}

fn redraw_if(changed: bool) -> Dispatched {
    if changed {
        Dispatched::Redraw
    } else {
        Dispatched::Ignored
    }
}

fn spawn_action(
    provider: Arc<dyn ContainerProvider>,
    id: ContainerId,
    action: RuntimeAction,
) {
    tokio::spawn(async move {
        tracing::debug!("{} container {}", action.verb(), id.short());
        let result = match action {
            RuntimeAction::Start => provider.start(&id).await,
            RuntimeAction::Stop => provider.stop(&id, None).await,
            RuntimeAction::Remove => provider.remove(&id, true).await,
        };
        if let Err(e) = result {
            tracing::warn!("{} container {} failed: {}", action.verb(), id.short(), e);
        }
    }
    .with_current_subscriber());
}
