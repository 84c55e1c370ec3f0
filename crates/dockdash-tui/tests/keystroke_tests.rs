//! Integration tests that exercise App key handling via send_key()

mod helpers;

use crossterm::event::{KeyCode, KeyModifiers};
use dockdash_provider::test_support::{mock_container, MockCall};
use dockdash_provider::ContainerStatus;
use dockdash_tui::{Dashboard, TickOutcome};
use helpers::app_with_containers;
use std::time::Duration;

/// Yield to spawned tasks until `done` holds
async fn wait_for(mut done: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !done() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("condition not reached in time");
}

// ---------------------------------------------------------------------------
// Navigation tests
// ---------------------------------------------------------------------------

/// The first refresh selects the first row
#[tokio::test]
async fn test_first_refresh_selects_first_row() {
    let (app, _mock) = app_with_containers(&["a", "b", "c"]).await;
    let view = app.view().await;
    assert_eq!(view.selected_row, 1);
    assert_eq!(view.stats.unwrap().name, "a");
}

/// 'j' and Down stop on the last row, 'k' and Up stop on the first
#[tokio::test]
async fn test_navigation_stays_in_bounds() {
    let (mut app, _mock) = app_with_containers(&["a", "b", "c"]).await;

    app.send_key(KeyCode::Up, KeyModifiers::NONE).await;
    assert_eq!(app.view().await.selected_row, 1);

    app.send_key(KeyCode::Char('j'), KeyModifiers::NONE).await;
    app.send_key(KeyCode::Down, KeyModifiers::NONE).await;
    app.send_key(KeyCode::Down, KeyModifiers::NONE).await;
    assert_eq!(app.view().await.selected_row, 3);

    app.send_key(KeyCode::Char('k'), KeyModifiers::NONE).await;
    assert_eq!(app.view().await.selected_row, 2);
}

/// Moving the selection never touches the runtime
#[tokio::test]
async fn test_navigation_does_no_io() {
    let (mut app, mock) = app_with_containers(&["a", "b"]).await;
    let calls_before = mock.get_calls().len();

    app.send_key(KeyCode::Down, KeyModifiers::NONE).await;
    app.send_key(KeyCode::Up, KeyModifiers::NONE).await;

    assert_eq!(mock.get_calls().len(), calls_before);
}

/// Down with nothing selected stays at no selection
#[tokio::test]
async fn test_move_down_without_selection_is_noop() {
    let (mut app, _mock) = app_with_containers(&["a", "b"]).await;
    *app.dashboard().lock().await = Dashboard::with_containers(
        vec![
            mock_container("a", ContainerStatus::Running),
            mock_container("b", ContainerStatus::Running),
        ],
        0,
    );

    app.send_key(KeyCode::Down, KeyModifiers::NONE).await;
    assert_eq!(app.view().await.selected_row, 0);
}

/// The selected last container disappears: selection moves to the new last
/// row and the stats pane follows it
#[tokio::test]
async fn test_selection_follows_shrinking_list() {
    let (mut app, mock) = app_with_containers(&["a", "b", "c"]).await;
    app.send_key(KeyCode::Down, KeyModifiers::NONE).await;
    app.send_key(KeyCode::Down, KeyModifiers::NONE).await;
    assert_eq!(app.view().await.selected_row, 3);

    mock.set_containers(vec![
        mock_container("a", ContainerStatus::Running),
        mock_container("b", ContainerStatus::Running),
    ]);
    assert_eq!(app.refresh_now().await, TickOutcome::Installed);

    let view = app.view().await;
    assert_eq!(view.containers.len(), 2);
    assert_eq!(view.selected_row, 2);
    assert_eq!(view.stats.unwrap().name, "b");
    assert!(mock.was_called(&MockCall::Stats {
        id: "b".to_string()
    }));
}

// ---------------------------------------------------------------------------
// Runtime action tests
// ---------------------------------------------------------------------------

/// Ctrl-s on a running container stops it without waiting for the runtime
#[tokio::test]
async fn test_toggle_is_fire_and_forget() {
    let (mut app, mock) = app_with_containers(&["a", "b"]).await;
    mock.clear_calls();
    let gate = mock.gate_actions();
    let before = app.view().await;
    let stop = MockCall::Stop { id: "a".to_string() };

    app.send_key(KeyCode::Char('s'), KeyModifiers::CONTROL).await;

    // The key returned while the stop is still held at the gate
    wait_for(|| mock.was_called(&stop)).await;
    assert!(!mock.completed_calls().contains(&stop));
    assert_eq!(mock.get_calls(), vec![stop.clone()]);

    let after = app.view().await;
    assert_eq!(*after.containers, *before.containers);
    assert_eq!(after.selected_row, before.selected_row);
    assert_eq!(after.status_message.as_deref(), Some("Stopping a"));

    gate.add_permits(1);
    wait_for(|| mock.completed_calls().contains(&stop)).await;

    // Still unchanged until the next refresh reads the runtime again
    assert!(app.view().await.containers[0].is_running());

    mock.set_containers(vec![
        mock_container("a", ContainerStatus::Exited),
        mock_container("b", ContainerStatus::Running),
    ]);
    app.refresh_now().await;
    assert!(!app.view().await.containers[0].is_running());
}

/// Ctrl-s on a stopped container starts it
#[tokio::test]
async fn test_toggle_starts_stopped_container() {
    let (mut app, mock) = app_with_containers(&[]).await;
    mock.set_containers(vec![mock_container("idle", ContainerStatus::Exited)]);
    app.refresh_now().await;

    app.send_key(KeyCode::Char('s'), KeyModifiers::CONTROL).await;
    wait_for(|| {
        mock.completed_calls()
            .contains(&MockCall::Start { id: "idle".to_string() })
    })
    .await;
    assert_eq!(
        app.view().await.status_message.as_deref(),
        Some("Starting idle")
    );
}

/// Ctrl-d force-removes the selected container
#[tokio::test]
async fn test_remove_forces() {
    let (mut app, mock) = app_with_containers(&["a", "b"]).await;
    app.send_key(KeyCode::Down, KeyModifiers::NONE).await;

    app.send_key(KeyCode::Char('d'), KeyModifiers::CONTROL).await;
    let expected = MockCall::Remove {
        id: "b".to_string(),
        force: true,
    };
    wait_for(|| mock.completed_calls().contains(&expected)).await;

    // The row stays until a refresh no longer lists it
    assert_eq!(app.view().await.containers.len(), 2);
    mock.set_containers(vec![mock_container("a", ContainerStatus::Running)]);
    app.refresh_now().await;
    let view = app.view().await;
    assert_eq!(view.containers.len(), 1);
    assert_eq!(view.selected_row, 1);
}

/// Actions need a selected container
#[tokio::test]
async fn test_actions_without_selection_are_ignored() {
    let (mut app, mock) = app_with_containers(&[]).await;

    app.send_key(KeyCode::Char('s'), KeyModifiers::CONTROL).await;
    app.send_key(KeyCode::Char('d'), KeyModifiers::CONTROL).await;
    tokio::task::yield_now().await;

    assert_eq!(mock.get_calls(), vec![MockCall::List]);
    assert!(app.view().await.status_message.is_none());
}

/// A failing action is logged and the dashboard keeps going
#[tokio::test]
async fn test_failed_action_keeps_dashboard() {
    let (mut app, mock) = app_with_containers(&["a"]).await;
    mock.fail_actions("permission denied");
    let stop = MockCall::Stop { id: "a".to_string() };

    app.send_key(KeyCode::Char('s'), KeyModifiers::CONTROL).await;
    wait_for(|| mock.completed_calls().contains(&stop)).await;

    assert!(!app.should_quit);
    assert_eq!(app.refresh_now().await, TickOutcome::Installed);
    assert_eq!(app.view().await.containers.len(), 1);
}

// ---------------------------------------------------------------------------
// Quit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_q_quits() {
    let (mut app, _mock) = app_with_containers(&["a"]).await;
    app.send_key(KeyCode::Char('q'), KeyModifiers::NONE).await;
    assert!(app.should_quit);
}
