use dockdash_provider::test_support::{mock_container, MockProvider};
use dockdash_provider::{ContainerStatus, ProviderType};
use dockdash_tui::{App, DashboardView};
use ratatui::buffer::Buffer;
use ratatui::{backend::TestBackend, Terminal};
use std::sync::Arc;
use std::time::Duration;

/// Render a view to a TestBackend and return the buffer
#[allow(dead_code)]
pub fn render_view(view: &DashboardView, width: u16, height: u16) -> Buffer {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| dockdash_tui::ui::draw(frame, view))
        .unwrap();
    terminal.backend().buffer().clone()
}

/// Convert a ratatui buffer to a string representation
#[allow(dead_code)]
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let mut output = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            let cell = buffer.get(x, y);
            output.push_str(cell.symbol());
        }
        output.push('\n');
    }
    output
}

/// Screen row (y) of the first line containing `needle`
#[allow(dead_code)]
pub fn line_of(buffer: &Buffer, needle: &str) -> Option<u16> {
    buffer_to_string(buffer)
        .lines()
        .position(|line| line.contains(needle))
        .map(|y| y as u16)
}

/// App backed by a mock runtime holding running containers with the given names
#[allow(dead_code)]
pub async fn app_with_containers(names: &[&str]) -> (App, Arc<MockProvider>) {
    let mock = Arc::new(MockProvider::new(ProviderType::Docker));
    mock.set_containers(
        names
            .iter()
            .map(|n| mock_container(n, ContainerStatus::Running))
            .collect(),
    );
    let app = App::new(mock.clone(), Duration::from_secs(3600));
    app.refresh_now().await;
    (app, mock)
}
