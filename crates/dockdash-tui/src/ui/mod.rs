//! UI rendering for the dashboard
//!
//! Pure projection of a [`DashboardView`]: nothing here holds state between
//! frames.

mod containers;
mod detail;
mod usage;

use crate::dashboard::DashboardView;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use containers::*;
use detail::*;
use usage::*;

/// Height of the detail/usage row below the table
const BOTTOM_ROW_HEIGHT: u16 = 10;

/// Background of the selected table row
pub const SELECTED_ROW_BG: Color = Color::Red;

/// Main draw function
pub fn draw(frame: &mut Frame, view: &DashboardView) {
    let area = frame.size();

    // Full-width table on top, detail and usage side by side below, status line last
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(4),
            Constraint::Length(BOTTOM_ROW_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    draw_containers(frame, view, chunks[0]);
    draw_detail(frame, view, bottom[0]);
    draw_usage(frame, bottom[1]);
    draw_footer(frame, view, chunks[2]);
}

fn pane_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
}

/// One-line status bar with the last action message
fn draw_footer(frame: &mut Frame, view: &DashboardView, area: Rect) {
    let text = view.status_message.as_deref().unwrap_or("");
    let footer = Paragraph::new(Span::styled(
        format!(" {}", text),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(footer, area);
}
