use super::*;
use dockdash_provider::ContainerSummary;

const HEADER: [&str; 5] = ["ID", "Image", "Ports", "Status", "Name"];

/// Background for a 1-based table row. Every row gets an explicit color so
/// the row that lost the highlight goes back to the default.
pub(super) fn row_background(row: usize, selected_row: usize) -> Color {
    if row == selected_row {
        SELECTED_ROW_BG
    } else {
        Color::Reset
    }
}

/// Cell texts of one container row
pub(super) fn row_cells(container: &ContainerSummary) -> [String; 5] {
    [
        container.id.short().to_string(),
        container.image.clone(),
        container.ports_display(),
        container.status.clone(),
        container.names_display(),
    ]
}

pub(super) fn draw_containers(frame: &mut Frame, view: &DashboardView, area: Rect) {
    let header = Row::new(HEADER.iter().map(|h| Cell::from(*h))).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = view
        .containers
        .iter()
        .enumerate()
        .map(|(i, container)| {
            let row = i + 1;
            let mut style = Style::default().bg(row_background(row, view.selected_row));
            if row == view.selected_row {
                style = style.fg(Color::White).add_modifier(Modifier::BOLD);
            }
            Row::new(row_cells(container).map(Cell::from)).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(14), // ID
        Constraint::Percentage(25), // Image
        Constraint::Percentage(20), // Ports
        Constraint::Length(22), // Status
        Constraint::Min(10),    // Name (takes remaining)
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(containers_title(view))
                .borders(Borders::ALL),
        )
        .highlight_style(Style::default().bg(SELECTED_ROW_BG));

    // Table state only keeps the selected row scrolled into view
    let mut state = TableState::default();
    state.select(view.selected_row.checked_sub(1));
    frame.render_stateful_widget(table, area, &mut state);
}

fn containers_title(view: &DashboardView) -> String {
    let provider = view
        .provider
        .as_ref()
        .map(|p| format!(" [{} API {}]", p.provider_type, p.api_version))
        .unwrap_or_default();

    if !view.loaded {
        return format!(" Containers{} (loading...) ", provider);
    }

    match view.last_refresh {
        Some(at) => format!(
            " Containers{} ({}) - updated {} ",
            provider,
            view.containers.len(),
            at.format("%H:%M:%S")
        ),
        None => format!(" Containers{} ({}) ", provider, view.containers.len()),
    }
}
