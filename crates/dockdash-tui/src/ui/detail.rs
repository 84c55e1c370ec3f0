use super::*;
use dockdash_provider::ResourceStats;

/// Lines of the detail pane for one stats sample
pub(super) fn detail_lines(stats: &ResourceStats) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Gray);

    let memory = if stats.memory_limit > 0 {
        format!(
            "{} MiB / {} MiB",
            stats.memory_mib(),
            stats.memory_limit / (1024 * 1024)
        )
    } else {
        format!("{} MiB", stats.memory_mib())
    };

    vec![
        Line::from(vec![
            Span::styled("Name:      ", label),
            Span::raw(stats.name.clone()),
        ]),
        Line::from(vec![
            Span::styled("CPU:       ", label),
            Span::raw(format!(
                "{:.1}% (kernel {})",
                stats.cpu_percent, stats.cpu_kernel_usage
            )),
        ]),
        Line::from(vec![Span::styled("Memory:    ", label), Span::raw(memory)]),
        Line::from(vec![
            Span::styled("Processes: ", label),
            Span::raw(stats.pids.to_string()),
        ]),
    ]
}

pub(super) fn draw_detail(frame: &mut Frame, view: &DashboardView, area: Rect) {
    // No selection or no sample yet: the pane stays empty
    let lines = view.stats.as_ref().map(detail_lines).unwrap_or_default();
    let paragraph = Paragraph::new(lines).block(pane_block(" Detail "));
    frame.render_widget(paragraph, area);
}
