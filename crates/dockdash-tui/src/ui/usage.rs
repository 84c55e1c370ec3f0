//! Key binding help pane

use super::*;

/// Key bindings shown in the usage pane
const USAGE: [(&str, &str); 5] = [
    ("<up>/<down>", "Select container"),
    ("C-s", "Stop/Start container"),
    ("C-d", "Delete (force) container"),
    ("r", "Refresh now"),
    ("q", "Exit"),
];

pub(super) fn draw_usage(frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = USAGE
        .iter()
        .map(|(key, help)| {
            Line::from(vec![
                Span::styled(*key, Style::default().fg(Color::Yellow)),
                Span::raw(": "),
                Span::raw(*help),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(pane_block(" Usage ")), area);
}
