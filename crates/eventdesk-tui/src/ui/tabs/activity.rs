use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

/// Render the Activity tab - newest entries first
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let log = app.desk.activity();
    let visible = (area.height as usize).saturating_sub(2);

    let mut lines: Vec<Line> = log
        .entries()
        .iter()
        .skip(app.activity_scroll)
        .take(visible)
        .map(|entry| Line::from(Span::styled(entry.display(), styles::list_item_style())))
        .collect();

    if lines.is_empty() {
        lines.push(Line::from(Span::styled("No activity yet", styles::muted_style())));
    }

    let hint = if app.is_admin() { " - [c]lear " } else { " " };
    let title = format!(" Activity ({}){}", log.len(), hint);

    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
