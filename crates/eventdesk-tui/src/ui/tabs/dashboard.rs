use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use eventdesk_core::roster::RosterMetrics;

use crate::app::{App, RECENT_CHECK_INS};
use crate::ui::styles;
use crate::ui::tabs::transport::fill_bar;

const BAR_WIDTH: usize = 24;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    // Vertical layout:
    // 1. Headline counts (full width)
    // 2. Roles | Recent check-ins (50/50)
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(6)])
        .split(area);

    let metrics = app.desk.metrics();
    render_headline(frame, &metrics, main_chunks[0]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_chunks[1]);

    render_roles(frame, &metrics, bottom[0]);
    render_recent(frame, app, bottom[1]);
}

fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

fn progress_line(label: &'static str, part: usize, total: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<12}", label), styles::muted_style()),
        Span::styled(
            fill_bar(ratio(part, total), BAR_WIDTH),
            styles::success_style(),
        ),
        Span::raw(format!(" {}/{}", part, total)),
    ])
}

fn render_headline(frame: &mut Frame, metrics: &RosterMetrics, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled("Registered: ", styles::muted_style()),
            Span::styled(metrics.total.to_string(), styles::title_style()),
            Span::styled("   Waiting at gate: ", styles::muted_style()),
            Span::styled(
                metrics.pending_entry().to_string(),
                styles::highlight_style(),
            ),
        ]),
        Line::from(""),
        progress_line("Checked in", metrics.checked_in, metrics.total),
        progress_line("Kits given", metrics.kits_given, metrics.total),
        progress_line("Meals", metrics.meals_served, metrics.total),
    ];

    let block = Block::default()
        .title(" Event ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_roles(frame: &mut Frame, metrics: &RosterMetrics, area: Rect) {
    let mut lines: Vec<Line> = metrics
        .by_role
        .iter()
        .map(|(role, count)| {
            Line::from(vec![
                Span::styled(format!("{:<14}", role), styles::highlight_style()),
                Span::raw(count.to_string()),
            ])
        })
        .collect();

    if lines.is_empty() {
        lines.push(Line::from(Span::styled("No attendees yet", styles::muted_style())));
    }

    let block = Block::default()
        .title(" By Role ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_recent(frame: &mut Frame, app: &App, area: Rect) {
    let recent = app.desk.roster().recent_check_ins(RECENT_CHECK_INS);

    let mut lines: Vec<Line> = recent
        .iter()
        .map(|a| {
            Line::from(vec![
                Span::styled(
                    format!("{} ", a.entry_time.as_deref().unwrap_or("--:--:--")),
                    styles::muted_style(),
                ),
                Span::raw(a.display_name()),
                Span::styled(format!("  {}", a.role), styles::muted_style()),
            ])
        })
        .collect();

    if lines.is_empty() {
        lines.push(Line::from(Span::styled("Nobody checked in yet", styles::muted_style())));
    }

    let block = Block::default()
        .title(" Recent Check-ins ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_handles_empty_roster() {
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(ratio(1, 4), 0.25);
    }
}
