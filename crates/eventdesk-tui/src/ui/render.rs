use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, LoginFocus, Tab};

use super::styles;
use super::tabs::{activity, dashboard, inventory, terminal, transport};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::LoggingIn) {
        render_login_overlay(frame, app);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("  {}", app.config.event_title());
    let operator = app.desk.operator();
    let who = format!("{} ({})  [?] Help", operator.name, operator.access);
    let title_len = title.chars().count() + who.chars().count();

    let who_style = if operator.is_admin() {
        styles::highlight_style()
    } else {
        styles::muted_style()
    };

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(title_len + 4))),
        Span::styled(who, who_style),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in Tab::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        if *tab == app.current_tab {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Terminal => terminal::render(frame, app, area),
        Tab::Transport => transport::render(frame, app, area),
        Tab::Inventory => inventory::render(frame, app, area),
        Tab::Dashboard => dashboard::render(frame, app, area),
        Tab::Activity => activity::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[S]ave | [L]ogin | [q]uit";

    let (left_text, left_style) = if let Some(ref msg) = app.status_message {
        (format!(" {} ", msg), styles::muted_style())
    } else if app.desk.has_unsaved_changes() {
        (
            " Unsaved changes: press S to retry ".to_string(),
            styles::error_style(),
        )
    } else {
        let age = app.desk.roster_age().unwrap_or_else(|| "never".to_string());
        (format!(" Saved {} ", age), styles::muted_style())
    };

    let right_text = format!(" {} ", shortcuts);
    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(56, 34, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled(
            format!("  EventDesk version {}", version),
            styles::title_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-5", "Switch tabs"),
        help_line("←/→", "Prev/next tab"),
        help_line("↑/↓ PgUp", "Move selection"),
        help_line("L", "Sign in as another operator"),
        help_line("S", "Save everything now"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(" Terminal", styles::highlight_style())),
        help_line("/", "Search by name, ticket or phone"),
        help_line("Enter", "Check in"),
        help_line("k / f", "Toggle kit / meal"),
        help_line("b / x", "Next bus / clear bus"),
        help_line("n", "Edit note"),
        help_line("z", "Undo check-in (admin)"),
        Line::from(""),
        Line::from(Span::styled(" Transport", styles::highlight_style())),
        help_line("g", "Group by role or class"),
        help_line("[ / ]", "Start bus"),
        help_line("s / w", "Lottery / stop when full"),
        help_line("p / a", "Preview / assign"),
        help_line("r", "Clear group's buses (admin)"),
        help_line("Tab", "Next seat map"),
        Line::from(""),
        Line::from(Span::styled(" Inventory / Activity", styles::highlight_style())),
        help_line("+/- [ ]", "Adjust stock by 1 / 10 (admin)"),
        help_line("c", "Clear activity log (admin)"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn field_style(focused: bool) -> Style {
    if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    }
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() { 11 } else { 9 };
    let area = centered_rect_fixed(46, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("  {}", app.config.event_title()),
            styles::title_style(),
        )),
        Line::from(""),
    ];

    let operator_focused = app.login_focus == LoginFocus::Operator;
    let cursor = if operator_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled("Operator: [", styles::muted_style()),
        Span::styled(
            format!("{:<20}{}", app.login_operator, cursor),
            field_style(operator_focused),
        ),
        Span::styled("]", styles::muted_style()),
    ]));

    let passcode_focused = app.login_focus == LoginFocus::Passcode;
    let masked = "*".repeat(app.login_passcode.len().min(20));
    let cursor = if passcode_focused { "▌" } else { "" };
    let field = format!("{:<20}{}", masked, cursor);
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled("Passcode: [", styles::muted_style()),
        Span::styled(field, field_style(passcode_focused)),
        Span::styled("]", styles::muted_style()),
    ]));

    let button_focused = app.login_focus == LoginFocus::Button;
    let label = if button_focused {
        " ▶ Sign in ◀ "
    } else {
        "   Sign in   "
    };
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("             ["),
        Span::styled(label, field_style(button_focused)),
        Span::raw("]"),
    ]));

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style())));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fixed() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect_fixed(46, 10, outer);
        assert_eq!(inner, Rect::new(27, 15, 46, 10));
    }

    #[test]
    fn test_centered_rect_clamps_to_small_terminal() {
        let outer = Rect::new(0, 0, 30, 5);
        let inner = centered_rect_fixed(46, 10, outer);
        assert_eq!(inner.width, 30);
        assert_eq!(inner.height, 5);
    }
}
