use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use eventdesk_core::models::Attendee;
use eventdesk_core::utils::{format_phone, truncate_string};

use crate::app::{App, AppState};
use crate::ui::styles;

/// Render the Terminal tab - search on the left, attendee card on the right
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(chunks[0]);

    render_search_box(frame, app, left[0]);
    render_results(frame, app, left[1]);
    render_attendee_card(frame, app, chunks[1]);
}

fn render_search_box(frame: &mut Frame, app: &App, area: Rect) {
    let searching = app.state == AppState::Searching;
    let cursor = if searching { "▌" } else { "" };

    let line = if app.search_query.is_empty() && !searching {
        Line::from(Span::styled(
            "Press / to search by name, ticket or phone",
            styles::muted_style(),
        ))
    } else {
        let query = format!("{}{}", app.search_query, cursor);
        Line::from(vec![
            Span::styled("/ ", styles::muted_style()),
            Span::styled(query, styles::search_style()),
        ])
    };

    let block = Block::default()
        .title(" Search ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(searching));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let results = app.search_results();

    let header = Row::new([
        Cell::from("Name"),
        Cell::from("Ticket"),
        Cell::from("Role"),
        Cell::from("Bus"),
        Cell::from("Entry"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = results
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let style = if i == app.terminal_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            let entry = if a.checked_in { "✓" } else { "" };
            Row::new(vec![
                Cell::from(a.display_name()),
                Cell::from(a.ticket_number.clone()),
                Cell::from(a.role.to_string()),
                Cell::from(a.bus.to_string()),
                Cell::from(Span::styled(entry, styles::entry_style(a.checked_in))),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(38),
        Constraint::Length(10),
        Constraint::Fill(1),
        Constraint::Length(11),
        Constraint::Length(5),
    ];

    let total = app.desk.roster().len();
    let title = format!(" Matches ({} of {}) ", results.len(), total);

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(app.state == AppState::Normal)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !results.is_empty() {
        state.select(Some(app.terminal_selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn labeled(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![Span::styled(label, styles::muted_style()), Span::raw(value)])
}

fn card_lines(app: &App, a: &Attendee, width: usize) -> Vec<Line<'static>> {
    let placeholder = "-".to_string();
    let meal = if a.food_collected {
        "served"
    } else {
        "pending"
    };
    let mut lines = vec![
        Line::from(Span::styled(a.display_name(), styles::title_style())),
        Line::from(Span::styled(a.entry_label(), styles::entry_style(a.checked_in))),
        Line::from(""),
        labeled("Ticket:   ", a.ticket_number.clone()),
        labeled("Role:     ", a.role.to_string()),
        labeled("Class:    ", a.class_display().to_string()),
        labeled(
            "Roll:     ",
            if a.roll.is_empty() {
                placeholder.clone()
            } else {
                a.roll.clone()
            },
        ),
        labeled("Phone:    ", a.phone_display()),
        labeled(
            "Guardian: ",
            if a.guardian_phone.is_empty() {
                placeholder.clone()
            } else {
                format_phone(&a.guardian_phone)
            },
        ),
        Line::from(""),
        Line::from(Span::styled("Event", styles::highlight_style())),
        labeled(
            "Entered:  ",
            a.entry_time.clone().unwrap_or_else(|| placeholder.clone()),
        ),
        labeled("Bus:      ", a.bus.to_string()),
        labeled("T-Shirt:  ", a.shirt_label()),
        labeled("Meal:     ", meal.to_string()),
        Line::from(""),
        Line::from(Span::styled("Notes", styles::highlight_style())),
    ];

    if app.state == AppState::EditingNote {
        lines.push(Line::from(Span::styled(
            format!("{}▌", app.note_input),
            styles::search_style(),
        )));
        lines.push(Line::from(Span::styled("Enter to save, Esc to cancel", styles::muted_style())));
    } else if a.notes.is_empty() {
        lines.push(Line::from(Span::styled("(none)", styles::muted_style())));
    } else {
        lines.push(Line::from(a.notes.clone()));
    }

    if !a.fault_report.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Reported fault", styles::error_style())));
        lines.push(Line::from(truncate_string(&a.fault_report, width.max(8))));
    }
    lines
}

fn render_attendee_card(frame: &mut Frame, app: &App, area: Rect) {
    let results = app.search_results();
    let width = (area.width as usize).saturating_sub(4);

    let content = match results.get(app.terminal_selection) {
        Some(a) => card_lines(app, a, width),
        None => vec![Line::from(Span::styled("No attendee selected", styles::muted_style()))],
    };

    let block = Block::default()
        .title(" [Enter] check in  [k]it  [f]ood  [b]us  [n]ote ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
