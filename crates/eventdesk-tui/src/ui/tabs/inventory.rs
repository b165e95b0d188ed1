use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

/// Render the Inventory tab - T-shirt stock per size
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(9), Constraint::Length(5)])
        .split(area);

    render_stock_table(frame, app, chunks[0]);
    render_hints(frame, app, chunks[1]);
}

fn render_stock_table(frame: &mut Frame, app: &App, area: Rect) {
    let summary = app.desk.stock_summary();

    let header = Row::new([
        Cell::from("Size"),
        Cell::from("Ordered"),
        Cell::from("Given"),
        Cell::from("Left"),
        Cell::from(""),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = summary
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let style = if i == app.stock_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            let (flag, flag_style) = if line.is_over_issued() {
                ("OVER-ISSUED", styles::error_style())
            } else if line.is_empty() {
                ("OUT", styles::highlight_style())
            } else {
                ("", styles::muted_style())
            };
            Row::new(vec![
                Cell::from(line.size.label()),
                Cell::from(format!("{:>7}", line.ordered)),
                Cell::from(format!("{:>5}", line.collected)),
                Cell::from(format!("{:>4}", line.remaining)),
                Cell::from(Span::styled(flag, flag_style)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Length(7),
        Constraint::Length(6),
        Constraint::Fill(1),
    ];

    let ordered: u32 = summary.iter().map(|l| l.ordered).sum();
    let given: u32 = summary.iter().map(|l| l.collected).sum();
    let title = format!(" T-Shirt Stock ({} ordered, {} given) ", ordered, given);

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.stock_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_hints(frame: &mut Frame, app: &App, area: Rect) {
    let lines = if app.is_admin() {
        vec![
            Line::from(vec![
                Span::styled("  +/-  ", styles::help_key_style()),
                Span::styled("Adjust ordered quantity by 1", styles::help_desc_style()),
            ]),
            Line::from(vec![
                Span::styled("  ]/[  ", styles::help_key_style()),
                Span::styled("Adjust ordered quantity by 10", styles::help_desc_style()),
            ]),
        ]
    } else {
        vec![Line::from(Span::styled(
            "  Stock changes need an admin sign-in ([L])",
            styles::muted_style(),
        ))]
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
