use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use eventdesk_core::manifest::seat_map;
use eventdesk_core::models::BusLoad;
use eventdesk_core::seating::group_options;

use crate::app::App;
use crate::ui::styles;

const BAR_WIDTH: usize = 20;

/// Render the Transport tab - assignment controls, fleet loads, seat map
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_controls(frame, app, chunks[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_loads(frame, app, right[0]);
    render_seat_map(frame, app, right[1]);
}

/// `████░░░░` style bar for a fill ratio
pub fn fill_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn render_controls(frame: &mut Frame, app: &App, area: Rect) {
    let panel = &app.transport;
    let fleet = &app.desk.context().fleet;
    let groups = group_options(app.desk.roster().attendees(), panel.group_field);

    let mut lines = vec![Line::from(vec![
        Span::styled("Group by: ", styles::muted_style()),
        Span::styled(panel.group_field.label(), styles::highlight_style()),
        Span::styled("  [g] switch", styles::muted_style()),
    ])];
    lines.push(Line::from(""));

    if groups.is_empty() {
        lines.push(Line::from(Span::styled("  No groups on the roster", styles::muted_style())));
    }
    for (i, group) in groups.iter().enumerate() {
        let style = if i == panel.group_selection {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        let marker = if i == panel.group_selection {
            "▶ "
        } else {
            "  "
        };
        lines.push(Line::from(Span::styled(format!("{}{}", marker, group), style)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Options", styles::highlight_style())));

    let start = fleet
        .buses
        .get(panel.start_bus)
        .map(|b| b.name.clone())
        .unwrap_or_else(|| "-".to_string());
    lines.push(Line::from(vec![
        Span::styled("  Start bus:  ", styles::muted_style()),
        Span::raw(start),
        Span::styled("  [ ]", styles::muted_style()),
    ]));
    let order = match panel.seed {
        Some(seed) => format!("lottery (seed {})", seed),
        None => "roster order".to_string(),
    };
    lines.push(Line::from(vec![
        Span::styled("  Order:      ", styles::muted_style()),
        Span::raw(order),
        Span::styled("  [s]", styles::muted_style()),
    ]));
    let overflow = if panel.stop_when_full {
        "stop at first full bus"
    } else {
        "continue to next bus"
    };
    lines.push(Line::from(vec![
        Span::styled("  When full:  ", styles::muted_style()),
        Span::raw(overflow),
        Span::styled("  [w]", styles::muted_style()),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Last plan", styles::highlight_style())));
    match &panel.last_plan {
        Some(plan) => {
            lines.push(Line::from(format!("  {}", plan.summary())));
            for bus in &fleet.buses {
                let placed = plan.placed_on(&bus.name);
                if placed > 0 {
                    lines.push(Line::from(Span::styled(
                        format!("    {}: +{}", bus.name, placed),
                        styles::success_style(),
                    )));
                }
            }
            if !plan.unassigned.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("    No seat: {}", plan.unassigned.join(", ")),
                    styles::error_style(),
                )));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "  [p]review or [a]ssign",
            styles::muted_style(),
        ))),
    }

    let block = Block::default()
        .title(" Seat Assignment ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn load_line(load: &BusLoad, selected: bool) -> Line<'static> {
    let name_style = if selected {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let mut spans = vec![
        Span::styled(format!("{:<8}", load.name), name_style),
        Span::raw(" "),
        Span::styled(
            fill_bar(load.fill_ratio(), BAR_WIDTH),
            styles::fill_style(load.fill_ratio()),
        ),
        Span::raw(format!(" {:>3}/{:<3}", load.occupancy, load.capacity)),
    ];
    if let Some(quota) = &load.quota {
        spans.push(Span::styled(
            format!(" {} {}/{}", quota.role, load.quota_count, quota.limit),
            styles::muted_style(),
        ));
    }
    Line::from(spans)
}

fn render_loads(frame: &mut Frame, app: &App, area: Rect) {
    let fleet_load = app.desk.loads();

    let mut lines: Vec<Line> = fleet_load
        .loads
        .iter()
        .enumerate()
        .map(|(i, load)| load_line(load, i == app.transport.bus_selection))
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Seated: ", styles::muted_style()),
        Span::raw(fleet_load.seated().to_string()),
        Span::styled("  Free: ", styles::muted_style()),
        Span::raw(fleet_load.free_seats().to_string()),
        Span::styled("  Unassigned: ", styles::muted_style()),
        Span::raw(fleet_load.unassigned.to_string()),
    ]));
    if fleet_load.off_fleet > 0 {
        lines.push(Line::from(Span::styled(
            format!("{} riders on buses outside the fleet", fleet_load.off_fleet),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .title(" Fleet ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_seat_map(frame: &mut Frame, app: &App, area: Rect) {
    let fleet_load = app.desk.loads();

    let (title, lines) = match fleet_load.loads.get(app.transport.bus_selection) {
        Some(load) => {
            let mut lines = vec![Line::from(Span::styled("   [ Driver ]", styles::muted_style()))];
            let row_style = styles::list_item_style();
            let rows = seat_map(load)
                .into_iter()
                .map(|row| Line::from(Span::styled(format!("   {}", row), row_style)));
            lines.extend(rows);
            (format!(" {} - [Tab] next bus ", load.name), lines)
        }
        None => (
            " Seat Map ".to_string(),
            vec![Line::from(Span::styled("No buses configured", styles::muted_style()))],
        ),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_bar() {
        assert_eq!(fill_bar(0.0, 4), "░░░░");
        assert_eq!(fill_bar(0.5, 4), "██░░");
        assert_eq!(fill_bar(1.0, 4), "████");
        assert_eq!(fill_bar(3.0, 4), "████");
    }
}
