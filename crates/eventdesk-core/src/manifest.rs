//! Bus manifests for printing and for the terminal.
//!
//! Riders are grouped by bus in fleet order. Riders on a bus name the fleet
//! does not know are listed after the fleet so nobody drops off the sheet.
//! Buses with no riders are left out.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::models::{Attendee, BusLoad, Fleet};
use crate::utils::truncate_string;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManifestStyle {
    /// Name, phone and class per rider
    #[default]
    PassengerList,
    /// Boarding sheet with blank in/out signature columns, one bus per page
    SignatureSheet,
}

/// Riders of one bus, in roster order
#[derive(Debug, Clone)]
pub struct BusManifest<'a> {
    pub bus: String,
    pub capacity: Option<u32>,
    pub riders: Vec<&'a Attendee>,
}

pub fn group_by_bus<'a>(fleet: &Fleet, attendees: &'a [Attendee]) -> Vec<BusManifest<'a>> {
    let mut groups: Vec<BusManifest<'a>> = fleet
        .buses
        .iter()
        .map(|b| BusManifest {
            bus: b.name.clone(),
            capacity: Some(b.capacity),
            riders: Vec::new(),
        })
        .collect();

    for attendee in attendees {
        let Some(name) = attendee.bus.bus_name() else {
            continue;
        };
        match groups.iter().position(|g| g.bus == name) {
            Some(i) => groups[i].riders.push(attendee),
            None => groups.push(BusManifest {
                bus: name.to_string(),
                capacity: None,
                riders: vec![attendee],
            }),
        }
    }

    groups.retain(|g| !g.riders.is_empty());
    groups
}

const CSS: &str = r#"
body { font-family: sans-serif; margin: 24px; }
h1 { font-size: 20px; margin-bottom: 4px; }
h2 { font-size: 16px; margin: 24px 0 8px; }
h2 small { font-weight: normal; color: #555; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #999; padding: 4px 6px; font-size: 12px; text-align: left; }
th { background: #eee; }
td.sign { width: 90px; }
.page-break { page-break-after: always; }
"#;

/// Printable HTML manifest
pub fn render_html(
    title: &str,
    fleet: &Fleet,
    attendees: &[Attendee],
    style: ManifestStyle,
) -> String {
    let groups = group_by_bus(fleet, attendees);
    let heading = match style {
        ManifestStyle::PassengerList => "Bus Manifest",
        ManifestStyle::SignatureSheet => "Boarding Sheet",
    };

    let page: Markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { (title) " - " (heading) }
                style { (PreEscaped(CSS)) }
            }
            body {
                h1 { (title) " - " (heading) }
                @if groups.is_empty() {
                    p.empty { "No riders assigned to any bus." }
                }
                @for (i, group) in groups.iter().enumerate() {
                    section.bus {
                        h2 {
                            (group.bus) " "
                            small { (bus_count_label(group)) }
                        }
                        @match style {
                            ManifestStyle::PassengerList => { (passenger_table(&group.riders)) }
                            ManifestStyle::SignatureSheet => { (signature_table(&group.riders)) }
                        }
                    }
                    @if style == ManifestStyle::SignatureSheet && i + 1 < groups.len() {
                        div.page-break {}
                    }
                }
            }
        }
    };
    page.into_string()
}

fn bus_count_label(group: &BusManifest<'_>) -> String {
    match group.capacity {
        Some(capacity) => format!("({}/{} seats)", group.riders.len(), capacity),
        None => format!("({} riders, not in fleet)", group.riders.len()),
    }
}

fn passenger_table(riders: &[&Attendee]) -> Markup {
    html! {
        table {
            thead { tr { th { "Name" } th { "Phone" } th { "Class" } } }
            tbody {
                @for rider in riders {
                    tr {
                        td { (rider.display_name()) }
                        td { (rider.phone_display()) }
                        td { (rider.class_display()) }
                    }
                }
            }
        }
    }
}

fn signature_table(riders: &[&Attendee]) -> Markup {
    html! {
        table {
            thead {
                tr {
                    th { "Sl." } th { "Name" } th { "Role" } th { "Class" }
                    th { "Ticket" } th { "Phone" } th { "In Sign" } th { "Out Sign" }
                }
            }
            tbody {
                @for (i, rider) in riders.iter().enumerate() {
                    tr {
                        td { (i + 1) }
                        td { (rider.display_name()) }
                        td { (rider.role.label()) }
                        td { (rider.class_display()) }
                        td { (rider.ticket_number) }
                        td { (rider.phone_display()) }
                        td.sign {}
                        td.sign {}
                    }
                }
            }
        }
    }
}

/// Plain-text manifest for the terminal
pub fn render_text(fleet: &Fleet, attendees: &[Attendee], style: ManifestStyle) -> String {
    let mut out = String::new();
    for group in group_by_bus(fleet, attendees) {
        out.push_str(&format!("{} {}\n", group.bus, bus_count_label(&group)));
        for (i, rider) in group.riders.iter().enumerate() {
            let line = match style {
                ManifestStyle::PassengerList => format!(
                    "{:>3}. {:<28} {:<14} {}",
                    i + 1,
                    truncate_string(&rider.display_name(), 28),
                    rider.phone_display(),
                    rider.class_display()
                ),
                ManifestStyle::SignatureSheet => format!(
                    "{:>3}. {:<28} {:<10} {:<10} {:<8} {:<14} In: ______  Out: ______",
                    i + 1,
                    truncate_string(&rider.display_name(), 28),
                    truncate_string(rider.role.label(), 10),
                    truncate_string(rider.class_display(), 10),
                    rider.ticket_number,
                    rider.phone_display()
                ),
            };
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

const SEATS_PER_ROW: usize = 4;

/// Interior view of a bus: four seats per row split by the aisle,
/// `●` taken and `○` free.
pub fn seat_map(load: &BusLoad) -> Vec<String> {
    let seats: Vec<&str> = (0..load.capacity)
        .map(|i| if i < load.occupancy { "●" } else { "○" })
        .collect();

    seats
        .chunks(SEATS_PER_ROW)
        .map(|row| {
            let split = row.len().min(SEATS_PER_ROW / 2);
            let left = row[..split].join(" ");
            let right = row[split..].join(" ");
            if right.is_empty() {
                left
            } else {
                format!("{}   {}", left, right)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bus, Role};

    fn fleet() -> Fleet {
        Fleet::uniform(["Bus 1", "Bus 2", "Bus 3"], 45, None)
    }

    fn roster() -> Vec<Attendee> {
        vec![
            Attendee::new("Rahim", "1001", Role::Student)
                .with_class("Class 9")
                .with_phone("01712345678")
                .with_bus("Bus 1"),
            Attendee::new("Karima", "1002", Role::Teacher).with_bus("Bus 3"),
            Attendee::new("Tanvir", "1003", Role::Volunteer),
            Attendee::new("Mita", "1004", Role::Student).with_bus("Bus 1"),
            Attendee::new("Driver", "1005", Role::Guest).with_bus("Van"),
        ]
    }

    #[test]
    fn test_group_by_bus_omits_empty_and_keeps_strays() {
        let roster = roster();
        let groups = group_by_bus(&fleet(), &roster);
        let names: Vec<&str> = groups.iter().map(|g| g.bus.as_str()).collect();
        assert_eq!(names, vec!["Bus 1", "Bus 3", "Van"]);
        assert_eq!(groups[0].riders.len(), 2);
        assert_eq!(groups[0].riders[1].name, "Mita");
        assert_eq!(groups[2].capacity, None);
    }

    #[test]
    fn test_passenger_list_html() {
        let style = ManifestStyle::PassengerList;
        let html = render_html("Science Fair", &fleet(), &roster(), style);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Science Fair - Bus Manifest"));
        assert!(html.contains("<td>01712-345678</td>"));
        assert!(html.contains("(2/45 seats)"));
        assert!(!html.contains("Bus 2"));
        assert!(!html.contains("Tanvir"));
        assert!(!html.contains("class=\"page-break\""));
    }

    #[test]
    fn test_signature_sheet_has_page_breaks_between_buses() {
        let style = ManifestStyle::SignatureSheet;
        let html = render_html("Picnic", &fleet(), &roster(), style);
        assert!(html.contains("<th>In Sign</th><th>Out Sign</th>"));
        assert_eq!(html.matches("class=\"page-break\"").count(), 2);
        assert_eq!(html.matches("<td class=\"sign\"></td>").count(), 8);
    }

    #[test]
    fn test_html_escapes_text() {
        let roster = vec![Attendee::new("<script>alert(1)</script>", "1", Role::Student)
            .with_class("A & B")
            .with_bus("Bus 1")];
        let style = ManifestStyle::SignatureSheet;
        let html = render_html("Fair <2026>", &fleet(), &roster, style);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("A &amp; B"));
        assert!(html.contains("Fair &lt;2026&gt;"));
    }

    #[test]
    fn test_empty_manifest() {
        let style = ManifestStyle::PassengerList;
        let html = render_html("Fair", &fleet(), &[], style);
        assert!(html.contains("No riders assigned"));
        assert_eq!(render_text(&fleet(), &[], style), "");
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&fleet(), &roster(), ManifestStyle::PassengerList);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Bus 1 (2/45 seats)");
        assert!(lines[1].starts_with("  1. Rahim"));
        assert!(lines[1].contains("01712-345678"));
        assert!(lines[1].ends_with("Class 9"));
        assert!(text.contains("Van (1 riders, not in fleet)"));

        let sheet = render_text(&fleet(), &roster(), ManifestStyle::SignatureSheet);
        assert!(sheet.contains("In: ______  Out: ______"));
    }

    #[test]
    fn test_seat_map() {
        let mut load = BusLoad::empty(&Bus::new("Bus 1", 6));
        for _ in 0..3 {
            load.add_rider(&Role::Student);
        }
        assert_eq!(seat_map(&load), vec!["● ●   ● ○", "○ ○"]);

        let full = BusLoad::empty(&Bus::new("Van", 0));
        assert!(seat_map(&full).is_empty());
    }
}
