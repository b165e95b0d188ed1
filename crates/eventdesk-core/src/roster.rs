//! The event roster and its row-level operations.
//!
//! `Roster` owns the attendee rows. Lookups are by ticket number, which is
//! unique within a roster. Operations here are pure state changes; logging
//! of who did what and persistence live in `desk`.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::error::{DeskError, DeskResult};
use crate::models::{Attendee, BusAssignment, Role};
use crate::utils::contains_ignore_case;

/// Entry time format written to the roster
pub const ENTRY_TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    attendees: Vec<Attendee>,
}

/// Outcome of a bulk import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ImportReport {
    pub added: usize,
    /// Rows whose ticket was empty or already on the roster
    pub skipped: usize,
}

/// Headline counts for the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RosterMetrics {
    pub total: usize,
    pub checked_in: usize,
    pub kits_given: usize,
    pub meals_served: usize,
    pub by_role: BTreeMap<String, usize>,
}

impl RosterMetrics {
    pub fn pending_entry(&self) -> usize {
        self.total - self.checked_in
    }
}

impl Roster {
    pub fn new(attendees: Vec<Attendee>) -> Self {
        Self { attendees }
    }

    pub fn attendees(&self) -> &[Attendee] {
        &self.attendees
    }

    pub fn attendees_mut(&mut self) -> &mut [Attendee] {
        &mut self.attendees
    }

    pub fn len(&self) -> usize {
        self.attendees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attendees.is_empty()
    }

    pub fn find(&self, ticket: &str) -> Option<&Attendee> {
        let ticket = ticket.trim();
        self.attendees.iter().find(|a| a.ticket_number == ticket)
    }

    pub fn get(&self, ticket: &str) -> DeskResult<&Attendee> {
        self.find(ticket)
            .ok_or_else(|| DeskError::NotFound(ticket.trim().to_string()))
    }

    fn get_mut(&mut self, ticket: &str) -> DeskResult<&mut Attendee> {
        let ticket = ticket.trim();
        self.attendees
            .iter_mut()
            .find(|a| a.ticket_number == ticket)
            .ok_or_else(|| DeskError::NotFound(ticket.to_string()))
    }

    /// Check if an attendee matches the search query.
    /// Query should already be lowercased.
    fn matches_search(attendee: &Attendee, query: &str) -> bool {
        contains_ignore_case(&attendee.name, query)
            || contains_ignore_case(&attendee.ticket_number, query)
            || contains_ignore_case(&attendee.phone, query)
    }

    /// Desk lookup by name, ticket or phone. An empty query finds nobody.
    pub fn search(&self, query: &str) -> Vec<&Attendee> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.attendees
            .iter()
            .filter(|a| Self::matches_search(a, &query))
            .collect()
    }

    /// List view filter. An empty query keeps everyone.
    pub fn filter(&self, query: &str) -> Vec<&Attendee> {
        if query.trim().is_empty() {
            self.attendees.iter().collect()
        } else {
            self.search(query)
        }
    }

    /// Mark an attendee as entered at `time`
    pub fn check_in(&mut self, ticket: &str, time: &str) -> DeskResult<&Attendee> {
        let attendee = self.get_mut(ticket)?;
        if attendee.checked_in {
            return Err(DeskError::AlreadyCheckedIn {
                name: attendee.display_name(),
                time: attendee
                    .entry_time
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
            });
        }
        attendee.checked_in = true;
        attendee.entry_time = Some(time.to_string());
        Ok(&*attendee)
    }

    pub fn undo_check_in(&mut self, ticket: &str) -> DeskResult<&Attendee> {
        let attendee = self.get_mut(ticket)?;
        attendee.checked_in = false;
        attendee.entry_time = None;
        Ok(&*attendee)
    }

    /// Flip the meal flag. Returns the new value.
    pub fn toggle_food(&mut self, ticket: &str) -> DeskResult<bool> {
        let attendee = self.get_mut(ticket)?;
        attendee.food_collected = !attendee.food_collected;
        Ok(attendee.food_collected)
    }

    /// Set the kit flag directly. Stock checks happen in `inventory`.
    pub fn set_kit_collected(&mut self, ticket: &str, collected: bool) -> DeskResult<()> {
        self.get_mut(ticket)?.shirt_collected = collected;
        Ok(())
    }

    pub fn set_note(&mut self, ticket: &str, note: &str) -> DeskResult<()> {
        self.get_mut(ticket)?.notes = note.trim().to_string();
        Ok(())
    }

    pub fn report_fault(&mut self, ticket: &str, report: &str) -> DeskResult<()> {
        self.get_mut(ticket)?.fault_report = report.trim().to_string();
        Ok(())
    }

    pub fn set_bus(&mut self, ticket: &str, bus: BusAssignment) -> DeskResult<()> {
        self.get_mut(ticket)?.bus = bus;
        Ok(())
    }

    /// Register one attendee. Tickets must be non-empty and unique.
    pub fn add(&mut self, mut attendee: Attendee) -> DeskResult<()> {
        attendee.ticket_number = attendee.ticket_number.trim().to_string();
        if attendee.ticket_number.is_empty() {
            return Err(DeskError::EmptyTicket);
        }
        if self.find(&attendee.ticket_number).is_some() {
            return Err(DeskError::DuplicateTicket(attendee.ticket_number));
        }
        self.attendees.push(attendee);
        Ok(())
    }

    /// Append imported rows, skipping empty and duplicate tickets
    pub fn import(&mut self, rows: Vec<Attendee>) -> ImportReport {
        let mut seen: HashSet<String> = self
            .attendees
            .iter()
            .map(|a| a.ticket_number.clone())
            .collect();
        let mut report = ImportReport::default();

        for mut row in rows {
            row.ticket_number = row.ticket_number.trim().to_string();
            if row.ticket_number.is_empty() || !seen.insert(row.ticket_number.clone()) {
                report.skipped += 1;
                continue;
            }
            self.attendees.push(row);
            report.added += 1;
        }
        report
    }

    /// Clear the bus of every attendee matching the predicate. Returns how many changed.
    pub fn clear_buses<F>(&mut self, mut matches: F) -> usize
    where
        F: FnMut(&Attendee) -> bool,
    {
        let mut cleared = 0;
        for attendee in self.attendees.iter_mut() {
            if attendee.bus.is_assigned() && matches(&*attendee) {
                attendee.bus = BusAssignment::Unassigned;
                cleared += 1;
            }
        }
        cleared
    }

    pub fn metrics(&self) -> RosterMetrics {
        let mut metrics = RosterMetrics {
            total: self.attendees.len(),
            ..Default::default()
        };
        for a in &self.attendees {
            if a.checked_in {
                metrics.checked_in += 1;
            }
            if a.shirt_collected {
                metrics.kits_given += 1;
            }
            if a.food_collected {
                metrics.meals_served += 1;
            }
            let role = a.role.label().to_string();
            *metrics.by_role.entry(role).or_insert(0) += 1;
        }
        metrics
    }

    /// Most recent check-ins first
    pub fn recent_check_ins(&self, limit: usize) -> Vec<&Attendee> {
        let mut entered: Vec<&Attendee> = self.attendees.iter().filter(|a| a.checked_in).collect();
        // HH:MM:SS sorts lexically; rows without a time go last
        entered.sort_by(|a, b| b.entry_time.cmp(&a.entry_time));
        entered.truncate(limit);
        entered
    }

    pub fn with_role<'a>(&'a self, role: &'a Role) -> impl Iterator<Item = &'a Attendee> + 'a {
        self.attendees.iter().filter(move |a| &a.role == role)
    }

    /// Riders of one bus in roster order
    pub fn on_bus<'a>(&'a self, bus: &'a str) -> impl Iterator<Item = &'a Attendee> + 'a {
        self.attendees.iter().filter(move |a| a.bus.is_on(bus))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShirtSize;

    fn sample() -> Roster {
        Roster::new(vec![
            Attendee::new("Rahim Uddin", "1001", Role::Student).with_phone("01712345678"),
            Attendee::new("Karima Begum", "1002", Role::Teacher).with_phone("01898765432"),
            Attendee::new("Tanvir Ahmed", "1003", Role::Volunteer),
        ])
    }

    #[test]
    fn test_search_by_name_ticket_phone() {
        let roster = sample();
        assert_eq!(roster.search("rahim").len(), 1);
        assert_eq!(roster.search("100").len(), 3);
        assert_eq!(roster.search("1002")[0].name, "Karima Begum");
        assert_eq!(roster.search("0189")[0].ticket_number, "1002");
        assert!(roster.search("nobody").is_empty());
    }

    #[test]
    fn test_empty_search_finds_nobody_but_filter_keeps_all() {
        let roster = sample();
        assert!(roster.search("  ").is_empty());
        assert_eq!(roster.filter("").len(), 3);
    }

    #[test]
    fn test_check_in_sets_time_and_rejects_repeat() {
        let mut roster = sample();
        let entered = roster.check_in("1001", "09:15:00").unwrap();
        assert!(entered.checked_in);
        assert_eq!(entered.entry_time.as_deref(), Some("09:15:00"));

        match roster.check_in("1001", "09:20:00") {
            Err(DeskError::AlreadyCheckedIn { time, .. }) => assert_eq!(time, "09:15:00"),
            other => panic!("unexpected: {:?}", other),
        }

        roster.undo_check_in("1001").unwrap();
        assert!(!roster.find("1001").unwrap().checked_in);
        assert!(roster.find("1001").unwrap().entry_time.is_none());
    }

    #[test]
    fn test_unknown_ticket_is_not_found() {
        let mut roster = sample();
        assert!(matches!(
            roster.check_in("9999", "10:00:00"),
            Err(DeskError::NotFound(t)) if t == "9999"
        ));
        assert!(matches!(roster.toggle_food("9999"), Err(DeskError::NotFound(_))));
    }

    #[test]
    fn test_add_rejects_empty_and_duplicate_tickets() {
        let mut roster = sample();
        assert!(matches!(
            roster.add(Attendee::new("X", "  ", Role::Guest)),
            Err(DeskError::EmptyTicket)
        ));
        assert!(matches!(
            roster.add(Attendee::new("X", "1002", Role::Guest)),
            Err(DeskError::DuplicateTicket(t)) if t == "1002"
        ));
        let padded = Attendee::new("X", " 2001 ", Role::Guest);
        roster.add(padded).unwrap();
        assert!(roster.find("2001").is_some());
    }

    #[test]
    fn test_import_skips_duplicates_within_and_across_batches() {
        let mut roster = sample();
        let report = roster.import(vec![
            Attendee::new("New A", "2001", Role::Student),
            Attendee::new("Dup of existing", "1001", Role::Student),
            Attendee::new("New B", "2002", Role::Student),
            Attendee::new("Dup in batch", "2001", Role::Student),
            Attendee::new("No ticket", "", Role::Student),
        ]);
        assert_eq!(report.added, 2);
        assert_eq!(report.skipped, 3);
        assert_eq!(roster.len(), 5);
    }

    #[test]
    fn test_toggle_food_and_notes() {
        let mut roster = sample();
        assert!(roster.toggle_food("1003").unwrap());
        assert!(!roster.toggle_food("1003").unwrap());
        roster.set_note("1003", "  allergic to nuts ").unwrap();
        assert_eq!(roster.find("1003").unwrap().notes, "allergic to nuts");
        roster.report_fault("1003", "Wrong bus").unwrap();
        assert_eq!(roster.find("1003").unwrap().fault_report, "Wrong bus");
    }

    #[test]
    fn test_metrics() {
        let mut roster = sample();
        roster.check_in("1001", "09:00:00").unwrap();
        roster.attendees_mut()[1].shirt_size = Some(ShirtSize::M);
        roster.set_kit_collected("1002", true).unwrap();
        roster.toggle_food("1003").unwrap();

        let m = roster.metrics();
        assert_eq!(m.total, 3);
        assert_eq!(m.checked_in, 1);
        assert_eq!(m.pending_entry(), 2);
        assert_eq!(m.kits_given, 1);
        assert_eq!(m.meals_served, 1);
        assert_eq!(m.by_role.get("Teacher"), Some(&1));
    }

    #[test]
    fn test_recent_check_ins_newest_first() {
        let mut roster = sample();
        roster.check_in("1002", "09:00:00").unwrap();
        roster.check_in("1001", "10:30:00").unwrap();
        roster.check_in("1003", "08:45:10").unwrap();
        let recent: Vec<&str> = roster
            .recent_check_ins(2)
            .iter()
            .map(|a| a.ticket_number.as_str())
            .collect();
        assert_eq!(recent, vec!["1001", "1002"]);
    }

    #[test]
    fn test_clear_buses_by_predicate() {
        let mut roster = sample();
        let bus = BusAssignment::Bus("Bus 1".into());
        roster.set_bus("1001", bus.clone()).unwrap();
        roster.set_bus("1002", bus).unwrap();
        let cleared = roster.clear_buses(|a| a.role == Role::Student);
        assert_eq!(cleared, 1);
        assert_eq!(roster.on_bus("Bus 1").count(), 1);
        assert_eq!(roster.with_role(&Role::Teacher).count(), 1);
    }
}
