use std::fmt;

use crate::models::{Attendee, BusAssignment, Role};
use crate::utils::cmp_ignore_case;

use super::engine::{SeatCandidate, SeatPlan};

/// Which unassigned attendees a bulk assignment targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateFilter {
    Role(Role),
    ClassGroup(String),
}

impl CandidateFilter {
    /// Parse `role=<Role>` or `class=<Class>`
    pub fn parse(raw: &str) -> Option<Self> {
        let (key, value) = raw.split_once('=')?;
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        match key.trim().to_ascii_lowercase().as_str() {
            "role" => Some(CandidateFilter::Role(Role::parse(value))),
            "class" => Some(CandidateFilter::ClassGroup(value.to_string())),
            _ => None,
        }
    }

    pub fn matches(&self, attendee: &Attendee) -> bool {
        match self {
            CandidateFilter::Role(role) => &attendee.role == role,
            CandidateFilter::ClassGroup(class) => attendee.class_group == *class,
        }
    }
}

impl fmt::Display for CandidateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateFilter::Role(role) => write!(f, "role {}", role),
            CandidateFilter::ClassGroup(class) => write!(f, "class {}", class),
        }
    }
}

/// Roster column used to build filter options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Role,
    ClassGroup,
}

impl GroupField {
    pub fn toggle(&self) -> Self {
        match self {
            GroupField::Role => GroupField::ClassGroup,
            GroupField::ClassGroup => GroupField::Role,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GroupField::Role => "Role",
            GroupField::ClassGroup => "Class",
        }
    }

    pub fn filter_for(&self, value: &str) -> CandidateFilter {
        match self {
            GroupField::Role => CandidateFilter::Role(Role::parse(value)),
            GroupField::ClassGroup => CandidateFilter::ClassGroup(value.to_string()),
        }
    }
}

/// Sorted distinct, non-empty values of a roster column
pub fn group_options(attendees: &[Attendee], field: GroupField) -> Vec<String> {
    let mut values: Vec<String> = attendees
        .iter()
        .map(|a| match field {
            GroupField::Role => a.role.label().to_string(),
            GroupField::ClassGroup => a.class_group.clone(),
        })
        .filter(|v| !v.is_empty())
        .collect();
    values.sort_by(|a, b| cmp_ignore_case(a, b).then_with(|| a.cmp(b)));
    values.dedup();
    values
}

/// Unassigned attendees matching `filter`, in roster order
pub fn select_candidates(attendees: &[Attendee], filter: &CandidateFilter) -> Vec<SeatCandidate> {
    attendees
        .iter()
        .filter(|a| !a.bus.is_assigned() && filter.matches(a))
        .map(|a| SeatCandidate::new(a.ticket_number.clone(), a.role.clone()))
        .collect()
}

/// Write a plan's placements onto the roster. Returns how many rows changed.
pub fn apply_plan(attendees: &mut [Attendee], plan: &SeatPlan) -> usize {
    let mut changed = 0;
    for placement in &plan.placements {
        if let Some(attendee) = attendees
            .iter_mut()
            .find(|a| a.ticket_number == placement.candidate_id)
        {
            attendee.bus = BusAssignment::Bus(placement.bus_name.clone());
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Attendee> {
        vec![
            Attendee::new("A", "1", Role::Student).with_class("Class 9"),
            Attendee::new("B", "2", Role::Student)
                .with_class("Class 10")
                .with_bus("Bus 1"),
            Attendee::new("C", "3", Role::Teacher).with_class("Class 9"),
            Attendee::new("D", "4", Role::Student).with_class("Class 10"),
            Attendee::new("E", "5", Role::Volunteer),
        ]
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(
            CandidateFilter::parse("role=student"),
            Some(CandidateFilter::Role(Role::Student))
        );
        assert_eq!(
            CandidateFilter::parse("class= Class 9 "),
            Some(CandidateFilter::ClassGroup("Class 9".to_string()))
        );
        assert_eq!(CandidateFilter::parse("class="), None);
        assert_eq!(CandidateFilter::parse("bus=Bus 1"), None);
        assert_eq!(CandidateFilter::parse("student"), None);
    }

    #[test]
    fn test_select_skips_assigned_and_keeps_order() {
        let ids: Vec<String> = select_candidates(&roster(), &CandidateFilter::Role(Role::Student))
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["1", "4"]);

        let class9 = select_candidates(&roster(), &CandidateFilter::ClassGroup("Class 9".into()));
        assert_eq!(class9.len(), 2);
        assert_eq!(class9[1].role, Role::Teacher);
    }

    #[test]
    fn test_select_with_no_matches_is_empty() {
        let none = select_candidates(&roster(), &CandidateFilter::Role(Role::Organizer));
        assert!(none.is_empty());
    }

    #[test]
    fn test_group_options_sorted_and_distinct() {
        assert_eq!(
            group_options(&roster(), GroupField::ClassGroup),
            vec!["Class 10", "Class 9"]
        );
        assert_eq!(
            group_options(&roster(), GroupField::Role),
            vec!["Student", "Teacher", "Volunteer"]
        );
    }
}
