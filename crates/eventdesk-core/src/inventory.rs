//! T-shirt stock reconciliation.
//!
//! Only the ordered total per size is stored. Remaining stock is always
//! derived from the roster as `ordered - collected`, so it can never drift
//! from the kit flags.

use serde::Serialize;

use crate::error::{DeskError, DeskResult};
use crate::models::{Attendee, ShirtSize, StockLedger};
use crate::roster::Roster;

/// Kits handed out for one size
pub fn collected(attendees: &[Attendee], size: ShirtSize) -> u32 {
    attendees
        .iter()
        .filter(|a| a.shirt_size == Some(size) && a.shirt_collected)
        .count() as u32
}

/// Remaining stock for one size. Negative when totals were lowered below
/// what has already been handed out.
pub fn remaining(ledger: &StockLedger, attendees: &[Attendee], size: ShirtSize) -> i64 {
    ledger.total_ordered(size) as i64 - collected(attendees, size) as i64
}

/// Stock position of one size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockLine {
    pub size: ShirtSize,
    pub ordered: u32,
    pub collected: u32,
    pub remaining: i64,
}

impl StockLine {
    pub fn is_over_issued(&self) -> bool {
        self.remaining < 0
    }

    pub fn is_empty(&self) -> bool {
        self.remaining <= 0
    }
}

/// One line per size, in size order
pub fn stock_summary(ledger: &StockLedger, attendees: &[Attendee]) -> Vec<StockLine> {
    ShirtSize::ALL
        .iter()
        .map(|&size| {
            let ordered = ledger.total_ordered(size);
            let given = collected(attendees, size);
            StockLine {
                size,
                ordered,
                collected: given,
                remaining: ordered as i64 - given as i64,
            }
        })
        .collect()
}

/// Flip the kit flag for one attendee.
///
/// Handing out a kit needs a recorded size with stock left. Taking a kit
/// back is always allowed. Returns the new flag value.
pub fn toggle_kit(roster: &mut Roster, ledger: &StockLedger, ticket: &str) -> DeskResult<bool> {
    let attendee = roster.get(ticket)?;

    if attendee.shirt_collected {
        roster.set_kit_collected(ticket, false)?;
        return Ok(false);
    }

    let size = attendee
        .shirt_size
        .ok_or_else(|| DeskError::MissingShirtSize(attendee.ticket_number.clone()))?;

    if remaining(ledger, roster.attendees(), size) <= 0 {
        return Err(DeskError::OutOfStock { size });
    }

    roster.set_kit_collected(ticket, true)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn roster_with_m_kits(total: usize, collected: usize) -> Roster {
        let attendees = (0..total)
            .map(|i| {
                let mut a = Attendee::new(format!("P{}", i), format!("{}", 1000 + i), Role::Student)
                    .with_shirt(ShirtSize::M);
                a.shirt_collected = i < collected;
                a
            })
            .collect();
        Roster::new(attendees)
    }

    #[test]
    fn test_remaining_is_ordered_minus_collected() {
        let mut ledger = StockLedger::default();
        ledger.set_total(ShirtSize::M, 100);
        let mut roster = roster_with_m_kits(40, 30);
        assert_eq!(remaining(&ledger, roster.attendees(), ShirtSize::M), 70);

        assert!(toggle_kit(&mut roster, &ledger, "1035").unwrap());
        assert_eq!(remaining(&ledger, roster.attendees(), ShirtSize::M), 69);

        assert!(!toggle_kit(&mut roster, &ledger, "1035").unwrap());
        assert_eq!(remaining(&ledger, roster.attendees(), ShirtSize::M), 70);
    }

    #[test]
    fn test_toggle_rejected_when_out_of_stock() {
        let mut ledger = StockLedger::default();
        ledger.set_total(ShirtSize::M, 2);
        let mut roster = roster_with_m_kits(3, 2);
        match toggle_kit(&mut roster, &ledger, "1002") {
            Err(DeskError::OutOfStock { size }) => assert_eq!(size, ShirtSize::M),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(!roster.find("1002").unwrap().shirt_collected);
    }

    #[test]
    fn test_take_back_allowed_even_when_over_issued() {
        let mut ledger = StockLedger::default();
        ledger.set_total(ShirtSize::M, 1);
        let mut roster = roster_with_m_kits(3, 3);
        assert_eq!(remaining(&ledger, roster.attendees(), ShirtSize::M), -2);
        assert!(!toggle_kit(&mut roster, &ledger, "1000").unwrap());
        assert_eq!(remaining(&ledger, roster.attendees(), ShirtSize::M), -1);
    }

    #[test]
    fn test_toggle_without_size_is_rejected() {
        let mut ledger = StockLedger::default();
        ledger.set_total(ShirtSize::L, 10);
        let mut roster = Roster::new(vec![Attendee::new("No size", "1", Role::Guest)]);
        assert!(matches!(
            toggle_kit(&mut roster, &ledger, "1"),
            Err(DeskError::MissingShirtSize(t)) if t == "1"
        ));
    }

    #[test]
    fn test_summary_flags_over_issue() {
        let mut ledger = StockLedger::default();
        ledger.set_total(ShirtSize::M, 1);
        ledger.set_total(ShirtSize::S, 5);
        let roster = roster_with_m_kits(2, 2);
        let summary = stock_summary(&ledger, roster.attendees());
        assert_eq!(summary.len(), 5);
        let s = summary[0];
        assert_eq!((s.ordered, s.collected, s.remaining), (5, 0, 5));
        let m = summary[1];
        assert_eq!((m.ordered, m.collected, m.remaining), (1, 2, -1));
        assert!(m.is_over_issued());
        assert!(summary[4].is_empty());
    }
}
