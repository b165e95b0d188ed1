//! Data models for the event roster.
//!
//! - `Attendee`: one roster row with identity, role, entry, bus and kit fields
//! - `Bus`, `Fleet`, `BusLoad`: the buses and their derived occupancy
//! - `ShirtSize`, `StockLedger`: kit sizes and ordered totals
//! - `cell`: lenient decoding of spreadsheet-style cells

pub mod attendee;
pub mod cell;
pub mod fleet;
pub mod stock;

pub use attendee::{Attendee, BusAssignment, Role, UNASSIGNED_LABEL};
pub use fleet::{Bus, BusLoad, Fleet, FleetLoad, RoleQuota};
pub use stock::{ShirtSize, StockLedger, StockRow};
