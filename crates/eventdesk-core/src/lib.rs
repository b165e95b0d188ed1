//! Core library for EventDesk.
//!
//! EventDesk runs the front desk of a one-day event: attendee check-in,
//! bus seating, T-shirt kit handout and printable bus manifests.
//!
//! - `models`: attendees, buses and the stock ledger
//! - `seating`: the seat assignment engine and candidate selection
//! - `roster`: search, toggles, import and dashboard metrics
//! - `inventory`: derived stock reconciliation
//! - `manifest`: HTML and plain-text bus manifests
//! - `store`: JSON persistence behind the `RosterStore` trait
//! - `desk`: the request-scoped `EventDesk` handlers used by front-ends

pub mod activity;
pub mod auth;
pub mod config;
pub mod context;
pub mod desk;
pub mod error;
pub mod inventory;
pub mod manifest;
pub mod models;
pub mod roster;
pub mod seating;
pub mod store;
pub mod utils;

pub use config::Config;
pub use context::EventContext;
pub use desk::EventDesk;
pub use error::{DeskError, DeskResult};
