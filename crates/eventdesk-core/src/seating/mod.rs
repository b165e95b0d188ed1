//! Bus seating.
//!
//! `engine` is the pure seat assignment algorithm; `select` picks the
//! candidates from the roster and writes finished plans back.

pub mod engine;
pub mod select;

pub use engine::{
    assign_seats, AssignOptions, CandidateOrder, OverflowPolicy, Placement, SeatCandidate,
    SeatPlan,
};
pub use select::{apply_plan, group_options, select_candidates, CandidateFilter, GroupField};
