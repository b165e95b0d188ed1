pub mod activity;
pub mod dashboard;
pub mod inventory;
pub mod terminal;
pub mod transport;
