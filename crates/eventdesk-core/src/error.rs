use thiserror::Error;

use crate::auth::Access;
use crate::models::ShirtSize;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("No attendee with ticket {0}")]
    NotFound(String),

    #[error("Ticket {0} is already on the roster")]
    DuplicateTicket(String),

    #[error("Ticket number is required")]
    EmptyTicket,

    #[error("Unknown bus: {0}")]
    UnknownBus(String),

    #[error("{bus} is full ({capacity} seats)")]
    BusFull { bus: String, capacity: u32 },

    #[error("{bus} has no {role} seats left ({limit} reserved)")]
    QuotaFull {
        bus: String,
        role: String,
        limit: u32,
    },

    #[error("Out of stock for size {size}")]
    OutOfStock { size: ShirtSize },

    #[error("No T-shirt size recorded for ticket {0}")]
    MissingShirtSize(String),

    #[error("{name} already checked in at {time}")]
    AlreadyCheckedIn { name: String, time: String },

    #[error("{required} access required")]
    Forbidden { required: Access },

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type DeskResult<T> = Result<T, DeskError>;

/// Maximum length for storage error details in messages
const MAX_STORAGE_DETAIL_LENGTH: usize = 300;

impl DeskError {
    /// Wrap a store failure, keeping the whole context chain on one line
    pub fn storage(err: anyhow::Error) -> Self {
        let detail = format!("{:#}", err);
        if detail.len() <= MAX_STORAGE_DETAIL_LENGTH {
            DeskError::Storage(detail)
        } else {
            let cut: String = detail.chars().take(MAX_STORAGE_DETAIL_LENGTH).collect();
            DeskError::Storage(format!("{}... (truncated)", cut))
        }
    }

    /// True when the error only concerns persistence and in-memory state is intact
    pub fn is_storage(&self) -> bool {
        matches!(self, DeskError::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_keeps_context_chain() {
        let err = anyhow::anyhow!("disk full").context("Failed to write roster");
        let desk = DeskError::storage(err);
        assert_eq!(
            desk.to_string(),
            "Storage error: Failed to write roster: disk full"
        );
        assert!(desk.is_storage());
    }

    #[test]
    fn test_storage_error_truncates_long_detail() {
        let err = anyhow::anyhow!("x".repeat(1000));
        match DeskError::storage(err) {
            DeskError::Storage(detail) => {
                assert!(detail.ends_with("... (truncated)"));
                assert!(detail.len() < 400);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_display_messages() {
        let err = DeskError::BusFull {
            bus: "Bus 1".to_string(),
            capacity: 45,
        };
        assert_eq!(err.to_string(), "Bus 1 is full (45 seats)");
        let err = DeskError::OutOfStock {
            size: ShirtSize::XL,
        };
        assert_eq!(err.to_string(), "Out of stock for size XL");
        assert!(!err.is_storage());
    }
}
