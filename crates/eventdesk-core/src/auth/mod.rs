//! Operator access control.
//!
//! This module provides:
//! - `Access`: staff or admin privileges
//! - `Operator`: who is at the desk and what they may do
//! - `Passcodes`: Argon2-hashed desk passcodes from the config file

pub mod passcode;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DeskError, DeskResult};

pub use passcode::{hash_passcode, Passcodes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Access {
    Staff,
    Admin,
}

impl Access {
    pub fn label(&self) -> &'static str {
        match self {
            Access::Staff => "Staff",
            Access::Admin => "Admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "staff" => Some(Access::Staff),
            "admin" => Some(Access::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub name: String,
    pub access: Access,
}

impl Operator {
    pub fn new(name: impl Into<String>, access: Access) -> Self {
        Self {
            name: name.into(),
            access,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.access == Access::Admin
    }

    /// Fail with `Forbidden` unless this operator has at least `required`
    pub fn require(&self, required: Access) -> DeskResult<()> {
        if self.access >= required {
            Ok(())
        } else {
            Err(DeskError::Forbidden { required })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_satisfies_staff() {
        let admin = Operator::new("Nadia", Access::Admin);
        assert!(admin.require(Access::Staff).is_ok());
        assert!(admin.require(Access::Admin).is_ok());
        assert!(admin.is_admin());
    }

    #[test]
    fn test_staff_cannot_do_admin_work() {
        let staff = Operator::new("Desk 2", Access::Staff);
        assert!(staff.require(Access::Staff).is_ok());
        let err = staff.require(Access::Admin).unwrap_err();
        assert!(matches!(err, DeskError::Forbidden { .. }));
        assert_eq!(err.to_string(), "Admin access required");
    }

    #[test]
    fn test_access_parse() {
        assert_eq!(Access::parse(" ADMIN "), Some(Access::Admin));
        assert_eq!(Access::parse("staff"), Some(Access::Staff));
        assert_eq!(Access::parse("root"), None);
    }
}
