use anyhow::{anyhow, Result};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::RngCore;
use tracing::{debug, warn};

use super::Access;

/// Salt length in bytes before base64 encoding
const SALT_LEN: usize = 16;

/// Hash a passcode into an Argon2 PHC string for the config file
pub fn hash_passcode(passcode: &str) -> Result<String> {
    let mut salt_bytes = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| anyhow!("Failed to encode salt: {}", e))?;
    let hash = Argon2::default()
        .hash_password(passcode.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash passcode: {}", e))?;
    Ok(hash.to_string())
}

fn verify(passcode: &str, phc: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(passcode.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "Ignoring malformed passcode hash");
            false
        }
    }
}

/// The configured desk passcodes
#[derive(Debug, Clone, Default)]
pub struct Passcodes {
    pub staff_hash: Option<String>,
    pub admin_hash: Option<String>,
}

impl Passcodes {
    pub fn new(staff_hash: Option<String>, admin_hash: Option<String>) -> Self {
        let clean = |h: Option<String>| h.filter(|s| !s.trim().is_empty());
        Self {
            staff_hash: clean(staff_hash),
            admin_hash: clean(admin_hash),
        }
    }

    /// No passcode configured; the desk runs open
    pub fn is_open(&self) -> bool {
        self.staff_hash.is_none() && self.admin_hash.is_none()
    }

    /// Access granted by `passcode`. The admin hash is checked first.
    pub fn authenticate(&self, passcode: &str) -> Option<Access> {
        if self.is_open() {
            warn!("No passcodes configured, granting admin access");
            return Some(Access::Admin);
        }
        if let Some(ref hash) = self.admin_hash {
            if verify(passcode, hash) {
                debug!("Admin passcode accepted");
                return Some(Access::Admin);
            }
        }
        if let Some(ref hash) = self.staff_hash {
            if verify(passcode, hash) {
                debug!("Staff passcode accepted");
                return Some(Access::Staff);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_authenticate() {
        let passcodes = Passcodes::new(
            Some(hash_passcode("1234").unwrap()),
            Some(hash_passcode("9999").unwrap()),
        );
        assert!(!passcodes.is_open());
        assert_eq!(passcodes.authenticate("1234"), Some(Access::Staff));
        assert_eq!(passcodes.authenticate("9999"), Some(Access::Admin));
        assert_eq!(passcodes.authenticate("0000"), None);
        assert_eq!(passcodes.authenticate(""), None);
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_passcode("1234").unwrap();
        let b = hash_passcode("1234").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2"));
    }

    #[test]
    fn test_same_passcode_for_both_grants_admin() {
        let hash = hash_passcode("4321").unwrap();
        let passcodes = Passcodes::new(Some(hash.clone()), Some(hash));
        assert_eq!(passcodes.authenticate("4321"), Some(Access::Admin));
    }

    #[test]
    fn test_open_desk_grants_admin() {
        let passcodes = Passcodes::new(None, Some("  ".to_string()));
        assert!(passcodes.is_open());
        assert_eq!(passcodes.authenticate("anything"), Some(Access::Admin));
    }

    #[test]
    fn test_malformed_hash_rejects() {
        let passcodes = Passcodes::new(Some("not-a-hash".to_string()), None);
        assert_eq!(passcodes.authenticate("not-a-hash"), None);
    }
}
