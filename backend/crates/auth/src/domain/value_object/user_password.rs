//! User Password Value Object
//!
//! Domain wrappers around `platform::password`.
//!
//! ## Usage
//! ```rust
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//! use platform::password::Pbkdf2Hasher;
//!
//! let hasher = Pbkdf2Hasher::default();
//! let raw = RawPassword::new("MySecurePass123!".to_string()).unwrap();
//! let hashed = UserPassword::from_raw(&raw, &hasher);
//! assert!(hashed.verify(&raw, &hasher));
//! ```

use platform::password::{ClearTextPassword, HashedPassword, PasswordPolicyError, Pbkdf2Hasher};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
///
/// Memory is zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// 8 to 128 characters after NFKC normalisation, no control characters
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        ClearTextPassword::new(raw).map(Self)
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Hashed user password, `base64(salt || key)`
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, hasher: &Pbkdf2Hasher) -> Self {
        Self(hasher.hash(raw.inner()))
    }

    /// Wrap the stored column value
    pub fn from_db(stored: impl Into<String>) -> Self {
        Self(HashedPassword::from_stored(stored))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Constant-time verification
    pub fn verify(&self, raw: &RawPassword, hasher: &Pbkdf2Hasher) -> bool {
        hasher.verify(raw.inner(), &self.0)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_is_enforced() {
        assert!(matches!(
            RawPassword::new("short".to_string()),
            Err(PasswordPolicyError::TooShort { .. })
        ));
    }

    #[test]
    fn test_hash_roundtrip_through_storage() {
        let hasher = Pbkdf2Hasher::default();
        let raw = RawPassword::new("hunter2hunter2".to_string()).unwrap();
        let stored = UserPassword::from_raw(&raw, &hasher);

        let reloaded = UserPassword::from_db(stored.as_str());
        assert!(reloaded.verify(&raw, &hasher));

        let other = RawPassword::new("hunter3hunter3".to_string()).unwrap();
        assert!(!reloaded.verify(&other, &hasher));
    }

    #[test]
    fn test_debug_hides_hash() {
        let stored = UserPassword::from_db("c2VjcmV0");
        assert!(!format!("{stored:?}").contains("c2VjcmV0"));
    }
}
