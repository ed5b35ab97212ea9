//! Password Hashing and Verification
//!
//! Salted PBKDF2-HMAC-SHA256 with:
//! - A process-wide salt length and iteration count ([`Pbkdf2Hasher`])
//! - Stored format `base64(salt || derived_key)`
//! - Zeroization of clear text passwords
//! - Constant-time comparison
//!
//! ## Operational hazard
//! The stored format carries neither the salt length nor the iteration
//! count. Changing either for a running deployment makes every existing
//! hash unverifiable; a rotation needs a migration that re-hashes on login.

use std::fmt;

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{constant_time_eq, from_base64, random_bytes, to_base64};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Lower bound for PBKDF2 rounds
pub const MIN_ITERATIONS: u32 = 100_000;

/// Lower bound for the salt length in bytes
pub const MIN_SALT_SIZE: usize = 8;

/// Derived key length (SHA-256 output size)
const KEY_LEN: usize = 32;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Hasher configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordHashError {
    #[error("Salt size must be at least {min} bytes (got {actual})")]
    SaltTooShort { min: usize, actual: usize },

    #[error("Iteration count must be at least {min} (got {actual})")]
    TooFewIterations { min: u32, actual: u32 },
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password with validation
    ///
    /// Unicode is normalized using NFKC before validation, so the same
    /// password typed on different keyboards hashes identically.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // Count Unicode code points, not bytes
        let char_count = normalized.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        // Control characters other than tab/newline
        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(Self(normalized))
    }

    /// Create without validation (for testing)
    #[cfg(test)]
    pub fn new_unchecked(raw: String) -> Self {
        Self(raw)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Stored password hash, `base64(salt || derived_key)`
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wrap a value read from storage
    pub fn from_stored(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HashedPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hasher
// ============================================================================

/// PBKDF2-HMAC-SHA256 hasher with frozen parameters
///
/// ## Examples
/// ```rust
/// use platform::password::{ClearTextPassword, Pbkdf2Hasher};
///
/// let hasher = Pbkdf2Hasher::new(16, 100_000).unwrap();
/// let password = ClearTextPassword::new("correct horse".to_string()).unwrap();
/// let hashed = hasher.hash(&password);
/// assert!(hasher.verify(&password, &hashed));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pbkdf2Hasher {
    salt_size: usize,
    iterations: u32,
}

impl Pbkdf2Hasher {
    pub fn new(salt_size: usize, iterations: u32) -> Result<Self, PasswordHashError> {
        if salt_size < MIN_SALT_SIZE {
            return Err(PasswordHashError::SaltTooShort {
                min: MIN_SALT_SIZE,
                actual: salt_size,
            });
        }
        if iterations < MIN_ITERATIONS {
            return Err(PasswordHashError::TooFewIterations {
                min: MIN_ITERATIONS,
                actual: iterations,
            });
        }
        Ok(Self {
            salt_size,
            iterations,
        })
    }

    pub fn salt_size(&self) -> usize {
        self.salt_size
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Hash with a fresh random salt
    pub fn hash(&self, password: &ClearTextPassword) -> HashedPassword {
        let salt = random_bytes(self.salt_size);
        let mut key = self.derive(password, &salt);

        let mut stored = salt;
        stored.extend_from_slice(&key);
        key.zeroize();

        HashedPassword(to_base64(&stored))
    }

    /// Re-derive with the stored salt and compare in constant time.
    /// Malformed stored values never verify.
    pub fn verify(&self, password: &ClearTextPassword, stored: &HashedPassword) -> bool {
        let Ok(decoded) = from_base64(stored.as_str()) else {
            return false;
        };
        if decoded.len() != self.salt_size + KEY_LEN {
            return false;
        }

        let (salt, expected) = decoded.split_at(self.salt_size);
        let mut key = self.derive(password, salt);
        let matches = constant_time_eq(&key, expected);
        key.zeroize();
        matches
    }

    fn derive(&self, password: &ClearTextPassword, salt: &[u8]) -> [u8; KEY_LEN] {
        let mut key = [0u8; KEY_LEN];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, self.iterations, &mut key);
        key
    }
}

impl Default for Pbkdf2Hasher {
    /// 16-byte salt, [`MIN_ITERATIONS`] rounds
    fn default() -> Self {
        Self {
            salt_size: 16,
            iterations: MIN_ITERATIONS,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
