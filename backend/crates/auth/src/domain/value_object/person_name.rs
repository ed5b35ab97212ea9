//! Person Name Value Object
//!
//! First, last and middle names of a user. NFC-normalised and trimmed;
//! anything printable is accepted.

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Maximum name length (in characters)
pub const PERSON_NAME_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersonNameError {
    #[error("Name cannot be empty")]
    Empty,

    #[error("Name must be at most {PERSON_NAME_MAX_LENGTH} characters")]
    TooLong,

    #[error("Name contains invalid control characters")]
    InvalidCharacter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PersonNameError> {
        let normalized: String = raw.as_ref().nfc().collect();
        let trimmed = normalized.trim();

        if trimmed.is_empty() {
            return Err(PersonNameError::Empty);
        }
        if trimmed.chars().count() > PERSON_NAME_MAX_LENGTH {
            return Err(PersonNameError::TooLong);
        }
        if trimmed.chars().any(char::is_control) {
            return Err(PersonNameError::InvalidCharacter);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Optional name: absent or blank input means "no value"
    pub fn optional(raw: Option<&str>) -> Result<Option<Self>, PersonNameError> {
        match raw {
            Some(value) if !value.trim().is_empty() => Self::new(value).map(Some),
            _ => Ok(None),
        }
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
