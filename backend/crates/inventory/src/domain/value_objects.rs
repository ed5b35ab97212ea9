//! Domain Value Objects
//!
//! Validated inputs for categories, consumables and history entries.

use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

const NAME_MAX_CHARS: usize = 255;
const DESCRIPTION_MAX_CHARS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("must not be empty")]
    Empty,
    #[error("must be at most {0} characters")]
    TooLong(usize),
    #[error("must not contain control characters")]
    ControlCharacter,
    #[error("must be greater than or equal to 0")]
    Negative,
    #[error("out of range")]
    OutOfRange,
}

/// Category or consumable name: NFC, trimmed, 1..=255 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemName(String);

impl ItemName {
    pub fn new(raw: &str) -> Result<Self, ValueError> {
        let normalized: String = raw.nfc().collect();
        let trimmed = normalized.trim();
        if trimmed.is_empty() {
            return Err(ValueError::Empty);
        }
        if trimmed.chars().count() > NAME_MAX_CHARS {
            return Err(ValueError::TooLong(NAME_MAX_CHARS));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(ValueError::ControlCharacter);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free text note; blank input is stored as absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    pub fn optional(raw: Option<&str>) -> Result<Option<Self>, ValueError> {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        if raw.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(ValueError::TooLong(DESCRIPTION_MAX_CHARS));
        }
        Ok(Some(Self(raw.to_string())))
    }

    pub fn from_db(value: Option<String>) -> Option<Self> {
        value.map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stock level, stored as a Postgres INTEGER
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Quantity(i32);

impl Quantity {
    /// Client-supplied quantity, must be non-negative
    pub fn new(value: i64) -> Result<Self, ValueError> {
        if value < 0 {
            return Err(ValueError::Negative);
        }
        i32::try_from(value)
            .map(Self)
            .map_err(|_| ValueError::OutOfRange)
    }

    pub fn from_db(value: i32) -> Self {
        Self(value)
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

/// Signed delta applied by an adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityChange(i32);

impl QuantityChange {
    pub fn new(value: i64) -> Result<Self, ValueError> {
        i32::try_from(value)
            .map(Self)
            .map_err(|_| ValueError::OutOfRange)
    }

    pub fn from_db(value: i32) -> Self {
        Self(value)
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_name_trims_and_normalizes() {
        let name = ItemName::new("  Cafe\u{301}  ").unwrap();
        assert_eq!(name.as_str(), "Café");
    }

    #[test]
    fn test_item_name_rejects_blank_and_control() {
        assert_eq!(ItemName::new("   "), Err(ValueError::Empty));
        assert_eq!(ItemName::new("a\nb"), Err(ValueError::ControlCharacter));
        assert_eq!(
            ItemName::new(&"x".repeat(256)),
            Err(ValueError::TooLong(255))
        );
    }

    #[test]
    fn test_description_blank_is_none() {
        assert_eq!(Description::optional(None), Ok(None));
        assert_eq!(Description::optional(Some("  ")), Ok(None));
        assert_eq!(
            Description::optional(Some(" salted ")).unwrap().unwrap().as_str(),
            "salted"
        );
    }

    #[test]
    fn test_quantity_bounds() {
        assert_eq!(Quantity::new(0).unwrap().value(), 0);
        assert_eq!(Quantity::new(-1), Err(ValueError::Negative));
        assert_eq!(Quantity::new(i64::from(i32::MAX) + 1), Err(ValueError::OutOfRange));
    }

    #[test]
    fn test_change_may_be_negative() {
        assert_eq!(QuantityChange::new(-3).unwrap().value(), -3);
        assert_eq!(QuantityChange::new(i64::MIN), Err(ValueError::OutOfRange));
    }
}
