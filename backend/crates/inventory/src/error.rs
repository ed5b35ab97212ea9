//! Inventory Error Types
//!
//! Inventory-specific variants that render through `kernel::error::AppError`.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind, validation::ValidationErrors};
use thiserror::Error;

pub type InventoryResult<T> = Result<T, InventoryError>;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Consumable category not found")]
    CategoryNotFound,

    /// Parent category missing when creating a consumable
    #[error("Category does not exist")]
    ParentCategoryMissing,

    #[error("Consumable not found")]
    ConsumableNotFound,

    #[error("History item not found")]
    HistoryNotFound,

    #[error("Consumable category already exists")]
    CategoryNameTaken,

    /// Consumable names are unique across all categories
    #[error("Consumable already exists")]
    ConsumableNameTaken,

    /// Category still referenced by consumables
    #[error("Consumable category still has consumables")]
    CategoryNotEmpty,

    #[error("Quantity cannot go below zero (current {current}, change {change})")]
    NegativeQuantity { current: i32, change: i32 },

    #[error("Quantity out of range")]
    QuantityOutOfRange,

    #[error("Request validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl InventoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InventoryError::CategoryNotFound
            | InventoryError::ParentCategoryMissing
            | InventoryError::ConsumableNotFound
            | InventoryError::HistoryNotFound => ErrorKind::NotFound,
            InventoryError::CategoryNameTaken | InventoryError::ConsumableNameTaken => {
                ErrorKind::Conflict
            }
            InventoryError::CategoryNotEmpty
            | InventoryError::NegativeQuantity { .. }
            | InventoryError::QuantityOutOfRange => ErrorKind::InvalidState,
            InventoryError::Validation(_) => ErrorKind::Validation,
            InventoryError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    fn log(&self) {
        match self {
            InventoryError::Database(e) => {
                tracing::error!(error = %e, "Inventory database error");
            }
            InventoryError::NegativeQuantity { current, change } => {
                tracing::warn!(current, change, "Rejected adjustment below zero");
            }
            _ => {
                tracing::debug!(error = %self, "Inventory error");
            }
        }
    }
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::Validation(errors) => errors.into(),
            InventoryError::Database(e) => AppError::from(e),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

impl From<ValidationErrors> for InventoryError {
    fn from(errors: ValidationErrors) -> Self {
        InventoryError::Validation(errors)
    }
}

impl From<axum::extract::rejection::JsonRejection> for InventoryError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        InventoryError::Validation(rejection.into())
    }
}

impl From<axum::extract::rejection::QueryRejection> for InventoryError {
    fn from(rejection: axum::extract::rejection::QueryRejection) -> Self {
        InventoryError::Validation(rejection.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (InventoryError::CategoryNotFound, 404),
            (InventoryError::ParentCategoryMissing, 404),
            (InventoryError::CategoryNameTaken, 400),
            (InventoryError::ConsumableNameTaken, 400),
            (InventoryError::CategoryNotEmpty, 422),
            (InventoryError::NegativeQuantity { current: 1, change: -2 }, 422),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_messages_are_user_facing() {
        let app: AppError = InventoryError::HistoryNotFound.into();
        assert_eq!(app.message(), "History item not found");

        let app: AppError = InventoryError::ParentCategoryMissing.into();
        assert_eq!(app.message(), "Category does not exist");
    }

    #[test]
    fn test_validation_keeps_fields() {
        let app: AppError = InventoryError::Validation(ValidationErrors::single("name", "empty")).into();
        assert_eq!(app.status_code(), 400);
        assert_eq!(app.errors()[0].field, "name");
    }
}
