//! API DTOs (Data Transfer Objects)
//!
//! Dates of categories and consumables are rendered as `YYYY-MM-DD`,
//! history timestamps as RFC 3339.

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{CategoryId, ConsumableId};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Category, Consumable, HistoryEntry};

// ============================================================================
// Requests
// ============================================================================

/// POST / PUT /categories[/{id}]
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// POST / PUT .../consumables[/{id}]
#[derive(Debug, Clone, Deserialize)]
pub struct ConsumableRequest {
    pub name: String,
    pub quantity: i64,
    #[serde(default)]
    pub description: Option<String>,
}

/// POST .../history
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryRequest {
    pub modified_count: i64,
    #[serde(default)]
    pub description: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub category_id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDate,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            category_id: category.category_id,
            name: category.name.to_string(),
            description: category.description.as_ref().map(|d| d.as_str().to_string()),
            created_at: category.created_at.date_naive(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsumableResponse {
    pub consumable_id: ConsumableId,
    pub name: String,
    pub quantity: i32,
    pub description: Option<String>,
    pub created_at: NaiveDate,
    pub category_id: CategoryId,
}

impl From<&Consumable> for ConsumableResponse {
    fn from(consumable: &Consumable) -> Self {
        Self {
            consumable_id: consumable.consumable_id,
            name: consumable.name.to_string(),
            quantity: consumable.quantity.value(),
            description: consumable.description.as_ref().map(|d| d.as_str().to_string()),
            created_at: consumable.created_at.date_naive(),
            category_id: consumable.category_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub history_id: i64,
    pub modified_count: i32,
    /// Empty string when no description was given
    pub description: String,
    pub modified_time: DateTime<Utc>,
    pub consumable_id: ConsumableId,
}

impl From<&HistoryEntry> for HistoryResponse {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            history_id: entry.history_id,
            modified_count: entry.modified_count.value(),
            description: entry
                .description
                .as_ref()
                .map(|d| d.as_str().to_string())
                .unwrap_or_default(),
            modified_time: entry.modified_time,
            consumable_id: entry.consumable_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryEnvelope {
    pub category: CategoryResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoriesEnvelope {
    pub categories: Vec<CategoryResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsumableEnvelope {
    pub consumable: ConsumableResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsumablesEnvelope {
    pub consumables: Vec<ConsumableResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEnvelope {
    pub history: Vec<HistoryResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
