//! Domain Entities

use chrono::{DateTime, Utc};
use kernel::id::{CategoryId, ConsumableId};

use crate::domain::value_objects::{Description, ItemName, Quantity, QuantityChange};

/// Consumable category, groups consumables
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub category_id: CategoryId,
    pub name: ItemName,
    pub description: Option<Description>,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: ItemName, description: Option<Description>) -> Self {
        Self {
            category_id: CategoryId::new(),
            name,
            description,
            created_at: Utc::now(),
        }
    }
}

/// Stocked item belonging to exactly one category
#[derive(Debug, Clone, PartialEq)]
pub struct Consumable {
    pub consumable_id: ConsumableId,
    pub category_id: CategoryId,
    pub name: ItemName,
    pub quantity: Quantity,
    pub description: Option<Description>,
    pub created_at: DateTime<Utc>,
}

impl Consumable {
    pub fn new(
        category_id: CategoryId,
        name: ItemName,
        quantity: Quantity,
        description: Option<Description>,
    ) -> Self {
        Self {
            consumable_id: ConsumableId::new(),
            category_id,
            name,
            quantity,
            description,
            created_at: Utc::now(),
        }
    }
}

/// Immutable record of one quantity adjustment
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub history_id: i64,
    pub consumable_id: ConsumableId,
    pub modified_count: QuantityChange,
    pub description: Option<Description>,
    pub modified_time: DateTime<Utc>,
}

/// Adjustment request, before it is applied
#[derive(Debug, Clone)]
pub struct Adjustment {
    pub change: QuantityChange,
    pub description: Option<Description>,
    pub enforce_non_negative: bool,
}
