//! In-memory repository for tests
//!
//! Implements the same repository traits as [`PgInventoryRepository`]
//! (`crate::infra::postgres`) with the same constraints: unique names,
//! restricted category delete, cascading consumable delete and a
//! non-negative quantity check. A single mutex makes every method atomic.
//!
//! [`PgInventoryRepository`]: crate::infra::postgres::PgInventoryRepository

use std::sync::{Arc, Mutex, MutexGuard};

use kernel::id::{CategoryId, ConsumableId};
use kernel::pagination::Page;

use crate::domain::entities::{Adjustment, Category, Consumable, HistoryEntry};
use crate::domain::repository::{CategoryRepository, ConsumableRepository, HistoryRepository};
use crate::domain::services::adjusted_quantity;
use crate::domain::value_objects::{Description, ItemName, Quantity};
use crate::error::{InventoryError, InventoryResult};

#[derive(Default)]
struct State {
    // Kept in insertion order
    categories: Vec<Category>,
    consumables: Vec<Consumable>,
    history: Vec<HistoryEntry>,
    last_history_id: i64,
}

impl State {
    fn consumable_mut(
        &mut self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
    ) -> Option<&mut Consumable> {
        self.consumables
            .iter_mut()
            .find(|c| c.consumable_id == consumable_id && c.category_id == category_id)
    }

    fn owns(&self, category_id: CategoryId, consumable_id: ConsumableId) -> bool {
        self.consumables
            .iter()
            .any(|c| c.consumable_id == consumable_id && c.category_id == category_id)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryInventoryRepository {
    state: Arc<Mutex<State>>,
}

impl InMemoryInventoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn consumable(&self, consumable_id: ConsumableId) -> Option<Consumable> {
        self.lock()
            .consumables
            .iter()
            .find(|c| c.consumable_id == consumable_id)
            .cloned()
    }

    /// Every history row of a consumable, oldest first
    pub fn history_of(&self, consumable_id: ConsumableId) -> Vec<HistoryEntry> {
        self.lock()
            .history
            .iter()
            .filter(|h| h.consumable_id == consumable_id)
            .cloned()
            .collect()
    }

    pub fn history_count(&self) -> usize {
        self.lock().history.len()
    }
}

impl CategoryRepository for InMemoryInventoryRepository {
    async fn create_category(&self, category: &Category) -> InventoryResult<()> {
        let mut state = self.lock();
        if state.categories.iter().any(|c| c.name == category.name) {
            return Err(InventoryError::CategoryNameTaken);
        }
        state.categories.push(category.clone());
        Ok(())
    }

    async fn find_category(&self, category_id: CategoryId) -> InventoryResult<Option<Category>> {
        Ok(self
            .lock()
            .categories
            .iter()
            .find(|c| c.category_id == category_id)
            .cloned())
    }

    async fn list_categories(&self, page: Page) -> InventoryResult<Vec<Category>> {
        Ok(page.slice(&self.lock().categories))
    }

    async fn update_category(
        &self,
        category_id: CategoryId,
        name: &ItemName,
        description: Option<&Description>,
    ) -> InventoryResult<Option<Category>> {
        let mut state = self.lock();
        if state
            .categories
            .iter()
            .any(|c| &c.name == name && c.category_id != category_id)
        {
            return Err(InventoryError::CategoryNameTaken);
        }
        let Some(category) = state
            .categories
            .iter_mut()
            .find(|c| c.category_id == category_id)
        else {
            return Ok(None);
        };
        category.name = name.clone();
        category.description = description.cloned();
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, category_id: CategoryId) -> InventoryResult<bool> {
        let mut state = self.lock();
        if state.consumables.iter().any(|c| c.category_id == category_id) {
            return Err(InventoryError::CategoryNotEmpty);
        }
        let before = state.categories.len();
        state.categories.retain(|c| c.category_id != category_id);
        Ok(state.categories.len() < before)
    }
}

impl ConsumableRepository for InMemoryInventoryRepository {
    async fn create_consumable(&self, consumable: &Consumable) -> InventoryResult<()> {
        let mut state = self.lock();
        if !state
            .categories
            .iter()
            .any(|c| c.category_id == consumable.category_id)
        {
            return Err(InventoryError::ParentCategoryMissing);
        }
        if state.consumables.iter().any(|c| c.name == consumable.name) {
            return Err(InventoryError::ConsumableNameTaken);
        }
        state.consumables.push(consumable.clone());
        Ok(())
    }

    async fn find_consumable(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
    ) -> InventoryResult<Option<Consumable>> {
        Ok(self
            .lock()
            .consumables
            .iter()
            .find(|c| c.consumable_id == consumable_id && c.category_id == category_id)
            .cloned())
    }

    async fn list_consumables(
        &self,
        category_id: CategoryId,
        page: Page,
    ) -> InventoryResult<Vec<Consumable>> {
        let state = self.lock();
        let matching: Vec<Consumable> = state
            .consumables
            .iter()
            .filter(|c| c.category_id == category_id)
            .cloned()
            .collect();
        Ok(page.slice(&matching))
    }

    async fn update_consumable(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
        name: &ItemName,
        quantity: Quantity,
        description: Option<&Description>,
    ) -> InventoryResult<Option<Consumable>> {
        let mut state = self.lock();
        if state
            .consumables
            .iter()
            .any(|c| &c.name == name && c.consumable_id != consumable_id)
        {
            return Err(InventoryError::ConsumableNameTaken);
        }
        let Some(consumable) = state.consumable_mut(category_id, consumable_id) else {
            return Ok(None);
        };
        consumable.name = name.clone();
        consumable.quantity = quantity;
        consumable.description = description.cloned();
        Ok(Some(consumable.clone()))
    }

    async fn delete_consumable(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
    ) -> InventoryResult<bool> {
        let mut state = self.lock();
        if !state.owns(category_id, consumable_id) {
            return Ok(false);
        }
        state.consumables.retain(|c| c.consumable_id != consumable_id);
        state.history.retain(|h| h.consumable_id != consumable_id);
        Ok(true)
    }
}

impl HistoryRepository for InMemoryInventoryRepository {
    async fn adjust_quantity(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
        adjustment: &Adjustment,
    ) -> InventoryResult<(Consumable, HistoryEntry)> {
        let mut state = self.lock();
        let current = state
            .consumable_mut(category_id, consumable_id)
            .map(|c| c.quantity)
            .ok_or(InventoryError::ConsumableNotFound)?;

        let next = adjusted_quantity(current, adjustment.change, adjustment.enforce_non_negative)?;
        // Same outcome as the storage CHECK constraint
        if next.value() < 0 {
            return Err(InventoryError::NegativeQuantity {
                current: current.value(),
                change: adjustment.change.value(),
            });
        }

        state.last_history_id += 1;
        let entry = HistoryEntry {
            history_id: state.last_history_id,
            consumable_id,
            modified_count: adjustment.change,
            description: adjustment.description.clone(),
            modified_time: chrono::Utc::now(),
        };
        state.history.push(entry.clone());

        let consumable = state
            .consumable_mut(category_id, consumable_id)
            .ok_or(InventoryError::ConsumableNotFound)?;
        consumable.quantity = next;
        Ok((consumable.clone(), entry))
    }

    async fn list_history(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
        page: Page,
    ) -> InventoryResult<Vec<HistoryEntry>> {
        let state = self.lock();
        if !state.owns(category_id, consumable_id) {
            return Ok(Vec::new());
        }
        let newest_first: Vec<HistoryEntry> = state
            .history
            .iter()
            .rev()
            .filter(|h| h.consumable_id == consumable_id)
            .cloned()
            .collect();
        Ok(page.slice(&newest_first))
    }

    async fn delete_history(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
        history_id: i64,
    ) -> InventoryResult<bool> {
        let mut state = self.lock();
        if !state.owns(category_id, consumable_id) {
            return Ok(false);
        }
        let before = state.history.len();
        state
            .history
            .retain(|h| !(h.history_id == history_id && h.consumable_id == consumable_id));
        Ok(state.history.len() < before)
    }
}
