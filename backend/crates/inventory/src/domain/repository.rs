//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! Consumable and history operations are scoped by the parent ids from the
//! URL; a consumable under a different category counts as not found.

use kernel::id::{CategoryId, ConsumableId};
use kernel::pagination::Page;

use crate::domain::entities::{Adjustment, Category, Consumable, HistoryEntry};
use crate::domain::value_objects::{Description, ItemName, Quantity};
use crate::error::InventoryResult;

#[trait_variant::make(CategoryRepository: Send)]
pub trait LocalCategoryRepository {
    /// Insert; `CategoryNameTaken` on a duplicate name
    async fn create_category(&self, category: &Category) -> InventoryResult<()>;

    async fn find_category(&self, category_id: CategoryId) -> InventoryResult<Option<Category>>;

    /// Creation order, then id
    async fn list_categories(&self, page: Page) -> InventoryResult<Vec<Category>>;

    /// Replace name and description; `None` when the category is gone
    async fn update_category(
        &self,
        category_id: CategoryId,
        name: &ItemName,
        description: Option<&Description>,
    ) -> InventoryResult<Option<Category>>;

    /// `false` when nothing was deleted; `CategoryNotEmpty` while consumables reference it
    async fn delete_category(&self, category_id: CategoryId) -> InventoryResult<bool>;
}

#[trait_variant::make(ConsumableRepository: Send)]
pub trait LocalConsumableRepository {
    /// Insert under an existing category.
    /// `ParentCategoryMissing` before `ConsumableNameTaken`.
    async fn create_consumable(&self, consumable: &Consumable) -> InventoryResult<()>;

    async fn find_consumable(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
    ) -> InventoryResult<Option<Consumable>>;

    /// Consumables of one category, creation order then id
    async fn list_consumables(
        &self,
        category_id: CategoryId,
        page: Page,
    ) -> InventoryResult<Vec<Consumable>>;

    /// Replace name, quantity and description without writing history
    async fn update_consumable(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
        name: &ItemName,
        quantity: Quantity,
        description: Option<&Description>,
    ) -> InventoryResult<Option<Consumable>>;

    /// Deletes the consumable and its history
    async fn delete_consumable(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
    ) -> InventoryResult<bool>;
}

#[trait_variant::make(HistoryRepository: Send)]
pub trait LocalHistoryRepository {
    /// Atomically lock the consumable, apply the change and append a history
    /// row. On any error neither write is visible.
    async fn adjust_quantity(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
        adjustment: &Adjustment,
    ) -> InventoryResult<(Consumable, HistoryEntry)>;

    /// Newest first by history id
    async fn list_history(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
        page: Page,
    ) -> InventoryResult<Vec<HistoryEntry>>;

    /// Removes the record only; the quantity is left as is
    async fn delete_history(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
        history_id: i64,
    ) -> InventoryResult<bool>;
}

/// Everything the HTTP layer needs from one store
pub trait InventoryRepository:
    CategoryRepository + ConsumableRepository + HistoryRepository + Clone + Send + Sync + 'static
{
}

impl<T> InventoryRepository for T where
    T: CategoryRepository + ConsumableRepository + HistoryRepository + Clone + Send + Sync + 'static
{
}
