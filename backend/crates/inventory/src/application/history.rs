//! History Use Cases

use std::sync::Arc;

use kernel::id::{CategoryId, ConsumableId};
use kernel::pagination::Page;

use crate::domain::entities::HistoryEntry;
use crate::domain::repository::{ConsumableRepository, HistoryRepository};
use crate::error::{InventoryError, InventoryResult};

pub struct HistoryUseCase<R>
where
    R: ConsumableRepository + HistoryRepository,
{
    repo: Arc<R>,
}

impl<R> HistoryUseCase<R>
where
    R: ConsumableRepository + HistoryRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Newest first. A consumable outside `category_id` is `ConsumableNotFound`.
    pub async fn list(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
        page: Page,
    ) -> InventoryResult<Vec<HistoryEntry>> {
        if self
            .repo
            .find_consumable(category_id, consumable_id)
            .await?
            .is_none()
        {
            return Err(InventoryError::ConsumableNotFound);
        }
        self.repo.list_history(category_id, consumable_id, page).await
    }

    /// Trims the log; the consumable's quantity is not reverted
    pub async fn delete(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
        history_id: i64,
    ) -> InventoryResult<()> {
        if !self
            .repo
            .delete_history(category_id, consumable_id, history_id)
            .await?
        {
            return Err(InventoryError::HistoryNotFound);
        }
        tracing::info!(
            consumable_id = %consumable_id,
            history_id,
            "History item deleted"
        );
        Ok(())
    }
}
