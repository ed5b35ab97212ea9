//! Adjust Quantity Use Case
//!
//! Applies a signed change to a consumable and records it in its history.
//! Both writes happen in one repository call, so concurrent adjustments
//! serialize on the consumable and a rejected change leaves no trace.

use std::sync::Arc;

use kernel::error::validation::ValidationErrors;
use kernel::id::{CategoryId, ConsumableId};

use crate::application::config::InventoryConfig;
use crate::domain::entities::{Adjustment, Consumable, HistoryEntry};
use crate::domain::repository::HistoryRepository;
use crate::domain::value_objects::{Description, QuantityChange};
use crate::error::{InventoryError, InventoryResult};

pub struct AdjustQuantityInput {
    pub modified_count: i64,
    pub description: Option<String>,
}

#[derive(Debug)]
pub struct AdjustQuantityOutput {
    pub consumable: Consumable,
    pub entry: HistoryEntry,
}

pub struct AdjustQuantityUseCase<R>
where
    R: HistoryRepository,
{
    repo: Arc<R>,
    config: Arc<InventoryConfig>,
}

impl<R> AdjustQuantityUseCase<R>
where
    R: HistoryRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<InventoryConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
        input: AdjustQuantityInput,
    ) -> InventoryResult<AdjustQuantityOutput> {
        let mut errors = ValidationErrors::new();
        let change = errors.check("modified_count", QuantityChange::new(input.modified_count));
        let description = errors.check(
            "description",
            Description::optional(input.description.as_deref()),
        );
        let (Some(change), Some(description)) = (change, description) else {
            return Err(InventoryError::Validation(errors));
        };

        let adjustment = Adjustment {
            change,
            description,
            enforce_non_negative: self.config.enforce_non_negative_quantity,
        };

        let (consumable, entry) = self
            .repo
            .adjust_quantity(category_id, consumable_id, &adjustment)
            .await?;

        tracing::info!(
            consumable_id = %consumable_id,
            history_id = entry.history_id,
            modified_count = change.value(),
            quantity = consumable.quantity.value(),
            "Quantity adjusted"
        );

        Ok(AdjustQuantityOutput { consumable, entry })
    }
}
