//! Consumable Use Cases
//!
//! Plain CRUD. Quantity set through `update` is a correction and writes no
//! history; stock movements go through [`AdjustQuantityUseCase`].
//!
//! [`AdjustQuantityUseCase`]: crate::application::AdjustQuantityUseCase

use std::sync::Arc;

use kernel::error::validation::ValidationErrors;
use kernel::id::{CategoryId, ConsumableId};
use kernel::pagination::Page;

use crate::domain::entities::Consumable;
use crate::domain::repository::{CategoryRepository, ConsumableRepository};
use crate::domain::value_objects::{Description, ItemName, Quantity};
use crate::error::{InventoryError, InventoryResult};

/// Body of create and update
pub struct ConsumableInput {
    pub name: String,
    pub quantity: i64,
    pub description: Option<String>,
}

impl ConsumableInput {
    fn validate(&self) -> InventoryResult<(ItemName, Quantity, Option<Description>)> {
        let mut errors = ValidationErrors::new();
        let name = errors.check("name", ItemName::new(&self.name));
        let quantity = errors.check("quantity", Quantity::new(self.quantity));
        let description = errors.check(
            "description",
            Description::optional(self.description.as_deref()),
        );
        match (name, quantity, description) {
            (Some(name), Some(quantity), Some(description)) => Ok((name, quantity, description)),
            _ => Err(InventoryError::Validation(errors)),
        }
    }
}

pub struct ConsumableUseCase<R>
where
    R: CategoryRepository + ConsumableRepository,
{
    repo: Arc<R>,
}

impl<R> ConsumableUseCase<R>
where
    R: CategoryRepository + ConsumableRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        category_id: CategoryId,
        input: ConsumableInput,
    ) -> InventoryResult<Consumable> {
        let (name, quantity, description) = input.validate()?;
        let consumable = Consumable::new(category_id, name, quantity, description);
        self.repo.create_consumable(&consumable).await?;

        tracing::info!(
            category_id = %category_id,
            consumable_id = %consumable.consumable_id,
            quantity = quantity.value(),
            "Consumable created"
        );
        Ok(consumable)
    }

    pub async fn get(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
    ) -> InventoryResult<Consumable> {
        self.repo
            .find_consumable(category_id, consumable_id)
            .await?
            .ok_or(InventoryError::ConsumableNotFound)
    }

    /// Unknown category is `CategoryNotFound`, not an empty list
    pub async fn list(
        &self,
        category_id: CategoryId,
        page: Page,
    ) -> InventoryResult<Vec<Consumable>> {
        if self.repo.find_category(category_id).await?.is_none() {
            return Err(InventoryError::CategoryNotFound);
        }
        self.repo.list_consumables(category_id, page).await
    }

    pub async fn update(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
        input: ConsumableInput,
    ) -> InventoryResult<Consumable> {
        let (name, quantity, description) = input.validate()?;
        let consumable = self
            .repo
            .update_consumable(
                category_id,
                consumable_id,
                &name,
                quantity,
                description.as_ref(),
            )
            .await?
            .ok_or(InventoryError::ConsumableNotFound)?;

        tracing::info!(
            consumable_id = %consumable_id,
            quantity = quantity.value(),
            "Consumable updated"
        );
        Ok(consumable)
    }

    pub async fn delete(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
    ) -> InventoryResult<()> {
        if !self.repo.delete_consumable(category_id, consumable_id).await? {
            return Err(InventoryError::ConsumableNotFound);
        }
        tracing::info!(consumable_id = %consumable_id, "Consumable deleted");
        Ok(())
    }
}
