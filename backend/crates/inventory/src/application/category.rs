//! Category Use Cases

use std::sync::Arc;

use kernel::error::validation::ValidationErrors;
use kernel::id::CategoryId;
use kernel::pagination::Page;

use crate::domain::entities::Category;
use crate::domain::repository::CategoryRepository;
use crate::domain::value_objects::{Description, ItemName};
use crate::error::{InventoryError, InventoryResult};

/// Body of create and update
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
}

impl CategoryInput {
    fn validate(&self) -> InventoryResult<(ItemName, Option<Description>)> {
        let mut errors = ValidationErrors::new();
        let name = errors.check("name", ItemName::new(&self.name));
        let description = errors.check(
            "description",
            Description::optional(self.description.as_deref()),
        );
        match (name, description) {
            (Some(name), Some(description)) => Ok((name, description)),
            _ => Err(InventoryError::Validation(errors)),
        }
    }
}

pub struct CategoryUseCase<R>
where
    R: CategoryRepository,
{
    repo: Arc<R>,
}

impl<R> CategoryUseCase<R>
where
    R: CategoryRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CategoryInput) -> InventoryResult<Category> {
        let (name, description) = input.validate()?;
        let category = Category::new(name, description);
        self.repo.create_category(&category).await?;

        tracing::info!(
            category_id = %category.category_id,
            name = %category.name,
            "Category created"
        );
        Ok(category)
    }

    pub async fn get(&self, category_id: CategoryId) -> InventoryResult<Category> {
        self.repo
            .find_category(category_id)
            .await?
            .ok_or(InventoryError::CategoryNotFound)
    }

    pub async fn list(&self, page: Page) -> InventoryResult<Vec<Category>> {
        self.repo.list_categories(page).await
    }

    pub async fn update(
        &self,
        category_id: CategoryId,
        input: CategoryInput,
    ) -> InventoryResult<Category> {
        let (name, description) = input.validate()?;
        let category = self
            .repo
            .update_category(category_id, &name, description.as_ref())
            .await?
            .ok_or(InventoryError::CategoryNotFound)?;

        tracing::info!(category_id = %category_id, "Category updated");
        Ok(category)
    }

    pub async fn delete(&self, category_id: CategoryId) -> InventoryResult<()> {
        if !self.repo.delete_category(category_id).await? {
            return Err(InventoryError::CategoryNotFound);
        }
        tracing::info!(category_id = %category_id, "Category deleted");
        Ok(())
    }
}
