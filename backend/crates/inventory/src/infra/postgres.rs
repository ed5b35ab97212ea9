//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{CategoryId, ConsumableId};
use kernel::pagination::Page;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Adjustment, Category, Consumable, HistoryEntry};
use crate::domain::repository::{CategoryRepository, ConsumableRepository, HistoryRepository};
use crate::domain::services::adjusted_quantity;
use crate::domain::value_objects::{Description, ItemName, Quantity, QuantityChange};
use crate::error::{InventoryError, InventoryResult};

/// PostgreSQL-backed inventory repository
#[derive(Clone)]
pub struct PgInventoryRepository {
    pool: PgPool,
}

impl PgInventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Row mapping
// ============================================================================

const CATEGORY_COLUMNS: &str = "category_id, name, description, created_at";

const CONSUMABLE_COLUMNS: &str =
    "consumable_id, category_id, name, quantity, description, created_at";

#[derive(sqlx::FromRow)]
struct CategoryRow {
    category_id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            category_id: CategoryId::from_uuid(row.category_id),
            name: ItemName::from_db(row.name),
            description: Description::from_db(row.description),
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ConsumableRow {
    consumable_id: Uuid,
    category_id: Uuid,
    name: String,
    quantity: i32,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ConsumableRow> for Consumable {
    fn from(row: ConsumableRow) -> Self {
        Self {
            consumable_id: ConsumableId::from_uuid(row.consumable_id),
            category_id: CategoryId::from_uuid(row.category_id),
            name: ItemName::from_db(row.name),
            quantity: Quantity::from_db(row.quantity),
            description: Description::from_db(row.description),
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct HistoryRow {
    history_id: i64,
    consumable_id: Uuid,
    modified_count: i32,
    description: Option<String>,
    modified_time: DateTime<Utc>,
}

impl From<HistoryRow> for HistoryEntry {
    fn from(row: HistoryRow) -> Self {
        Self {
            history_id: row.history_id,
            consumable_id: ConsumableId::from_uuid(row.consumable_id),
            modified_count: QuantityChange::from_db(row.modified_count),
            description: Description::from_db(row.description),
            modified_time: row.modified_time,
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

fn is_check_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_check_violation())
}

// ============================================================================
// Category Repository Implementation
// ============================================================================

impl CategoryRepository for PgInventoryRepository {
    async fn create_category(&self, category: &Category) -> InventoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO consumable_categories (category_id, name, description, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(category.category_id.as_uuid())
        .bind(category.name.as_str())
        .bind(category.description.as_ref().map(Description::as_str))
        .bind(category.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                InventoryError::CategoryNameTaken
            } else {
                InventoryError::Database(e)
            }
        })?;

        Ok(())
    }

    async fn find_category(&self, category_id: CategoryId) -> InventoryResult<Option<Category>> {
        let row: Option<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM consumable_categories WHERE category_id = $1"
        ))
        .bind(category_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Category::from))
    }

    async fn list_categories(&self, page: Page) -> InventoryResult<Vec<Category>> {
        let rows: Vec<CategoryRow> = sqlx::query_as(&format!(
            r#"
            SELECT {CATEGORY_COLUMNS} FROM consumable_categories
            ORDER BY created_at, category_id
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn update_category(
        &self,
        category_id: CategoryId,
        name: &ItemName,
        description: Option<&Description>,
    ) -> InventoryResult<Option<Category>> {
        let row: Option<CategoryRow> = sqlx::query_as(&format!(
            r#"
            UPDATE consumable_categories SET name = $2, description = $3
            WHERE category_id = $1
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(category_id.as_uuid())
        .bind(name.as_str())
        .bind(description.map(Description::as_str))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                InventoryError::CategoryNameTaken
            } else {
                InventoryError::Database(e)
            }
        })?;

        Ok(row.map(Category::from))
    }

    async fn delete_category(&self, category_id: CategoryId) -> InventoryResult<bool> {
        let result = sqlx::query("DELETE FROM consumable_categories WHERE category_id = $1")
            .bind(category_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    InventoryError::CategoryNotEmpty
                } else {
                    InventoryError::Database(e)
                }
            })?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Consumable Repository Implementation
// ============================================================================

impl ConsumableRepository for PgInventoryRepository {
    async fn create_consumable(&self, consumable: &Consumable) -> InventoryResult<()> {
        let mut tx = self.pool.begin().await?;

        // Shared lock keeps the category from being deleted underneath us
        let parent: Option<Uuid> = sqlx::query_scalar(
            "SELECT category_id FROM consumable_categories WHERE category_id = $1 FOR SHARE",
        )
        .bind(consumable.category_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;

        if parent.is_none() {
            return Err(InventoryError::ParentCategoryMissing);
        }

        sqlx::query(
            r#"
            INSERT INTO consumables
                (consumable_id, category_id, name, quantity, description, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(consumable.consumable_id.as_uuid())
        .bind(consumable.category_id.as_uuid())
        .bind(consumable.name.as_str())
        .bind(consumable.quantity.value())
        .bind(consumable.description.as_ref().map(Description::as_str))
        .bind(consumable.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                InventoryError::ConsumableNameTaken
            } else {
                InventoryError::Database(e)
            }
        })?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_consumable(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
    ) -> InventoryResult<Option<Consumable>> {
        let row: Option<ConsumableRow> = sqlx::query_as(&format!(
            r#"
            SELECT {CONSUMABLE_COLUMNS} FROM consumables
            WHERE consumable_id = $1 AND category_id = $2
            "#
        ))
        .bind(consumable_id.as_uuid())
        .bind(category_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Consumable::from))
    }

    async fn list_consumables(
        &self,
        category_id: CategoryId,
        page: Page,
    ) -> InventoryResult<Vec<Consumable>> {
        let rows: Vec<ConsumableRow> = sqlx::query_as(&format!(
            r#"
            SELECT {CONSUMABLE_COLUMNS} FROM consumables
            WHERE category_id = $1
            ORDER BY created_at, consumable_id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(category_id.as_uuid())
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Consumable::from).collect())
    }

    async fn update_consumable(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
        name: &ItemName,
        quantity: Quantity,
        description: Option<&Description>,
    ) -> InventoryResult<Option<Consumable>> {
        let row: Option<ConsumableRow> = sqlx::query_as(&format!(
            r#"
            UPDATE consumables SET name = $3, quantity = $4, description = $5
            WHERE consumable_id = $1 AND category_id = $2
            RETURNING {CONSUMABLE_COLUMNS}
            "#
        ))
        .bind(consumable_id.as_uuid())
        .bind(category_id.as_uuid())
        .bind(name.as_str())
        .bind(quantity.value())
        .bind(description.map(Description::as_str))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                InventoryError::ConsumableNameTaken
            } else {
                InventoryError::Database(e)
            }
        })?;

        Ok(row.map(Consumable::from))
    }

    async fn delete_consumable(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
    ) -> InventoryResult<bool> {
        // History rows go with it (ON DELETE CASCADE)
        let result =
            sqlx::query("DELETE FROM consumables WHERE consumable_id = $1 AND category_id = $2")
                .bind(consumable_id.as_uuid())
                .bind(category_id.as_uuid())
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// History Repository Implementation
// ============================================================================

impl HistoryRepository for PgInventoryRepository {
    async fn adjust_quantity(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
        adjustment: &Adjustment,
    ) -> InventoryResult<(Consumable, HistoryEntry)> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent adjustments of the same consumable
        let current: Consumable = sqlx::query_as::<_, ConsumableRow>(&format!(
            r#"
            SELECT {CONSUMABLE_COLUMNS} FROM consumables
            WHERE consumable_id = $1 AND category_id = $2
            FOR UPDATE
            "#
        ))
        .bind(consumable_id.as_uuid())
        .bind(category_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?
        .map(Consumable::from)
        .ok_or(InventoryError::ConsumableNotFound)?;

        let next = adjusted_quantity(
            current.quantity,
            adjustment.change,
            adjustment.enforce_non_negative,
        )?;

        let updated: ConsumableRow = sqlx::query_as(&format!(
            r#"
            UPDATE consumables SET quantity = $2
            WHERE consumable_id = $1
            RETURNING {CONSUMABLE_COLUMNS}
            "#
        ))
        .bind(consumable_id.as_uuid())
        .bind(next.value())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_check_violation(&e) {
                InventoryError::NegativeQuantity {
                    current: current.quantity.value(),
                    change: adjustment.change.value(),
                }
            } else {
                InventoryError::Database(e)
            }
        })?;

        let entry: HistoryRow = sqlx::query_as(
            r#"
            INSERT INTO consumable_history (consumable_id, modified_count, description)
            VALUES ($1, $2, $3)
            RETURNING history_id, consumable_id, modified_count, description, modified_time
            "#,
        )
        .bind(consumable_id.as_uuid())
        .bind(adjustment.change.value())
        .bind(adjustment.description.as_ref().map(Description::as_str))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((updated.into(), entry.into()))
    }

    async fn list_history(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
        page: Page,
    ) -> InventoryResult<Vec<HistoryEntry>> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            r#"
            SELECT h.history_id, h.consumable_id, h.modified_count, h.description, h.modified_time
            FROM consumable_history h
            JOIN consumables c ON c.consumable_id = h.consumable_id
            WHERE h.consumable_id = $1 AND c.category_id = $2
            ORDER BY h.history_id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(consumable_id.as_uuid())
        .bind(category_id.as_uuid())
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(HistoryEntry::from).collect())
    }

    async fn delete_history(
        &self,
        category_id: CategoryId,
        consumable_id: ConsumableId,
        history_id: i64,
    ) -> InventoryResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM consumable_history h
            USING consumables c
            WHERE h.history_id = $1
              AND h.consumable_id = $2
              AND c.consumable_id = h.consumable_id
              AND c.category_id = $3
            "#,
        )
        .bind(history_id)
        .bind(consumable_id.as_uuid())
        .bind(category_id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
