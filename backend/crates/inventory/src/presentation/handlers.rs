//! HTTP Handlers
//!
//! Every handler runs behind `auth::middleware::require_auth_session`; the
//! mutating ones read the caller from the `AuthContext` extension and run
//! inside a span carrying the caller's id.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use std::sync::Arc;

use auth::AuthContext;
use kernel::id::{CategoryId, ConsumableId};
use kernel::pagination::{ListParams, Page};
use tracing::Instrument;

use crate::application::config::InventoryConfig;
use crate::application::{
    AdjustQuantityInput, AdjustQuantityUseCase, CategoryInput, CategoryUseCase, ConsumableInput,
    ConsumableUseCase, HistoryUseCase,
};
use crate::domain::repository::InventoryRepository;
use crate::error::{InventoryError, InventoryResult};
use crate::presentation::dto::{
    CategoriesEnvelope, CategoryEnvelope, CategoryRequest, CategoryResponse, ConsumableEnvelope,
    ConsumableRequest, ConsumableResponse, ConsumablesEnvelope, HistoryEnvelope, HistoryRequest,
    HistoryResponse, MessageResponse,
};

/// Shared state for inventory handlers
#[derive(Clone)]
pub struct InventoryAppState<R>
where
    R: InventoryRepository,
{
    pub repo: Arc<R>,
    pub config: Arc<InventoryConfig>,
}

fn actor_span(ctx: &AuthContext) -> tracing::Span {
    tracing::info_span!("inventory", user_id = %ctx.user.user_id)
}

fn page(params: Result<Query<ListParams>, QueryRejection>) -> InventoryResult<Page> {
    let Query(params) = params?;
    Ok(params.validate()?)
}

// Ids that do not parse cannot name an existing row
fn category_id(raw: &str) -> InventoryResult<CategoryId> {
    raw.parse().map_err(|_| InventoryError::CategoryNotFound)
}

fn consumable_id(raw: &str) -> InventoryResult<ConsumableId> {
    raw.parse().map_err(|_| InventoryError::ConsumableNotFound)
}

fn history_id(raw: &str) -> InventoryResult<i64> {
    raw.parse().map_err(|_| InventoryError::HistoryNotFound)
}

// ============================================================================
// Categories
// ============================================================================

/// POST /categories
pub async fn create_category<R: InventoryRepository>(
    State(state): State<InventoryAppState<R>>,
    Extension(ctx): Extension<AuthContext>,
    body: Result<Json<CategoryRequest>, JsonRejection>,
) -> InventoryResult<impl IntoResponse> {
    let Json(req) = body?;
    let category = CategoryUseCase::new(state.repo.clone())
        .create(CategoryInput {
            name: req.name,
            description: req.description,
        })
        .instrument(actor_span(&ctx))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryEnvelope {
            category: CategoryResponse::from(&category),
        }),
    ))
}

/// GET /categories
pub async fn list_categories<R: InventoryRepository>(
    State(state): State<InventoryAppState<R>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> InventoryResult<impl IntoResponse> {
    let page = page(params)?;
    let categories = CategoryUseCase::new(state.repo.clone()).list(page).await?;

    Ok(Json(CategoriesEnvelope {
        categories: categories.iter().map(CategoryResponse::from).collect(),
    }))
}

/// GET /categories/{category_id}
pub async fn get_category<R: InventoryRepository>(
    State(state): State<InventoryAppState<R>>,
    Path(raw_category_id): Path<String>,
) -> InventoryResult<impl IntoResponse> {
    let category = CategoryUseCase::new(state.repo.clone())
        .get(category_id(&raw_category_id)?)
        .await?;

    Ok(Json(CategoryEnvelope {
        category: CategoryResponse::from(&category),
    }))
}

/// PUT /categories/{category_id}
pub async fn update_category<R: InventoryRepository>(
    State(state): State<InventoryAppState<R>>,
    Extension(ctx): Extension<AuthContext>,
    Path(raw_category_id): Path<String>,
    body: Result<Json<CategoryRequest>, JsonRejection>,
) -> InventoryResult<impl IntoResponse> {
    let id = category_id(&raw_category_id)?;
    let Json(req) = body?;
    let category = CategoryUseCase::new(state.repo.clone())
        .update(
            id,
            CategoryInput {
                name: req.name,
                description: req.description,
            },
        )
        .instrument(actor_span(&ctx))
        .await?;

    Ok(Json(CategoryEnvelope {
        category: CategoryResponse::from(&category),
    }))
}

/// DELETE /categories/{category_id}
pub async fn delete_category<R: InventoryRepository>(
    State(state): State<InventoryAppState<R>>,
    Extension(ctx): Extension<AuthContext>,
    Path(raw_category_id): Path<String>,
) -> InventoryResult<impl IntoResponse> {
    CategoryUseCase::new(state.repo.clone())
        .delete(category_id(&raw_category_id)?)
        .instrument(actor_span(&ctx))
        .await?;

    Ok(Json(MessageResponse {
        message: "Consumable category deleted",
    }))
}

// ============================================================================
// Consumables
// ============================================================================

/// POST /categories/{category_id}/consumables
pub async fn create_consumable<R: InventoryRepository>(
    State(state): State<InventoryAppState<R>>,
    Extension(ctx): Extension<AuthContext>,
    Path(raw_category_id): Path<String>,
    body: Result<Json<ConsumableRequest>, JsonRejection>,
) -> InventoryResult<impl IntoResponse> {
    let id = category_id(&raw_category_id).map_err(|_| InventoryError::ParentCategoryMissing)?;
    let Json(req) = body?;
    let consumable = ConsumableUseCase::new(state.repo.clone())
        .create(
            id,
            ConsumableInput {
                name: req.name,
                quantity: req.quantity,
                description: req.description,
            },
        )
        .instrument(actor_span(&ctx))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ConsumableEnvelope {
            consumable: ConsumableResponse::from(&consumable),
        }),
    ))
}

/// GET /categories/{category_id}/consumables
pub async fn list_consumables<R: InventoryRepository>(
    State(state): State<InventoryAppState<R>>,
    Path(raw_category_id): Path<String>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> InventoryResult<impl IntoResponse> {
    let id = category_id(&raw_category_id)?;
    let page = page(params)?;
    let consumables = ConsumableUseCase::new(state.repo.clone())
        .list(id, page)
        .await?;

    Ok(Json(ConsumablesEnvelope {
        consumables: consumables.iter().map(ConsumableResponse::from).collect(),
    }))
}

/// GET /categories/{category_id}/consumables/{consumable_id}
pub async fn get_consumable<R: InventoryRepository>(
    State(state): State<InventoryAppState<R>>,
    Path((raw_category_id, raw_consumable_id)): Path<(String, String)>,
) -> InventoryResult<impl IntoResponse> {
    let consumable = ConsumableUseCase::new(state.repo.clone())
        .get(
            category_id(&raw_category_id)?,
            consumable_id(&raw_consumable_id)?,
        )
        .await?;

    Ok(Json(ConsumableEnvelope {
        consumable: ConsumableResponse::from(&consumable),
    }))
}

/// PUT /categories/{category_id}/consumables/{consumable_id}
pub async fn update_consumable<R: InventoryRepository>(
    State(state): State<InventoryAppState<R>>,
    Extension(ctx): Extension<AuthContext>,
    Path((raw_category_id, raw_consumable_id)): Path<(String, String)>,
    body: Result<Json<ConsumableRequest>, JsonRejection>,
) -> InventoryResult<impl IntoResponse> {
    let category = category_id(&raw_category_id)?;
    let consumable = consumable_id(&raw_consumable_id)?;
    let Json(req) = body?;
    let updated = ConsumableUseCase::new(state.repo.clone())
        .update(
            category,
            consumable,
            ConsumableInput {
                name: req.name,
                quantity: req.quantity,
                description: req.description,
            },
        )
        .instrument(actor_span(&ctx))
        .await?;

    Ok(Json(ConsumableEnvelope {
        consumable: ConsumableResponse::from(&updated),
    }))
}

/// DELETE /categories/{category_id}/consumables/{consumable_id}
pub async fn delete_consumable<R: InventoryRepository>(
    State(state): State<InventoryAppState<R>>,
    Extension(ctx): Extension<AuthContext>,
    Path((raw_category_id, raw_consumable_id)): Path<(String, String)>,
) -> InventoryResult<impl IntoResponse> {
    ConsumableUseCase::new(state.repo.clone())
        .delete(
            category_id(&raw_category_id)?,
            consumable_id(&raw_consumable_id)?,
        )
        .instrument(actor_span(&ctx))
        .await?;

    Ok(Json(MessageResponse {
        message: "Consumable deleted",
    }))
}

// ============================================================================
// History
// ============================================================================

/// POST /categories/{category_id}/consumables/{consumable_id}/history
///
/// Responds with a one element `history` list.
pub async fn adjust_quantity<R: InventoryRepository>(
    State(state): State<InventoryAppState<R>>,
    Extension(ctx): Extension<AuthContext>,
    Path((raw_category_id, raw_consumable_id)): Path<(String, String)>,
    body: Result<Json<HistoryRequest>, JsonRejection>,
) -> InventoryResult<impl IntoResponse> {
    let category = category_id(&raw_category_id)?;
    let consumable = consumable_id(&raw_consumable_id)?;
    let Json(req) = body?;
    let output = AdjustQuantityUseCase::new(state.repo.clone(), state.config.clone())
        .execute(
            category,
            consumable,
            AdjustQuantityInput {
                modified_count: req.modified_count,
                description: req.description,
            },
        )
        .instrument(actor_span(&ctx))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(HistoryEnvelope {
            history: vec![HistoryResponse::from(&output.entry)],
        }),
    ))
}

/// GET /categories/{category_id}/consumables/{consumable_id}/history
pub async fn list_history<R: InventoryRepository>(
    State(state): State<InventoryAppState<R>>,
    Path((raw_category_id, raw_consumable_id)): Path<(String, String)>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> InventoryResult<impl IntoResponse> {
    let category = category_id(&raw_category_id)?;
    let consumable = consumable_id(&raw_consumable_id)?;
    let page = page(params)?;
    let entries = HistoryUseCase::new(state.repo.clone())
        .list(category, consumable, page)
        .await?;

    Ok(Json(HistoryEnvelope {
        history: entries.iter().map(HistoryResponse::from).collect(),
    }))
}

/// DELETE /categories/{category_id}/consumables/{consumable_id}/history/{history_id}
pub async fn delete_history<R: InventoryRepository>(
    State(state): State<InventoryAppState<R>>,
    Extension(ctx): Extension<AuthContext>,
    Path((raw_category_id, raw_consumable_id, raw_history_id)): Path<(String, String, String)>,
) -> InventoryResult<impl IntoResponse> {
    HistoryUseCase::new(state.repo.clone())
        .delete(
            category_id(&raw_category_id)?,
            consumable_id(&raw_consumable_id)?,
            history_id(&raw_history_id)?,
        )
        .instrument(actor_span(&ctx))
        .await?;

    Ok(Json(MessageResponse {
        message: "History item deleted",
    }))
}
