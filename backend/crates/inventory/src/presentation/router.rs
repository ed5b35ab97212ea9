//! Inventory Router
//!
//! Mounted under `/categories`; install the auth middleware around it.

use axum::Router;
use axum::routing::{delete, get, post};
use std::sync::Arc;

use crate::application::config::InventoryConfig;
use crate::domain::repository::InventoryRepository;
use crate::infra::postgres::PgInventoryRepository;
use crate::presentation::handlers::{self, InventoryAppState};

/// Create the Inventory router with PostgreSQL repository
pub fn inventory_router(repo: PgInventoryRepository, config: Arc<InventoryConfig>) -> Router {
    inventory_router_generic(Arc::new(repo), config)
}

/// Create a generic Inventory router for any repository implementation
pub fn inventory_router_generic<R>(repo: Arc<R>, config: Arc<InventoryConfig>) -> Router
where
    R: InventoryRepository,
{
    let state = InventoryAppState { repo, config };

    Router::new()
        .route(
            "/",
            post(handlers::create_category::<R>).get(handlers::list_categories::<R>),
        )
        .route(
            "/{category_id}",
            get(handlers::get_category::<R>)
                .put(handlers::update_category::<R>)
                .delete(handlers::delete_category::<R>),
        )
        .route(
            "/{category_id}/consumables",
            post(handlers::create_consumable::<R>).get(handlers::list_consumables::<R>),
        )
        .route(
            "/{category_id}/consumables/{consumable_id}",
            get(handlers::get_consumable::<R>)
                .put(handlers::update_consumable::<R>)
                .delete(handlers::delete_consumable::<R>),
        )
        .route(
            "/{category_id}/consumables/{consumable_id}/history",
            post(handlers::adjust_quantity::<R>).get(handlers::list_history::<R>),
        )
        .route(
            "/{category_id}/consumables/{consumable_id}/history/{history_id}",
            delete(handlers::delete_history::<R>),
        )
        .with_state(state)
}
