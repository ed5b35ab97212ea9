//! Inventory Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, quantity rules, repository traits
//! - `application/` - Use cases
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Resources
//! - Categories group consumables
//! - Consumables carry a stock quantity, scoped to one category
//! - History entries record every quantity adjustment; the adjustment and
//!   its history row are written in one transaction
//!
//! Every route sits behind the auth middleware, which attaches the
//! caller's `auth::AuthContext`.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use application::config::InventoryConfig;
pub use error::{InventoryError, InventoryResult};
pub use infra::postgres::PgInventoryRepository;
pub use presentation::router::{inventory_router, inventory_router_generic};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}
