//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Category, Consumable, HistoryEntry)
//! - Domain value objects (ItemName, Description, Quantity, QuantityChange)
//! - Domain services (quantity adjustment rule)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
