//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.

pub mod adjust_quantity;
pub mod category;
pub mod config;
pub mod consumable;
pub mod history;

// Re-exports
pub use adjust_quantity::{AdjustQuantityInput, AdjustQuantityOutput, AdjustQuantityUseCase};
pub use category::{CategoryInput, CategoryUseCase};
pub use config::InventoryConfig;
pub use consumable::{ConsumableInput, ConsumableUseCase};
pub use history::HistoryUseCase;
