//! Application Configuration

/// Inventory application configuration
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Reject adjustments that would take a quantity below zero
    pub enforce_non_negative_quantity: bool,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            enforce_non_negative_quantity: true,
        }
    }
}
