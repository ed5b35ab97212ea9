//! Domain Services
//!
//! Pure quantity arithmetic shared by every repository implementation.

use crate::domain::value_objects::{Quantity, QuantityChange};
use crate::error::{InventoryError, InventoryResult};

/// Quantity after applying `change`.
///
/// With `enforce_non_negative` a result below zero is rejected; without it
/// the storage constraint is the last line.
pub fn adjusted_quantity(
    current: Quantity,
    change: QuantityChange,
    enforce_non_negative: bool,
) -> InventoryResult<Quantity> {
    let next = current
        .value()
        .checked_add(change.value())
        .ok_or(InventoryError::QuantityOutOfRange)?;

    if enforce_non_negative && next < 0 {
        return Err(InventoryError::NegativeQuantity {
            current: current.value(),
            change: change.value(),
        });
    }

    Ok(Quantity::from_db(next))
}
