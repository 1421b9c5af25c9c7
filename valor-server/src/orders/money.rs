//! Money calculation utilities using rust_decimal for precision
//!
//! Prices are stored as `f64`; totals are computed in `Decimal` and rounded
//! to 2 decimal places (half away from zero) before being stored.

use rust_decimal::prelude::*;

use crate::db::models::OrderItem;
use crate::utils::AppError;

/// Rounding precision for monetary values
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per item
pub const MAX_PRICE: f64 = 10_000_000.0;
/// Maximum allowed quantity per item
pub const MAX_QUANTITY: i64 = 9999;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Validate that a price is finite, non-negative and within bounds
pub fn validate_price(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number"
        )));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    if value > MAX_PRICE {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_PRICE}), got {value}"
        )));
    }
    Ok(())
}

/// Validate a single order line
pub fn validate_order_item(item: &OrderItem, index: usize) -> Result<(), AppError> {
    if item.product_id.trim().is_empty() {
        return Err(AppError::validation(format!(
            "items[{index}].product_id must not be empty"
        )));
    }
    if item.name.trim().is_empty() {
        return Err(AppError::validation(format!(
            "items[{index}].name must not be empty"
        )));
    }
    validate_price(item.price, &format!("items[{index}].price"))?;
    if item.quantity < 1 {
        return Err(AppError::validation(format!(
            "items[{index}].quantity must be at least 1, got {}",
            item.quantity
        )));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "items[{index}].quantity exceeds maximum allowed ({MAX_QUANTITY})"
        )));
    }
    Ok(())
}

/// Σ price × quantity, rounded to cents
pub fn order_total(items: &[OrderItem]) -> f64 {
    let total: Decimal = items
        .iter()
        .map(|item| to_decimal(item.price) * Decimal::from(item.quantity))
        .sum();
    to_f64(total)
}
