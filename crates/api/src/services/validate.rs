//! Field-level validators shared by the mutation services.
//!
//! These are pure checks on already-parsed values; referential checks that
//! need the store live in the individual services.

use rust_decimal::Decimal;

use super::ServiceError;

/// Require a non-blank name.
///
/// # Errors
///
/// Returns `InvalidInput` when the name is empty or whitespace-only.
pub fn validate_name(name: &str) -> Result<(), ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::InvalidInput("Name is required.".to_owned()));
    }
    Ok(())
}

/// Require a strictly positive price.
///
/// # Errors
///
/// Returns `InvalidInput` when the price is zero or negative.
pub fn validate_price(price: Decimal) -> Result<(), ServiceError> {
    if price <= Decimal::ZERO {
        return Err(ServiceError::InvalidInput(
            "Price must be positive.".to_owned(),
        ));
    }
    Ok(())
}

/// Require a non-negative stock count.
///
/// # Errors
///
/// Returns `InvalidInput` when the stock is negative.
pub fn validate_stock(stock: i32) -> Result<(), ServiceError> {
    if stock < 0 {
        return Err(ServiceError::InvalidInput(
            "Stock cannot be negative.".to_owned(),
        ));
    }
    Ok(())
}
