//! Input validation for Bistro Ledger
//!
//! Everything here runs before a value reaches the ledger or the sales
//! recorder; a failure means no state changes.

use thiserror::Error;

/// Rejected caller input
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("'{0}' is not a number")]
    NotNumeric(String),

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} must be at most {max}")]
    TooLarge { field: &'static str, max: i64 },

    #[error("{field} is too large for the totals to be represented")]
    OutOfRange { field: &'static str },

    #[error("Platform fee must be a fraction in [0, 1), got {0}")]
    FeeOutOfRange(f64),

    #[error("'{0}' is not a date (YYYY-MM-DD) or timestamp (YYYY-MM-DD HH:MM:SS)")]
    InvalidTimestamp(String),
}

impl ValidationError {
    /// Name of the offending field, when there is one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::Required { field }
            | ValidationError::NotPositive { field }
            | ValidationError::TooLarge { field, .. }
            | ValidationError::OutOfRange { field } => Some(*field),
            ValidationError::FeeOutOfRange(_) => Some("platform_fee"),
            ValidationError::NotNumeric(_) | ValidationError::InvalidTimestamp(_) => None,
        }
    }
}

// ============================================================================
// Catalog Validations
// ============================================================================

/// Trim a display name and reject it when nothing is left
pub fn validate_name(field: &'static str, name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(trimmed.to_string())
}

/// Collapse a blank optional text to `None`
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Finite and strictly positive
pub fn validate_positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NotPositive { field })
    }
}

// ============================================================================
// Purchase / Sale Validations
// ============================================================================

/// Largest quantity a single sale may carry; keeps report sums inside `i64`
pub const MAX_SALE_QUANTITY: i64 = 1_000_000;

/// Preconditions of a purchase: non-empty name, positive quantity and price,
/// and a line total that stays finite
pub fn validate_purchase(
    ingredient_name: &str,
    quantity: f64,
    unit_price: f64,
) -> Result<String, ValidationError> {
    let name = validate_name("ingredient_name", ingredient_name)?;
    validate_positive("quantity", quantity)?;
    validate_positive("unit_price", unit_price)?;
    if !(quantity * unit_price).is_finite() {
        return Err(ValidationError::OutOfRange {
            field: "unit_price",
        });
    }
    Ok(name)
}

/// Fee fraction must lie in `[0, 1)`; percentages are not rescaled here
pub fn validate_fee_fraction(fee: f64) -> Result<f64, ValidationError> {
    if fee.is_finite() && (0.0..1.0).contains(&fee) {
        Ok(fee)
    } else {
        Err(ValidationError::FeeOutOfRange(fee))
    }
}

/// Preconditions of a sale: quantity in `1..=MAX_SALE_QUANTITY`, positive price,
/// fee in range, and a gross total that stays finite
pub fn validate_sale(quantity: i64, unit_price: f64, fee: f64) -> Result<(), ValidationError> {
    if quantity <= 0 {
        return Err(ValidationError::NotPositive { field: "quantity" });
    }
    if quantity > MAX_SALE_QUANTITY {
        return Err(ValidationError::TooLarge {
            field: "quantity",
            max: MAX_SALE_QUANTITY,
        });
    }
    validate_positive("unit_price", unit_price)?;
    validate_fee_fraction(fee)?;
    // With the fee below 1, a finite gross keeps fee and net finite too
    if !(unit_price * quantity as f64).is_finite() {
        return Err(ValidationError::OutOfRange {
            field: "unit_price",
        });
    }
    Ok(())
}

/// Interpret a fee typed by a person: values above 1 are read as percentages.
///
/// This belongs to input forms; the recorder only ever sees fractions.
pub fn normalize_fee_input(raw: f64) -> f64 {
    if raw > 1.0 {
        raw / 100.0
    } else {
        raw
    }
}
