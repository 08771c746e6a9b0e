//! # Argument Validation
//!
//! Checks run before an operation reads or writes anything. Non-finite numbers
//! are rejected everywhere: a NaN would slip past every `<` / `<=` comparison.

use crate::domain::errors::LedgerError;

/// Reject empty (or whitespace-only) identifiers.
pub fn require_id(field: &str, value: &str) -> Result<(), LedgerError> {
    if value.trim().is_empty() {
        return Err(LedgerError::invalid(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Require a finite, strictly positive amount.
pub fn require_positive(field: &str, value: f64) -> Result<(), LedgerError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(LedgerError::invalid(format!(
            "{field} must be positive, got {value}"
        )));
    }
    Ok(())
}

/// Require a finite amount that is zero or more.
pub fn require_non_negative(field: &str, value: f64) -> Result<(), LedgerError> {
    if !value.is_finite() || value < 0.0 {
        return Err(LedgerError::invalid(format!(
            "{field} cannot be negative, got {value}"
        )));
    }
    Ok(())
}

/// Require `left * right` to stay in the finite range.
pub fn require_finite_product(field: &str, left: f64, right: f64) -> Result<(), LedgerError> {
    if !(left * right).is_finite() {
        return Err(LedgerError::invalid(format!(
            "{field} overflows: {left} * {right}"
        )));
    }
    Ok(())
}

/// Reject moves whose two sides are the same account.
pub fn require_distinct(left_field: &str, left: &str, right_field: &str, right: &str) -> Result<(), LedgerError> {
    if left == right {
        return Err(LedgerError::invalid(format!(
            "{left_field} and {right_field} must differ (both are {left})"
        )));
    }
    Ok(())
}
