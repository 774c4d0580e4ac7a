//! Shared input validation helpers.
//!
//! DTOs derive [`validator::Validate`]; [`validate_input`] runs the derived
//! checks and folds any failures into a single [`CoreError::Validation`].
//! The `custom` validators here cover [`Money`] fields, which the built-in
//! `range` validator does not support.

use rust_decimal::Decimal;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::types::Money;

/// Largest price, budget or payment accepted, in whole currency units.
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000;

/// [`MAX_AMOUNT_UNITS`] as [`Money`].
pub fn max_amount() -> Money {
    Decimal::from(MAX_AMOUNT_UNITS)
}

/// Run the derived validation rules on `input`.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input.validate().map_err(|e| CoreError::Validation(describe(&e)))
}

/// Flatten `ValidationErrors` into `field: message` pairs, sorted by field.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: {}", err.code),
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

/// `custom` validator: amount must be within `0..=MAX_AMOUNT_UNITS`.
pub fn non_negative_amount(value: &Money) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("must not be negative".into());
        return Err(err);
    }
    if *value > max_amount() {
        let mut err = ValidationError::new("max_amount");
        err.message = Some(format!("must not exceed {MAX_AMOUNT_UNITS}").into());
        return Err(err);
    }
    Ok(())
}

/// `custom` validator: every amount in the list must be within
/// `0..=MAX_AMOUNT_UNITS`.
pub fn non_negative_amounts(values: &[Money]) -> Result<(), ValidationError> {
    if values.iter().any(|v| *v < Decimal::ZERO) {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("payments must not be negative".into());
        return Err(err);
    }
    if values.iter().any(|v| *v > max_amount()) {
        let mut err = ValidationError::new("max_amount");
        err.message = Some(format!("payments must not exceed {MAX_AMOUNT_UNITS}").into());
        return Err(err);
    }
    Ok(())
}

/// `custom` validator: name must contain something other than whitespace.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Reject a payment amount that is not positive or is above the amount cap.
pub fn validate_payment_amount(amount: Money) -> Result<(), CoreError> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "Payment amount must be greater than 0, got {amount}"
        )));
    }
    if amount > max_amount() {
        return Err(CoreError::Validation(format!(
            "Payment amount must not exceed {MAX_AMOUNT_UNITS}, got {amount}"
        )));
    }
    Ok(())
}
