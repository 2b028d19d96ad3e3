use thiserror::Error;

/// A payload rule was violated. The message names the offending field.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{0}")]
pub struct ValidationError(pub String);

pub fn require_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError(format!("{} must not be empty", field)));
    }
    Ok(())
}

pub fn require_non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(())
}

/// Discounts are percentages.
pub fn require_discount(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(ValidationError(
            "discount must be between 0 and 100".to_string(),
        ));
    }
    Ok(())
}
