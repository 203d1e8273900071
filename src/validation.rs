//! Submission checks for the add-transaction form.

use std::fmt;

use thiserror::Error;

/// The two text inputs of the add-transaction form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    Description,
    Amount,
}

impl InputField {
    pub const ALL: [InputField; 2] = [InputField::Description, InputField::Amount];

    pub fn as_str(&self) -> &'static str {
        match self {
            InputField::Description => "description",
            InputField::Amount => "amount",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("transaction description is empty")]
    InvalidDescription,
    #[error("transaction amount must be a positive number")]
    InvalidAmount,
}

impl ValidationError {
    /// Field that gets the error indicator.
    pub fn field(&self) -> InputField {
        match self {
            ValidationError::InvalidDescription => InputField::Description,
            ValidationError::InvalidAmount => InputField::Amount,
        }
    }

    /// Corrective text shown in place of the field's placeholder.
    pub fn hint(&self) -> &'static str {
        match self {
            ValidationError::InvalidDescription => "Input Transaction Description",
            ValidationError::InvalidAmount => "Input Valid Transaction Amount",
        }
    }
}

/// Checks the description before the amount and reports only the first failure.
pub fn validate(description: &str, amount: f64) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        return Err(ValidationError::InvalidDescription);
    }
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::InvalidAmount);
    }
    Ok(())
}

/// Numeric coercion of raw form input: blank is zero, garbage is NaN.
pub fn coerce_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_checked_first() {
        assert_eq!(validate("", 0.0), Err(ValidationError::InvalidDescription));
        assert_eq!(validate("   ", -3.0), Err(ValidationError::InvalidDescription));
    }

    #[test]
    fn amount_must_be_positive_and_finite() {
        assert_eq!(validate("Gift", 0.0), Err(ValidationError::InvalidAmount));
        assert_eq!(validate("Gift", -1.0), Err(ValidationError::InvalidAmount));
        assert_eq!(validate("Gift", f64::NAN), Err(ValidationError::InvalidAmount));
        assert_eq!(validate("Gift", f64::INFINITY), Err(ValidationError::InvalidAmount));
        assert_eq!(validate("Gift", 0.01), Ok(()));
    }

    #[test]
    fn coercion_follows_form_semantics() {
        assert_eq!(coerce_amount(""), 0.0);
        assert_eq!(coerce_amount("  250.5 "), 250.5);
        assert!(coerce_amount("twelve").is_nan());
    }

    #[test]
    fn errors_name_their_field() {
        assert_eq!(ValidationError::InvalidDescription.field(), InputField::Description);
        assert_eq!(ValidationError::InvalidAmount.field(), InputField::Amount);
        assert_eq!(ValidationError::InvalidAmount.hint(), "Input Valid Transaction Amount");
    }
}
