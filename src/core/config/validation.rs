//! Validation helper functions for configuration types.

use crate::core::errors::{PatchsplitError, Result};

/// Validate that a usize value is greater than zero.
pub fn validate_positive_usize(value: usize, field: &str) -> Result<()> {
    if value == 0 {
        return Err(PatchsplitError::validation_field(
            format!("{} must be greater than 0", field),
            field,
        ));
    }
    Ok(())
}

/// Validate that a ratio lies strictly inside (0.0, 1.0).
pub fn validate_open_unit_interval(value: f64, field: &str) -> Result<()> {
    if !(value > 0.0 && value < 1.0) {
        return Err(PatchsplitError::validation_field(
            format!("{} must be strictly between 0.0 and 1.0, got {}", field, value),
            field,
        ));
    }
    Ok(())
}

/// Validate that a file extension is dotted and non-trivial (e.g. `.java`).
pub fn validate_extension(value: &str, field: &str) -> Result<()> {
    if value.len() < 2 || !value.starts_with('.') {
        return Err(PatchsplitError::validation_field(
            format!("{} must start with '.' and name an extension, got '{}'", field, value),
            field,
        ));
    }
    Ok(())
}

/// Validate that a string setting is not blank.
pub fn validate_non_blank(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PatchsplitError::validation_field(
            format!("{} must not be empty", field),
            field,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_unit_interval_rejects_bounds() {
        assert!(validate_open_unit_interval(0.5, "ratio").is_ok());
        assert!(validate_open_unit_interval(0.0, "ratio").is_err());
        assert!(validate_open_unit_interval(1.0, "ratio").is_err());
        assert!(validate_open_unit_interval(f64::NAN, "ratio").is_err());
    }

    #[test]
    fn extension_must_be_dotted() {
        assert!(validate_extension(".java", "ext").is_ok());
        assert!(validate_extension("java", "ext").is_err());
        assert!(validate_extension(".", "ext").is_err());
    }

    #[test]
    fn positive_usize() {
        assert!(validate_positive_usize(3, "cap").is_ok());
        assert!(validate_positive_usize(0, "cap").is_err());
    }
}
