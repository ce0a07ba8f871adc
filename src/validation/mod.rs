//! Input validation
//!
//! Pure checks run before a link is created. Every validator accumulates
//! all violations instead of stopping at the first one, so a rejected form
//! can show the user everything that needs fixing at once.

mod expiry;
mod short_code;
mod url_validator;

pub use expiry::{MAX_EXPIRY_MINUTES, MIN_EXPIRY_MINUTES, validate_expiry_minutes};
pub use short_code::{
    MAX_CODE_LENGTH, MIN_CODE_LENGTH, RESERVED_CODES, is_code_char, validate_short_code,
};
pub use url_validator::{BLOCKED_PATTERNS, validate_url};

use crate::errors::{Result, SnaplinkError};

/// Outcome of a validator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    /// Set when the input matched the dangerous-scheme blocklist
    pub blocked_pattern: Option<&'static str>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn push<T: Into<String>>(&mut self, error: T) {
        self.errors.push(error.into());
    }

    /// Folds another report into this one, keeping the first blocked pattern seen
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        if self.blocked_pattern.is_none() {
            self.blocked_pattern = other.blocked_pattern;
        }
    }

    pub fn into_result(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(SnaplinkError::ValidationFailed(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_accumulates_errors() {
        let mut report = validate_url("ftp://example.com");
        report.merge(validate_short_code("a!"));
        report.merge(validate_expiry_minutes(0));

        assert!(!report.is_valid());
        assert!(report.errors.len() >= 4);
        assert!(report.blocked_pattern.is_none());
    }

    #[test]
    fn test_merge_keeps_blocked_pattern() {
        let mut report = ValidationReport::default();
        report.merge(validate_url("javascript:alert(1)"));
        report.merge(validate_short_code("abc"));
        assert_eq!(report.blocked_pattern, Some("javascript:"));
    }

    #[test]
    fn test_into_result() {
        assert!(validate_short_code("").into_result().is_ok());

        let err = validate_expiry_minutes(43201).into_result().unwrap_err();
        assert!(matches!(err, SnaplinkError::ValidationFailed(ref e) if e.len() == 1));
    }
}
