use super::ValidationReport;

pub const MIN_CODE_LENGTH: usize = 3;
pub const MAX_CODE_LENGTH: usize = 20;

/// Codes that would shadow application routes, compared case-insensitively
pub const RESERVED_CODES: &[&str] = &["admin", "api", "www", "app", "stats", "analytics"];

pub fn is_code_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Validates a user-supplied short code.
///
/// An empty code means "generate one for me" and is always valid.
pub fn validate_short_code(code: &str) -> ValidationReport {
    let mut report = ValidationReport::default();
    if code.is_empty() {
        return report;
    }

    let len = code.chars().count();
    if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&len) {
        report.push(format!(
            "Short code must be between {} and {} characters",
            MIN_CODE_LENGTH, MAX_CODE_LENGTH
        ));
    }

    if !code.chars().all(is_code_char) {
        report.push("Short code may only contain letters, numbers, hyphens and underscores");
    }

    let lower = code.to_lowercase();
    if RESERVED_CODES.contains(&lower.as_str()) {
        report.push(format!("Short code '{}' is reserved", code));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_code_is_valid() {
        assert!(validate_short_code("").is_valid());
    }

    #[test]
    fn test_length_bounds() {
        assert!(!validate_short_code("ab").is_valid());
        assert!(validate_short_code("abc").is_valid());
        assert!(validate_short_code(&"a".repeat(20)).is_valid());
        assert!(!validate_short_code(&"a".repeat(21)).is_valid());
    }

    #[test]
    fn test_charset() {
        assert!(validate_short_code("my-link_01").is_valid());
        assert!(!validate_short_code("has space").is_valid());
        assert!(!validate_short_code("dot.code").is_valid());
        assert!(!validate_short_code("slash/code").is_valid());
        assert!(!validate_short_code("ünïcode").is_valid());
    }

    #[test]
    fn test_reserved_words_case_insensitive() {
        for code in ["admin", "API", "Www", "app", "STATS", "Analytics"] {
            let report = validate_short_code(code);
            assert!(!report.is_valid(), "{} should be reserved", code);
        }
        assert!(validate_short_code("admins").is_valid());
    }

    #[test]
    fn test_multiple_violations() {
        let report = validate_short_code("a!");
        assert_eq!(report.errors.len(), 2);
    }
}
