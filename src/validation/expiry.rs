use super::ValidationReport;

pub const MIN_EXPIRY_MINUTES: i64 = 1;
/// 30 days
pub const MAX_EXPIRY_MINUTES: i64 = 43_200;

pub fn validate_expiry_minutes(minutes: i64) -> ValidationReport {
    let mut report = ValidationReport::default();
    if minutes < MIN_EXPIRY_MINUTES {
        report.push("Expiry must be at least 1 minute");
    }
    if minutes > MAX_EXPIRY_MINUTES {
        report.push("Expiry cannot exceed 30 days (43200 minutes)");
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert!(!validate_expiry_minutes(0).is_valid());
        assert!(validate_expiry_minutes(1).is_valid());
        assert!(validate_expiry_minutes(43_200).is_valid());
        assert!(!validate_expiry_minutes(43_201).is_valid());
    }

    #[test]
    fn test_negative() {
        let report = validate_expiry_minutes(-5);
        assert_eq!(report.errors.len(), 1);
    }
}
