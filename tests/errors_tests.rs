use snaplink::errors::{Result, SnaplinkError};
use std::error::Error;

#[cfg(test)]
mod error_creation_tests {
    use super::*;

    #[test]
    fn test_validation_failed_error() {
        let error = SnaplinkError::validation_failed(["URL is required", "Expiry must be at least 1 minute"]);

        assert!(matches!(error, SnaplinkError::ValidationFailed(ref e) if e.len() == 2));
        assert!(error.to_string().contains("Validation Failed"));
        assert!(error.to_string().contains("URL is required; Expiry"));
        assert_eq!(error.violations().len(), 2);
    }

    #[test]
    fn test_duplicate_short_code_error() {
        let error = SnaplinkError::duplicate_short_code("abc");

        assert!(matches!(error, SnaplinkError::DuplicateShortCode(_)));
        assert!(error.to_string().contains("'abc'"));
        assert!(error.violations().is_empty());
    }

    #[test]
    fn test_concurrency_limit_error() {
        let error = SnaplinkError::concurrency_limit_exceeded(5);

        assert_eq!(error, SnaplinkError::ConcurrencyLimitExceeded(5));
        assert!(error.message().contains("At most 5"));
    }

    #[test]
    fn test_storage_unavailable_error() {
        let error = SnaplinkError::storage_unavailable("disk full");

        assert!(error.to_string().contains("Storage Unavailable"));
        assert!(error.to_string().contains("disk full"));
    }

    #[test]
    fn test_not_found_and_config_errors() {
        assert!(matches!(SnaplinkError::not_found("x"), SnaplinkError::NotFound(_)));
        assert!(matches!(SnaplinkError::config("x"), SnaplinkError::Config(_)));
        assert!(matches!(
            SnaplinkError::serialization("x"),
            SnaplinkError::Serialization(_)
        ));
    }
}

#[cfg(test)]
mod error_code_tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            SnaplinkError::validation_failed(Vec::<String>::new()),
            SnaplinkError::duplicate_short_code(""),
            SnaplinkError::concurrency_limit_exceeded(0),
            SnaplinkError::storage_unavailable(""),
            SnaplinkError::serialization(""),
            SnaplinkError::not_found(""),
            SnaplinkError::config(""),
        ];

        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_format_simple() {
        let error = SnaplinkError::not_found("Link 'x' not found");
        assert_eq!(error.format_simple(), "Resource Not Found: Link 'x' not found");
    }

    #[test]
    fn test_format_colored_contains_code() {
        let error = SnaplinkError::duplicate_short_code("abc");
        let colored = error.format_colored();
        assert!(colored.contains("E002"));
        assert!(colored.contains("abc"));
    }
}

#[cfg(test)]
mod error_conversion_tests {
    use super::*;

    #[test]
    fn test_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: SnaplinkError = io_error.into();
        assert!(matches!(error, SnaplinkError::StorageUnavailable(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_error = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let error: SnaplinkError = json_error.into();
        assert!(matches!(error, SnaplinkError::Serialization(_)));
    }

    #[test]
    fn test_question_mark_propagation() {
        fn parse() -> Result<Vec<u8>> {
            Ok(serde_json::from_str("[1, 2")?)
        }
        assert!(parse().is_err());
    }

    #[test]
    fn test_is_std_error() {
        let error = SnaplinkError::config("bad");
        let dyn_error: &dyn Error = &error;
        assert!(dyn_error.source().is_none());
    }
}
