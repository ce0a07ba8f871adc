//! URL 验证
//!
//! 只允许 http/https，并在原始字符串层面拦截危险协议

use tracing::warn;
use url::Url;

use super::ValidationReport;

/// 危险协议列表
pub const BLOCKED_PATTERNS: &[&str] = &["javascript:", "data:", "vbscript:", "file:"];

/// Validates a destination URL.
///
/// Checks, all accumulated:
/// 1. not empty or whitespace (nothing else is checked for an empty input)
/// 2. parses as an absolute URL
/// 3. scheme is `http` or `https`
/// 4. the raw string contains none of [`BLOCKED_PATTERNS`], regardless of
///    what the parser made of it
pub fn validate_url(url: &str) -> ValidationReport {
    let mut report = ValidationReport::default();
    let trimmed = url.trim();

    if trimmed.is_empty() {
        report.push("URL is required");
        return report;
    }

    match Url::parse(trimmed) {
        Ok(parsed) => {
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                report.push("Only HTTP and HTTPS URLs are allowed");
            }
        }
        Err(e) => {
            report.push(format!("Invalid URL format: {}", e));
        }
    }

    // 字符串层面的二次检查
    // Matches anywhere in the string, so a path like `/metadata:1` is rejected too
    let lower = trimmed.to_lowercase();
    if let Some(pattern) = BLOCKED_PATTERNS.iter().find(|p| lower.contains(*p)) {
        warn!("Blocked URL containing dangerous pattern '{}'", pattern);
        report.push("URL contains a blocked protocol and may be malicious");
        report.blocked_pattern = Some(*pattern);
    }

    report
}
