use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One shortening request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenedUrl {
    pub id: String,
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Flips to false exactly once, when the sweep sees the deadline pass
    pub is_active: bool,
    #[serde(default)]
    pub click_count: u64,
    #[serde(default)]
    pub clicks: Vec<ClickEvent>,
}

impl ShortenedUrl {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Active flag set and deadline not yet passed
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired_at(now)
    }
}

/// One successful redirect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub user_agent: String,
    pub referrer: String,
    /// Always the masked placeholder, never the caller's address
    pub ip_address: String,
    pub location: String,
}

/// Dashboard counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub total_clicks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(now: DateTime<Utc>) -> ShortenedUrl {
        ShortenedUrl {
            id: "id-1".to_string(),
            original_url: "https://example.com".to_string(),
            short_code: "abc123".to_string(),
            created_at: now,
            expires_at: now + Duration::minutes(1),
            is_active: true,
            click_count: 0,
            clicks: Vec::new(),
        }
    }

    #[test]
    fn test_live_until_deadline() {
        let now = Utc::now();
        let link = sample(now);
        assert!(link.is_live_at(now));
        assert!(link.is_live_at(now + Duration::minutes(1)));
        assert!(!link.is_live_at(now + Duration::seconds(61)));
    }

    #[test]
    fn test_inactive_is_never_live() {
        let now = Utc::now();
        let mut link = sample(now);
        link.is_active = false;
        assert!(!link.is_live_at(now));
    }

    #[test]
    fn test_serialized_field_names() {
        let link = sample(Utc::now());
        let json = serde_json::to_value(&link).unwrap();
        assert!(json.get("originalUrl").is_some());
        assert!(json.get("shortCode").is_some());
        assert!(json.get("isActive").is_some());
        assert!(json.get("clickCount").is_some());
    }

    #[test]
    fn test_timestamps_round_trip_exactly() {
        let link = sample(Utc::now());
        let json = serde_json::to_string(&link).unwrap();
        let back: ShortenedUrl = serde_json::from_str(&json).unwrap();
        assert_eq!(back.created_at, link.created_at);
        assert_eq!(back, link);
    }
}
