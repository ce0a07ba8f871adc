//! Shortened-URL registry
//!
//! Records live in two maps, id → record and short code → id. Every
//! mutation goes through [`RegistryState`] so both indexes always agree,
//! and the whole state sits behind one mutex: the active-link cap and
//! short-code uniqueness hold even when `shorten` is called from several
//! threads at once. Each mutation rewrites the full snapshot while the lock
//! is still held, so snapshot writes never interleave.

mod sweeper;

pub use sweeper::{ExpirySweeper, SweeperHandle};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde_json::json;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::{PrivacyConfig, RegistryConfig};
use crate::errors::{Result, SnaplinkError};
use crate::event_log::EventLog;
use crate::storage::{ClickEvent, LinkStats, SLOT_URLS, ShortenedUrl, SnapshotStore};
use crate::utils::generate_random_code;

#[derive(Debug, Default)]
struct RegistryState {
    by_id: HashMap<String, ShortenedUrl>,
    by_code: HashMap<String, String>,
}

impl RegistryState {
    fn insert(&mut self, record: ShortenedUrl) {
        self.by_code
            .insert(record.short_code.clone(), record.id.clone());
        self.by_id.insert(record.id.clone(), record);
    }

    fn remove(&mut self, id: &str) -> Option<ShortenedUrl> {
        let record = self.by_id.remove(id)?;
        self.by_code.remove(&record.short_code);
        Some(record)
    }

    fn code_taken(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    fn by_code(&self, code: &str) -> Option<&ShortenedUrl> {
        self.by_code.get(code).and_then(|id| self.by_id.get(id))
    }

    fn by_code_mut(&mut self, code: &str) -> Option<&mut ShortenedUrl> {
        let id = self.by_code.get(code)?;
        self.by_id.get_mut(id)
    }

    /// Flips every expired-but-flagged record to inactive
    fn deactivate_expired(&mut self, now: DateTime<Utc>) -> usize {
        let mut flipped = 0;
        for record in self.by_id.values_mut() {
            if record.is_active && record.is_expired_at(now) {
                record.is_active = false;
                flipped += 1;
            }
        }
        flipped
    }

    fn live_count(&self, now: DateTime<Utc>) -> usize {
        self.by_id.values().filter(|r| r.is_live_at(now)).count()
    }

    /// Newest first; equal timestamps fall back to short-code order
    fn sorted(&self) -> Vec<ShortenedUrl> {
        let mut records: Vec<ShortenedUrl> = self.by_id.values().cloned().collect();
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.short_code.cmp(&b.short_code))
        });
        records
    }
}

pub struct UrlRegistry {
    state: Mutex<RegistryState>,
    store: Arc<dyn SnapshotStore>,
    events: Arc<EventLog>,
    clock: Arc<dyn Clock>,
    config: RegistryConfig,
    privacy: PrivacyConfig,
}

impl UrlRegistry {
    /// Opens the registry and reloads the persisted snapshot.
    ///
    /// An unreadable or corrupt snapshot is logged and the registry starts
    /// empty; in-memory state is the source of truth from then on.
    pub fn open(
        store: Arc<dyn SnapshotStore>,
        events: Arc<EventLog>,
        clock: Arc<dyn Clock>,
        config: RegistryConfig,
        privacy: PrivacyConfig,
    ) -> Self {
        let registry = Self {
            state: Mutex::new(RegistryState::default()),
            store,
            events,
            clock,
            config,
            privacy,
        };

        let loaded = registry.load_snapshot();
        {
            let mut state = registry.state.lock();
            for record in loaded {
                if state.code_taken(&record.short_code) {
                    warn!(
                        "Skipping persisted record {} with duplicate short code '{}'",
                        record.id, record.short_code
                    );
                    continue;
                }
                state.insert(record);
            }
            info!("UrlRegistry: loaded {} records", state.by_id.len());
        }

        registry
    }

    fn load_snapshot(&self) -> Vec<ShortenedUrl> {
        let content = match self.store.load(SLOT_URLS) {
            Ok(Some(content)) => content,
            Ok(None) => return Vec::new(),
            Err(e) => {
                self.report_storage_error("storage_read_failed", &e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<ShortenedUrl>>(&content) {
            Ok(records) => records,
            Err(e) => {
                let err = SnaplinkError::storage_unavailable(format!(
                    "Corrupt URL snapshot: {}",
                    e
                ));
                self.report_storage_error("storage_read_failed", &err);
                Vec::new()
            }
        }
    }

    fn persist(&self, state: &RegistryState) {
        let result = serde_json::to_string(&state.sorted())
            .map_err(SnaplinkError::from)
            .and_then(|json| self.store.save(SLOT_URLS, &json));
        if let Err(e) = result {
            self.report_storage_error("storage_write_failed", &e);
        }
    }

    fn report_storage_error(&self, action: &str, err: &SnaplinkError) {
        error!("UrlRegistry: {}: {}", action, err);
        self.events.error(action, json!({ "error": err.message() }));
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Creates a new short link.
    ///
    /// An empty `custom_code` counts as absent. Generated codes are redrawn
    /// on collision up to `generated_code_attempts` times; a taken custom
    /// code fails straight away.
    pub fn shorten(
        &self,
        original_url: &str,
        custom_code: Option<&str>,
        ttl_minutes: Option<u32>,
    ) -> Result<ShortenedUrl> {
        let ttl_minutes = ttl_minutes.unwrap_or(self.config.default_ttl_minutes);
        let custom_code = custom_code.filter(|c| !c.is_empty());

        let mut state = self.state.lock();
        let now = self.clock.now();
        let id = Uuid::new_v4().to_string();

        let short_code = match custom_code {
            Some(code) if state.code_taken(code) => {
                self.events
                    .warn("duplicate_short_code", json!({ "shortCode": code }));
                return Err(SnaplinkError::duplicate_short_code(code));
            }
            Some(code) => code.to_string(),
            None => self.draw_unused_code(&state)?,
        };

        // Past-deadline records no longer hold a slot, flagged or not.
        let limit = self.config.max_active_links;
        if state.live_count(now) >= limit {
            self.events.warn(
                "concurrency_limit_reached",
                json!({ "limit": limit, "originalUrl": original_url }),
            );
            return Err(SnaplinkError::concurrency_limit_exceeded(limit));
        }

        let record = ShortenedUrl {
            id,
            original_url: original_url.to_string(),
            short_code,
            created_at: now,
            expires_at: now + Duration::minutes(i64::from(ttl_minutes)),
            is_active: true,
            click_count: 0,
            clicks: Vec::new(),
        };

        state.insert(record.clone());
        self.persist(&state);
        self.events.info(
            "url_created",
            json!({
                "id": record.id,
                "shortCode": record.short_code,
                "originalUrl": record.original_url,
                "expiresAt": record.expires_at,
                "customCode": custom_code.is_some(),
            }),
        );

        Ok(record)
    }

    fn draw_unused_code(&self, state: &RegistryState) -> Result<String> {
        let attempts = self.config.generated_code_attempts.max(1);
        let mut last = String::new();
        for attempt in 1..=attempts {
            last = generate_random_code(self.config.code_length);
            if !state.code_taken(&last) {
                return Ok(last);
            }
            debug!(
                "Generated code '{}' collided (attempt {}/{})",
                last, attempt, attempts
            );
        }
        self.events
            .warn("duplicate_short_code", json!({ "shortCode": last, "generated": true }));
        Err(SnaplinkError::duplicate_short_code(last))
    }

    /// Returns the record only while it is active and before its deadline
    pub fn lookup_by_short_code(&self, code: &str) -> Option<ShortenedUrl> {
        let now = self.clock.now();
        self.state
            .lock()
            .by_code(code)
            .filter(|r| r.is_live_at(now))
            .cloned()
    }

    /// Fetches by id regardless of activity
    pub fn get(&self, id: &str) -> Option<ShortenedUrl> {
        self.state.lock().by_id.get(id).cloned()
    }

    /// Records one redirect. Returns false, changing nothing, when the code
    /// is unknown, inactive or past its deadline.
    pub fn record_click(&self, code: &str, user_agent: &str, referrer: &str) -> bool {
        let mut state = self.state.lock();
        let now = self.clock.now();

        let Some(record) = state.by_code_mut(code).filter(|r| r.is_live_at(now)) else {
            self.events
                .warn("click_rejected", json!({ "shortCode": code }));
            return false;
        };

        record.clicks.push(ClickEvent {
            id: Uuid::new_v4().to_string(),
            timestamp: now,
            user_agent: user_agent.to_string(),
            referrer: referrer.to_string(),
            ip_address: self.privacy.masked_ip.clone(),
            location: self.privacy.jurisdiction.clone(),
        });
        record.click_count += 1;
        let click_count = record.click_count;

        self.persist(&state);
        self.events.info(
            "click_recorded",
            json!({ "shortCode": code, "clickCount": click_count }),
        );
        true
    }

    /// Every record, newest first. The caller owns the copy.
    pub fn list_all(&self) -> Vec<ShortenedUrl> {
        self.state.lock().sorted()
    }

    /// Removes a record and frees its short code
    pub fn delete(&self, id: &str) -> bool {
        let mut state = self.state.lock();
        let Some(record) = state.remove(id) else {
            debug!("UrlRegistry: delete of unknown id '{}'", id);
            return false;
        };

        self.persist(&state);
        self.events.info(
            "url_deleted",
            json!({ "id": record.id, "shortCode": record.short_code }),
        );
        true
    }

    /// Deactivates every record whose deadline has passed.
    ///
    /// Records are never removed here; they stay visible in
    /// [`list_all`](Self::list_all) with `is_active == false`.
    pub fn sweep_expired(&self) -> usize {
        let mut state = self.state.lock();
        let flipped = state.deactivate_expired(self.clock.now());
        if flipped > 0 {
            self.persist(&state);
            self.events
                .info("urls_expired", json!({ "count": flipped }));
        }
        flipped
    }

    /// Records that are active and before their deadline
    pub fn active_count(&self) -> usize {
        let now = self.clock.now();
        self.state.lock().live_count(now)
    }

    pub fn stats(&self) -> LinkStats {
        let now = self.clock.now();
        let state = self.state.lock();
        let total = state.by_id.len();
        let active = state.live_count(now);
        LinkStats {
            total,
            active,
            inactive: total - active,
            total_clicks: state.by_id.values().map(|r| r.click_count).sum(),
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().by_id.is_empty()
    }
}
