//! Append-only event log
//!
//! Every notable action in the registry lands here as a [`LogEvent`] tagged
//! with the process session id. The list is persisted to its own storage
//! slot after every write and capped to the most recent `capacity` events,
//! oldest dropped first.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString};
use tracing::{error, info, warn};

use crate::clock::Clock;
use crate::config::PrivacyConfig;
use crate::storage::{SLOT_EVENTS, SnapshotStore};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    pub level: LogLevel,
    pub action: String,
    pub details: Map<String, Value>,
}

pub struct EventLog {
    session_id: String,
    capacity: usize,
    jurisdiction: String,
    compliance: String,
    store: Arc<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
    events: Mutex<VecDeque<LogEvent>>,
}

impl EventLog {
    /// Opens the log, picking up whatever was persisted by earlier sessions
    pub fn open(
        store: Arc<dyn SnapshotStore>,
        clock: Arc<dyn Clock>,
        capacity: usize,
        privacy: &PrivacyConfig,
    ) -> Self {
        let log = Self {
            session_id: format!("session_{}", uuid::Uuid::new_v4().simple()),
            capacity: capacity.max(1),
            jurisdiction: privacy.jurisdiction.clone(),
            compliance: privacy.compliance.clone(),
            store,
            clock,
            events: Mutex::new(VecDeque::new()),
        };
        log.reload();
        log
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn info(&self, action: &str, details: Value) -> LogEvent {
        self.append(LogLevel::Info, action, details)
    }

    pub fn warn(&self, action: &str, details: Value) -> LogEvent {
        self.append(LogLevel::Warn, action, details)
    }

    pub fn error(&self, action: &str, details: Value) -> LogEvent {
        self.append(LogLevel::Error, action, details)
    }

    /// Appends an event and persists the whole buffer.
    ///
    /// `details` is expected to be a JSON object; any other value is kept
    /// under a `"value"` key. The jurisdiction/compliance annotation is
    /// always added.
    pub fn append(&self, level: LogLevel, action: &str, details: Value) -> LogEvent {
        let mut details = match details {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        details.insert(
            "jurisdiction".to_string(),
            Value::String(self.jurisdiction.clone()),
        );
        details.insert(
            "compliance".to_string(),
            Value::String(self.compliance.clone()),
        );

        let event = LogEvent {
            timestamp: self.clock.now(),
            session_id: self.session_id.clone(),
            level,
            action: action.to_string(),
            details,
        };

        mirror_to_tracing(&event);

        let mut events = self.events.lock();
        events.push_back(event.clone());
        while events.len() > self.capacity {
            events.pop_front();
        }
        self.persist(&events);

        event
    }

    /// Snapshot of the in-memory list, oldest first
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Replaces the in-memory list with the persisted one and returns it.
    ///
    /// An unreadable slot leaves the in-memory list untouched.
    pub fn reload(&self) -> Vec<LogEvent> {
        let mut events = self.events.lock();
        match self.store.load(SLOT_EVENTS) {
            Ok(Some(content)) => match serde_json::from_str::<Vec<LogEvent>>(&content) {
                Ok(loaded) => {
                    let skip = loaded.len().saturating_sub(self.capacity);
                    *events = loaded.into_iter().skip(skip).collect();
                    info!("Loaded {} persisted log events", events.len());
                }
                Err(e) => error!("Failed to parse persisted event log: {}", e),
            },
            Ok(None) => {}
            Err(e) => error!("Failed to read persisted event log: {}", e),
        }
        events.iter().cloned().collect()
    }

    // Write failures stay here: the log is the place errors would be reported to.
    fn persist(&self, events: &VecDeque<LogEvent>) {
        let result = serde_json::to_string(events)
            .map_err(crate::errors::SnaplinkError::from)
            .and_then(|json| self.store.save(SLOT_EVENTS, &json));
        if let Err(e) = result {
            error!("Failed to persist event log: {}", e);
        }
    }
}

fn mirror_to_tracing(event: &LogEvent) {
    let details = Value::Object(event.details.clone());
    match event.level {
        LogLevel::Info => info!(action = %event.action, %details, "event"),
        LogLevel::Warn => warn!(action = %event.action, %details, "event"),
        LogLevel::Error => error!(action = %event.action, %details, "event"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::errors::{Result, SnaplinkError};
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn open_log(store: Arc<dyn SnapshotStore>, capacity: usize) -> EventLog {
        EventLog::open(
            store,
            Arc::new(ManualClock::starting_now()),
            capacity,
            &PrivacyConfig::default(),
        )
    }

    struct BrokenStore;

    impl SnapshotStore for BrokenStore {
        fn load(&self, _slot: &str) -> Result<Option<String>> {
            Err(SnaplinkError::storage_unavailable("disk gone"))
        }

        fn save(&self, _slot: &str, _contents: &str) -> Result<()> {
            Err(SnaplinkError::storage_unavailable("disk gone"))
        }

        fn backend_name(&self) -> &'static str {
            "broken"
        }
    }

    #[test]
    fn test_append_stamps_session_and_annotation() {
        let log = open_log(Arc::new(MemoryStore::new()), 10);
        let event = log.info("url_created", json!({ "shortCode": "abc" }));

        assert_eq!(event.session_id, log.session_id());
        assert_eq!(event.level, LogLevel::Info);
        assert_eq!(event.action, "url_created");
        assert_eq!(event.details["shortCode"], "abc");
        assert_eq!(event.details["jurisdiction"], "India");
        assert!(event.details.contains_key("compliance"));
    }

    #[test]
    fn test_session_id_is_constant() {
        let log = open_log(Arc::new(MemoryStore::new()), 10);
        let a = log.info("a", Value::Null);
        let b = log.error("b", Value::Null);
        assert_eq!(a.session_id, b.session_id);
        assert!(log.session_id().starts_with("session_"));
    }

    #[test]
    fn test_non_object_details_are_wrapped() {
        let log = open_log(Arc::new(MemoryStore::new()), 10);
        let event = log.warn("odd", json!(42));
        assert_eq!(event.details["value"], 42);
    }

    #[test]
    fn test_ring_buffer_drops_oldest() {
        let store: Arc<dyn SnapshotStore> = Arc::new(MemoryStore::new());
        let log = open_log(store.clone(), 3);
        for i in 0..5 {
            log.info(&format!("action_{}", i), Value::Null);
        }

        let actions: Vec<_> = log.events().into_iter().map(|e| e.action).collect();
        assert_eq!(actions, vec!["action_2", "action_3", "action_4"]);

        let persisted: Vec<LogEvent> =
            serde_json::from_str(&store.load(SLOT_EVENTS).unwrap().unwrap()).unwrap();
        assert_eq!(persisted.len(), 3);
        assert_eq!(persisted[0].action, "action_2");
    }

    #[test]
    fn test_reload_picks_up_previous_session() {
        let store: Arc<dyn SnapshotStore> = Arc::new(MemoryStore::new());
        let first = open_log(store.clone(), 10);
        first.info("one", Value::Null);
        first.warn("two", Value::Null);

        let second = open_log(store, 10);
        assert_ne!(first.session_id(), second.session_id());
        let events = second.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].level, LogLevel::Warn);
        assert_eq!(events[0].session_id, first.session_id());
    }

    #[test]
    fn test_reload_keeps_newest_when_over_capacity() {
        let store: Arc<dyn SnapshotStore> = Arc::new(MemoryStore::new());
        let wide = open_log(store.clone(), 10);
        for i in 0..5 {
            wide.info(&format!("action_{}", i), Value::Null);
        }

        let narrow = open_log(store, 3);
        assert_eq!(narrow.len(), 3);
        let actions: Vec<_> = narrow.events().into_iter().map(|e| e.action).collect();
        assert_eq!(actions, vec!["action_2", "action_3", "action_4"]);
    }

    #[test]
    fn test_storage_failure_is_swallowed() {
        let log = open_log(Arc::new(BrokenStore), 10);
        log.info("still_works", Value::Null);
        assert_eq!(log.len(), 1);
        assert_eq!(log.reload().len(), 1);
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::Error.to_string(), "ERROR");
        assert_eq!(
            serde_json::to_string(&LogLevel::Info).unwrap(),
            "\"INFO\""
        );
    }
}
