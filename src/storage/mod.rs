//! Durable storage
//!
//! Two independent string slots: the full list of shortened URLs and the
//! event-log ring buffer. Each write replaces the whole slot.

mod file;
mod memory;
pub mod models;

use std::sync::Arc;

use tracing::info;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use models::{ClickEvent, LinkStats, ShortenedUrl};

use crate::config::StorageConfig;
use crate::errors::{Result, SnaplinkError};

/// Slot holding the serialized `Vec<ShortenedUrl>`
pub const SLOT_URLS: &str = "shortened_urls";
/// Slot holding the serialized event-log ring buffer
pub const SLOT_EVENTS: &str = "event_log";

pub trait SnapshotStore: Send + Sync {
    /// Reads a slot; `Ok(None)` when it has never been written
    fn load(&self, slot: &str) -> Result<Option<String>>;

    /// Replaces a slot's contents
    fn save(&self, slot: &str, contents: &str) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}

pub struct StorageFactory;

impl StorageFactory {
    pub fn create(config: &StorageConfig) -> Result<Arc<dyn SnapshotStore>> {
        let store: Arc<dyn SnapshotStore> = match config.backend.as_str() {
            "memory" => Arc::new(MemoryStore::new()),
            "file" => Arc::new(FileStore::new(&config.data_dir)?),
            other => {
                return Err(SnaplinkError::config(format!(
                    "Unknown storage backend '{}'. Valid: file, memory",
                    other
                )));
            }
        };
        info!("Using storage backend: {}", store.backend_name());
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_memory() {
        let config = StorageConfig {
            backend: "memory".to_string(),
            ..Default::default()
        };
        let store = StorageFactory::create(&config).unwrap();
        assert_eq!(store.backend_name(), "memory");
    }

    #[test]
    fn test_factory_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = StorageConfig {
            backend: "file".to_string(),
            data_dir: dir.path().join("data").to_string_lossy().into_owned(),
        };
        let store = StorageFactory::create(&config).unwrap();
        assert_eq!(store.backend_name(), "file");
    }

    #[test]
    fn test_factory_unknown_backend() {
        let config = StorageConfig {
            backend: "redis".to_string(),
            ..Default::default()
        };
        let err = StorageFactory::create(&config).err().unwrap();
        assert!(matches!(err, SnaplinkError::Config(_)));
    }
}
