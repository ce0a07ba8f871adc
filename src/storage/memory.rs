use std::collections::HashMap;

use parking_lot::RwLock;

use super::SnapshotStore;
use crate::errors::Result;

/// Process-local store, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, slot: &str) -> Result<Option<String>> {
        Ok(self.slots.read().get(slot).cloned())
    }

    fn save(&self, slot: &str, contents: &str) -> Result<()> {
        self.slots
            .write()
            .insert(slot.to_string(), contents.to_string());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_independent() {
        let store = MemoryStore::new();
        assert_eq!(store.load("a").unwrap(), None);

        store.save("a", "[1]").unwrap();
        store.save("b", "[2]").unwrap();
        store.save("a", "[3]").unwrap();

        assert_eq!(store.load("a").unwrap().as_deref(), Some("[3]"));
        assert_eq!(store.load("b").unwrap().as_deref(), Some("[2]"));
    }
}
