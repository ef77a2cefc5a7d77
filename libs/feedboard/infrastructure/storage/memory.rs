use super::{KeyValueStore, Result};
use std::collections::HashMap;

/// In-process store; counts writes so callers can observe write-through
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one entry
    pub fn with_entry(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self { entries, writes: 0 }
    }

    /// Number of `set` calls so far
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_vec());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_missing_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("blocks").unwrap(), None);
    }

    #[test]
    fn set_overwrites_and_counts() {
        let mut store = MemoryStore::with_entry("blocks", "[]");
        store.set("blocks", b"[1]").unwrap();
        store.set("blocks", b"[2]").unwrap();

        assert_eq!(store.get("blocks").unwrap(), Some(b"[2]".to_vec()));
        assert_eq!(store.write_count(), 2);
    }
}
