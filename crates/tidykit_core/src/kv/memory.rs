//! Process-local key-value store with switchable failures.

use super::{KeyValueStore, KvError, KvResult};
use std::collections::HashMap;

/// In-memory `KeyValueStore` for tests and previews.
///
/// Reads and writes can be made to fail on demand to exercise rollback
/// paths in services.
#[derive(Debug, Default, Clone)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, Vec<u8>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one entry without going through the failure switches.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        if self.fail_reads {
            return Err(KvError::Unavailable {
                key: key.to_string(),
                operation: "get",
            });
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> KvResult<()> {
        if self.fail_writes {
            return Err(KvError::Unavailable {
                key: key.to_string(),
                operation: "set",
            });
        }
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> KvResult<()> {
        if self.fail_writes {
            return Err(KvError::Unavailable {
                key: key.to_string(),
                operation: "remove",
            });
        }
        self.entries.remove(key);
        Ok(())
    }
}
