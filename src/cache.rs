//! Ephemeral result cache
//!
//! Process-wide map from attempt identifier to recovered bytes. Insertion
//! is the only mutation; there is no eviction, size bound, or persistence,
//! so entries live until the owning engine is dropped. The lock guarantees
//! a reader never observes a partially written buffer.

use ahash::AHashMap;
use chrono::Utc;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::types::AttemptId;

/// Concurrency-safe store of recovered buffers keyed by attempt id
pub struct ResultCache {
    entries: RwLock<AHashMap<String, Arc<Vec<u8>>>>,
    sequence: AtomicU64,
}

impl ResultCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(AHashMap::new()),
            sequence: AtomicU64::new(0),
        }
    }

    /// Mint a fresh attempt identifier.
    ///
    /// Timestamp plus a process-wide counter, so ids minted within the same
    /// second stay distinct.
    pub fn mint_id(&self) -> AttemptId {
        let stamp = Utc::now().format("%Y%m%d%H%M%S");
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        AttemptId(format!("attempt_{}_{}", stamp, seq))
    }

    /// Insert a recovered buffer under the given id
    pub fn put(&self, id: &AttemptId, bytes: Vec<u8>) {
        self.entries
            .write()
            .insert(id.as_str().to_string(), Arc::new(bytes));
    }

    /// Look up a recovered buffer; returns None for unknown ids
    pub fn get(&self, id: &str) -> Option<Arc<Vec<u8>>> {
        self.entries.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}
