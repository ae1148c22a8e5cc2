use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::domain::MatchRecord;
use crate::store::Store;

/// An immutable record set as of one refresh.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub records: Vec<MatchRecord>,
    /// `None` until the first replace.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// In-memory store. Replacement swaps an `Arc`, so the lock is only held
/// for a pointer copy and readers never observe a half-written list.
#[derive(Debug, Default)]
pub struct MemoryStore {
    current: RwLock<Arc<Snapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn replace(&self, records: Vec<MatchRecord>) {
        let next = Arc::new(Snapshot {
            records,
            refreshed_at: Some(Utc::now()),
        });

        // A poisoned lock still holds a complete Arc.
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = next;
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        let current = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&current)
    }
}
