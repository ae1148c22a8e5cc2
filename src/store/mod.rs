pub mod memory;

use std::sync::Arc;

use crate::domain::MatchRecord;

pub use memory::{MemoryStore, Snapshot};

/// Read/replace access to the latest scraped match list.
///
/// Readers always see one complete snapshot. An empty result does not say
/// whether the store was never filled or the last scrape found nothing.
pub trait Store {
    /// Swap in a new record set, dropping the previous one.
    fn replace(&self, records: Vec<MatchRecord>);

    fn snapshot(&self) -> Arc<Snapshot>;

    fn get_all(&self) -> Vec<MatchRecord> {
        self.snapshot().records.clone()
    }

    /// Records whose day equals `day` ignoring case, in page order.
    fn get_by_day(&self, day: &str) -> Vec<MatchRecord> {
        self.snapshot()
            .records
            .iter()
            .filter(|r| r.is_on(day))
            .cloned()
            .collect()
    }
}
