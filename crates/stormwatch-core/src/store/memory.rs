// ── In-memory subscriber store ──
//
// Concurrent map keyed by address. Each slot carries its insertion sequence
// so listings come back in first-seen order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::{SubscriberStore, UpsertOutcome, validate};
use crate::error::CoreError;
use crate::model::Subscriber;

struct Slot {
    seq: u64,
    subscriber: Arc<Subscriber>,
}

pub struct MemoryStore {
    by_address: DashMap<String, Slot>,
    /// Insertion counter; an update keeps its original position.
    next_seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            by_address: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Seed a store; later duplicates replace earlier ones.
    pub fn with_subscribers(subscribers: impl IntoIterator<Item = Subscriber>) -> Self {
        let store = Self::new();
        for subscriber in subscribers {
            store.insert(subscriber);
        }
        store
    }

    /// Subscribers in insertion order.
    pub fn snapshot(&self) -> Vec<Arc<Subscriber>> {
        let mut entries: Vec<(u64, Arc<Subscriber>)> = self
            .by_address
            .iter()
            .map(|r| (r.seq, Arc::clone(&r.subscriber)))
            .collect();
        entries.sort_unstable_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, s)| s).collect()
    }

    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn insert(&self, subscriber: Subscriber) -> UpsertOutcome {
        let subscriber = Arc::new(subscriber);
        match self.by_address.entry(subscriber.address.clone()) {
            Entry::Occupied(mut slot) => {
                slot.get_mut().subscriber = subscriber;
                UpsertOutcome::Updated
            }
            Entry::Vacant(slot) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                slot.insert(Slot { seq, subscriber });
                UpsertOutcome::Inserted
            }
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriberStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Subscriber>, CoreError> {
        Ok(self.snapshot().iter().map(|s| (**s).clone()).collect())
    }

    async fn upsert(&self, mut subscriber: Subscriber) -> Result<UpsertOutcome, CoreError> {
        validate(&mut subscriber)?;
        Ok(self.insert(subscriber))
    }
}
