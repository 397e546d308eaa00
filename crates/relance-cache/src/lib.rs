//! relance-cache
//!
//! Time-bounded in-process store for transient questionnaire state. Entries
//! self-destruct when their TTL elapses. Explicitly not durable — a process
//! restart loses everything, which is why every write is mirrored
//! best-effort to durable storage by the caller.

pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::{Arc, Mutex};

use jiff::{SignedDuration, Timestamp};
use uuid::Uuid;

struct Entry<V> {
    value: V,
    deadline: Timestamp,
}

struct Inner<V> {
    entries: HashMap<Uuid, Entry<V>>,
    /// Expiry index. May hold stale deadlines for re-armed or removed
    /// entries; those are skipped against the map's current deadline when
    /// popped, so an early delete turns the deferred one into a no-op.
    deadlines: BinaryHeap<Reverse<(Timestamp, Uuid)>>,
}

/// TTL-indexed key-value arena.
///
/// Injected as a dependency (never a module-level singleton) so tests can
/// drive a [`ManualClock`] and avoid cross-test leakage.
pub struct TtlCache<V> {
    inner: Mutex<Inner<V>>,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                deadlines: BinaryHeap::new(),
            }),
            clock,
        }
    }

    /// The cache's current time. Callers share this clock for expiry math.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Insert `value` under `id`, expiring `ttl` from now. Replaces any
    /// existing entry and its deadline.
    pub fn put(&self, id: Uuid, value: V, ttl: SignedDuration) {
        let now = self.clock.now();
        let deadline = now.saturating_add(ttl).expect("SignedDuration never overflows saturating_add");
        let mut inner = self.lock();
        Self::drop_expired(&mut inner, now);
        inner.entries.insert(id, Entry { value, deadline });
        inner.deadlines.push(Reverse((deadline, id)));
    }

    /// Fetch a live entry. An entry whose deadline passed is dropped on the
    /// way out and reported as absent.
    pub fn get(&self, id: Uuid) -> Option<V> {
        let now = self.clock.now();
        let mut inner = self.lock();
        if let Some(entry) = inner.entries.get(&id) {
            if entry.deadline > now {
                return Some(entry.value.clone());
            }
        } else {
            return None;
        }
        // Deadline passed: drop the entry on the way out.
        inner.entries.remove(&id);
        None
    }

    /// Reset a live entry's expiry to `ttl` from now. Returns false if the
    /// entry is absent or already expired.
    pub fn rearm(&self, id: Uuid, ttl: SignedDuration) -> bool {
        let now = self.clock.now();
        let deadline = now.saturating_add(ttl).expect("SignedDuration never overflows saturating_add");
        let mut guard = self.lock();
        let inner = &mut *guard;
        match inner.entries.get_mut(&id) {
            Some(entry) if entry.deadline > now => {
                entry.deadline = deadline;
                inner.deadlines.push(Reverse((deadline, id)));
                true
            }
            _ => false,
        }
    }

    /// Remove an entry. Idempotent — removing an absent key is a no-op.
    pub fn remove(&self, id: Uuid) {
        self.lock().entries.remove(&id);
    }

    /// Drop every entry whose deadline passed. Returns the number dropped.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut inner = self.lock();
        Self::drop_expired(&mut inner, now)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<V>> {
        self.inner.lock().expect("cache lock poisoned")
    }

    fn drop_expired(inner: &mut Inner<V>, now: Timestamp) -> usize {
        let mut dropped = 0;
        while let Some(Reverse((deadline, id))) = inner.deadlines.peek().copied() {
            if deadline > now {
                break;
            }
            inner.deadlines.pop();
            // Only honor the index entry if it still matches the live
            // deadline — re-armed entries leave stale index rows behind.
            if inner
                .entries
                .get(&id)
                .is_some_and(|e| e.deadline <= now)
            {
                inner.entries.remove(&id);
                dropped += 1;
            }
        }
        dropped
    }
}
