use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::{Mutex, RwLock};

/// Source of the current time, injected so expiry can be tested.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(start) }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

/// Single-slot cache with a time-to-live.
///
/// Holds one value (e.g. the full custom theme list). Writers call
/// [`TtlCache::invalidate`] after every mutation of the underlying data.
pub struct TtlCache<V: Clone> {
    clock: Arc<dyn Clock>,
    ttl: Duration,
    slot: RwLock<Option<CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Returns the cached value if it is younger than the TTL.
    pub fn get(&self) -> Option<V> {
        let now = self.clock.now();
        let slot = self.slot.read();
        slot.as_ref()
            .filter(|entry| now - entry.stored_at < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub fn put(&self, value: V) {
        let entry = CacheEntry { value, stored_at: self.clock.now() };
        *self.slot.write() = Some(entry);
    }

    pub fn invalidate(&self) {
        *self.slot.write() = None;
    }

    /// Age of the cached value, if any.
    pub fn age(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.slot.read().as_ref().map(|entry| now - entry.stored_at)
    }
}
