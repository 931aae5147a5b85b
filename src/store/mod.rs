//! Transient hand-off store
//!
//! A small keyed store used by the UI to pass payloads across a page
//! boundary. Each key is written at most once and read at most once:
//!
//! - [`TransientStore::put`] inserts only if the key is absent
//! - [`TransientStore::take`] returns the value and removes it
//!
//! The store is bounded (least recently used entries are evicted first) and
//! entries expire after an optional TTL, measured on an injectable [`Clock`].
//! Readers normally go through [`TransientStore::take_when_ready`], which waits
//! for the configured rendezvous delay before taking, so that a producer that
//! is still uploading has time to land its value.

use lru::LruCache;
use parking_lot::Mutex;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::utils::toml_config::TransientConfig;

/// Source of the current time for TTL checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct Entry {
    value: Value,
    stored_at: Instant,
}

/// Bounded write-once, read-once store.
pub struct TransientStore {
    entries: Mutex<LruCache<String, Entry>>,
    ttl: Option<Duration>,
    rendezvous_delay: Duration,
    clock: Arc<dyn Clock>,
}

impl TransientStore {
    pub fn new(capacity: NonZeroUsize, ttl: Option<Duration>, rendezvous_delay: Duration) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
            rendezvous_delay,
            clock: Arc::new(SystemClock),
        }
    }

    /// Build from the `[transient]` configuration section.
    pub fn from_config(config: &TransientConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);
        Self::new(capacity, config.ttl(), config.rendezvous_delay())
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn rendezvous_delay(&self) -> Duration {
        self.rendezvous_delay
    }

    fn is_expired(&self, entry: &Entry, now: Instant) -> bool {
        self.ttl
            .is_some_and(|ttl| now.saturating_duration_since(entry.stored_at) >= ttl)
    }

    /// Store `value` under `key` unless a live value is already there.
    ///
    /// Returns `true` when the value was stored.
    pub fn put(&self, key: &str, value: Value) -> bool {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        if let Some(existing) = entries.peek(key) {
            if !self.is_expired(existing, now) {
                debug!(key, "Transient key already set, keeping first value");
                return false;
            }
        }

        entries.put(
            key.to_string(),
            Entry {
                value,
                stored_at: now,
            },
        );
        true
    }

    /// Remove and return the value for `key`.
    pub fn take(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();
        let entry = self.entries.lock().pop(key)?;

        if self.is_expired(&entry, now) {
            debug!(key, "Transient entry expired");
            return None;
        }
        Some(entry.value)
    }

    /// Wait for the rendezvous delay, then [`take`](Self::take).
    pub async fn take_when_ready(&self, key: &str) -> Option<Value> {
        if !self.rendezvous_delay.is_zero() {
            tokio::time::sleep(self.rendezvous_delay).await;
        }
        self.take(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Undo the UI's string encoding of a payload.
///
/// The UI posts `data` as a JSON string whose array elements are JSON strings
/// themselves. Each layer that parses as JSON is decoded; anything else is
/// kept as sent.
pub fn decode_payload(data: Value) -> Value {
    let decoded = decode_string(data);
    match decoded {
        Value::Array(items) => Value::Array(items.into_iter().map(decode_string).collect()),
        other => other,
    }
}

fn decode_string(value: Value) -> Value {
    match value {
        Value::String(s) => serde_json::from_str(&s).unwrap_or(Value::String(s)),
        other => other,
    }
}
