//! Per-client antiflood cache.
//!
//! Maps a hashed client key to the time of its last accepted post. The raw
//! network address never enters the map; hashing is a light privacy measure,
//! not a security boundary (the hash is unsalted and deterministic, so small
//! input spaces are invertible by dictionary).

use parking_lot::RwLock;
use sha1::{Digest, Sha1};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Last-accepted-post times for recently seen clients
#[derive(Debug)]
pub struct AntifloodCache {
    threshold: Duration,
    seen: RwLock<HashMap<String, Instant>>,
}

impl AntifloodCache {
    /// Create a cache with the given flood threshold.
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            seen: RwLock::new(HashMap::new()),
        }
    }

    /// The configured flood threshold
    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Record now as the last accepted post time for a client.
    pub fn touch(&self, client: &str) {
        self.seen.write().insert(hash_key(client), Instant::now());
    }

    /// Check whether a client posted less than the flood threshold ago.
    ///
    /// A client that has never posted is never throttled.
    pub fn is_throttled(&self, client: &str) -> bool {
        let seen = self.seen.read();
        match seen.get(&hash_key(client)) {
            Some(last) => last.elapsed() < self.threshold,
            None => false,
        }
    }

    /// Number of distinct clients currently tracked
    pub fn len(&self) -> usize {
        self.seen.read().len()
    }

    /// True when no client is tracked
    pub fn is_empty(&self) -> bool {
        self.seen.read().is_empty()
    }

    /// Drop entries old enough that they can no longer throttle anyone.
    ///
    /// Without eviction the map grows with every distinct client ever seen.
    /// The reaper calls this on its interval; throttle semantics are
    /// unchanged because evicted entries would have answered "not throttled"
    /// anyway. Returns the number of entries dropped.
    pub fn evict_stale(&self) -> usize {
        let mut seen = self.seen.write();
        let before = seen.len();
        seen.retain(|_, last| last.elapsed() < self.threshold);
        before - seen.len()
    }
}

/// Hash a client key before use as a map key.
fn hash_key(client: &str) -> String {
    hex::encode(Sha1::digest(client.as_bytes()))
}
