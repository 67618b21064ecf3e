//! In-flight wizard storage, keyed by the caller's opaque token.
//!
//! The HTTP boundary is stateless; this map is what lets a later call
//! resume a wizard started by an earlier one. Callers are distinguished by
//! token equality alone. A wizard is taken OUT of the map to be advanced
//! and only put back when it still wants input, so two calls bearing the
//! same token can never drive the same wizard concurrently.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::wizard::Wizard;

struct Entry {
    wizard: Wizard,
    touched: Instant,
}

/// Token -> paused wizard, with lazy TTL eviction. At most one wizard per
/// token: a new `put` replaces whatever was there.
pub struct SessionStore {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn put(&self, token: &str, wizard: Wizard) {
        let mut entries = self.entries.lock().expect("session map poisoned");
        Self::purge_expired(&mut entries, self.ttl);
        entries.insert(
            token.to_string(),
            Entry {
                wizard,
                touched: Instant::now(),
            },
        );
    }

    /// Remove and return the wizard for `token`, if one is in flight and
    /// not expired.
    pub fn take(&self, token: &str) -> Option<Wizard> {
        let mut entries = self.entries.lock().expect("session map poisoned");
        Self::purge_expired(&mut entries, self.ttl);
        entries.remove(token).map(|entry| entry.wizard)
    }

    pub fn remove(&self, token: &str) {
        let mut entries = self.entries.lock().expect("session map poisoned");
        entries.remove(token);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("session map poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn purge_expired(entries: &mut HashMap<String, Entry>, ttl: Duration) {
        let before = entries.len();
        entries.retain(|_, entry| entry.touched.elapsed() < ttl);
        let evicted = before - entries.len();
        if evicted > 0 {
            log::info!("evicted {evicted} idle session(s)");
        }
    }
}
