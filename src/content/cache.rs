//! Keyed content cache with TTL expiry and FIFO eviction.
//!
//! Unlike the asset cache, recency of access is deliberately ignored here:
//! content entries are few, small and equally cheap to rebuild, so insertion
//! order is all the eviction policy needs.

use crate::util::now_ms;

#[derive(Clone, Copy, Debug)]
pub struct CacheConfig {
    pub ttl_ms: f64,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: 60.0 * 60.0 * 1000.0,
            max_entries: 50,
        }
    }
}

struct Entry<V> {
    key: String,
    value: V,
    inserted_at: f64,
}

/// Entries are stored in insertion order; expiry is checked lazily on `get`.
pub struct ContentCache<V> {
    entries: Vec<Entry<V>>,
    config: CacheConfig,
    now: fn() -> f64,
}

impl<V: Clone> ContentCache<V> {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: Vec::new(),
            config,
            now: now_ms,
        }
    }

    /// Test hook: swap the clock source.
    #[cfg(test)]
    fn with_clock(config: CacheConfig, now: fn() -> f64) -> Self {
        Self {
            entries: Vec::new(),
            config,
            now,
        }
    }

    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = (self.now)();
        let idx = self.entries.iter().position(|e| e.key == key)?;
        if now - self.entries[idx].inserted_at > self.config.ttl_ms {
            self.entries.remove(idx);
            log::debug!("content cache entry expired: {key}");
            return None;
        }
        Some(self.entries[idx].value.clone())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        self.entries.retain(|e| e.key != key);
        if self.entries.len() >= self.config.max_entries {
            let evicted = self.entries.remove(0);
            log::debug!("content cache evicted oldest entry: {}", evicted.key);
        }
        self.entries.push(Entry {
            key,
            value,
            inserted_at: (self.now)(),
        });
    }

    pub fn invalidate(&mut self, key: &str) {
        self.entries.retain(|e| e.key != key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
