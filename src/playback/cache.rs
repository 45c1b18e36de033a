//! Bounded FIFO cache of preloaded tracks.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;

use crate::playback::track::Track;

/// Shared cache mapping track identifiers to resolved tracks.
///
/// Evicts the oldest-inserted entry once `capacity` is exceeded. Reads do not
/// refresh an entry's age. Re-inserting an identifier replaces the stored track
/// but keeps its original insertion slot.
pub struct PreloadCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<String, Track>,
    order: VecDeque<String>,
}

impl PreloadCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Inserts `track` under `identifier`, evicting the oldest entries past capacity.
    pub fn insert(&self, identifier: impl Into<String>, track: Track) {
        let identifier = identifier.into();
        let mut inner = self.inner.lock();

        if inner.entries.insert(identifier.clone(), track).is_none() {
            inner.order.push_back(identifier);
        }

        while inner.order.len() > self.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
        }
    }

    pub fn get(&self, identifier: &str) -> Option<Track> {
        self.inner.lock().entries.get(identifier).cloned()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.inner.lock().entries.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::test::mock::track;

    #[test]
    fn evicts_oldest_inserted_first() {
        let cache = PreloadCache::new(3);
        for id in ["a", "b", "c", "d"] {
            cache.insert(id, track(id, 1000));
        }

        assert_eq!(cache.len(), 3);
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
        assert!(cache.contains("d"));
    }

    #[test]
    fn reads_do_not_refresh_age() {
        let cache = PreloadCache::new(2);
        cache.insert("a", track("a", 1000));
        cache.insert("b", track("b", 1000));

        assert!(cache.get("a").is_some());
        cache.insert("c", track("c", 1000));

        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn reinsert_replaces_value_without_duplicating_slot() {
        let cache = PreloadCache::new(2);
        cache.insert("a", track("a", 1000));
        cache.insert("a", track("a", 2000));
        cache.insert("b", track("b", 1000));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").map(|t| t.length_ms), Some(2000));
    }
}
