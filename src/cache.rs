//! Process-lifetime cache of rendered diagrams
//!
//! Keys are exact [`RenderKey`]s. Entries are never evicted and never
//! replaced: the first image stored for a key wins.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::types::{RenderKey, RenderedImage};

/// Hit/miss counters and size, for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Internally synchronized map; callers never lock
#[derive(Debug, Default)]
pub struct RenderCache {
    entries: RwLock<HashMap<RenderKey, RenderedImage>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &RenderKey) -> Option<RenderedImage> {
        // writers only insert whole entries, a poisoned map is still consistent
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let found = entries.get(key).cloned();
        drop(entries);

        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Store an image. A key that is already present keeps its value.
    pub fn put(&self, key: RenderKey, image: RenderedImage) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.entry(key).or_insert(image);
    }

    pub fn contains(&self, key: &RenderKey) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn image(fill: u8) -> RenderedImage {
        RenderedImage::from(vec![fill; 128])
    }

    #[test]
    fn test_get_put() {
        let cache = RenderCache::new();
        let key = RenderKey::from("graph TD; A-->B");
        assert!(cache.get(&key).is_none());

        cache.put(key.clone(), image(1));
        assert_eq!(cache.get(&key), Some(image(1)));
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
    }

    #[test]
    fn test_first_value_wins() {
        let cache = RenderCache::new();
        let key = RenderKey::from("x");
        cache.put(key.clone(), image(1));
        cache.put(key.clone(), image(1));
        cache.put(key.clone(), image(2));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key), Some(image(1)));
    }

    #[test]
    fn test_keys_are_byte_exact() {
        let cache = RenderCache::new();
        cache.put(RenderKey::from("graph TD"), image(1));
        assert!(!cache.contains(&RenderKey::from("graph TD ")));
        assert!(!cache.contains(&RenderKey::from("Graph TD")));
        assert!(cache.contains(&RenderKey::from("graph TD")));
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(RenderCache::new());
        let handles: Vec<_> = (0..8u8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..100u8 {
                        let key = RenderKey::from(format!("diagram-{}", i % 20));
                        cache.put(key.clone(), image(i % 20));
                        let got = cache.get(&key);
                        assert_eq!(got, Some(image(i % 20)), "thread {t}");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 20);
    }
}
