//! Request-scoped load deduplication.
//!
//! The first caller for a key starts the underlying load; every later
//! caller with an equal key awaits the same shared future, whether it is
//! still in flight or already complete. The whole cache is dropped at
//! request end; there is no eviction.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use tracing::trace;

use super::key::LoadKey;
use super::loader::Loader;
use crate::error::Error;

type SharedLoad = Shared<BoxFuture<'static, Result<Option<Value>, Error>>>;

/// Cache statistics.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStats {
    /// Number of lookups that joined an existing load.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of lookups that started a new load.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

/// Deduplicating fetch coordinator for one request.
pub struct LoadCache {
    loader: Arc<dyn Loader>,
    in_flight: DashMap<String, SharedLoad>,
    stats: CacheStats,
}

impl LoadCache {
    /// Create a cache around an injected loader.
    pub fn new(loader: Arc<dyn Loader>) -> Self {
        Self {
            loader,
            in_flight: DashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Await the document for `key`, starting the load if this is the
    /// first request for it.
    ///
    /// Check-and-insert holds the map shard lock, so two concurrent calls
    /// with equal keys cannot both start a load. The inserted future is
    /// lazy; no loader code runs inside the critical section.
    pub async fn get(&self, key: &LoadKey) -> Result<Option<Value>, Error> {
        let encoded = key.encode()?;
        let load = match self.in_flight.entry(encoded) {
            Entry::Occupied(entry) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                trace!(collection = %key.collection, id = %key.id, "load cache hit");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                trace!(collection = %key.collection, id = %key.id, "load cache miss");
                let loader = Arc::clone(&self.loader);
                let key = key.clone();
                let load = async move { loader.load(&key).await }.boxed().shared();
                entry.insert(load.clone());
                load
            }
        };
        load.await
    }

    /// Cache statistics.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Number of distinct keys seen.
    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether any load has been issued.
    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }

    /// Drop every cached load. Request-end teardown.
    pub fn clear(&self) {
        self.in_flight.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use serde_json::json;

    use crate::populate::key::DocId;

    struct SlowLoader {
        calls: AtomicUsize,
        fail: bool,
    }

    impl SlowLoader {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Loader for SlowLoader {
        fn load<'a>(&'a self, key: &'a LoadKey) -> BoxFuture<'a, Result<Option<Value>, Error>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let fail = self.fail;
            let id = key.id.to_string();
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                if fail {
                    Err(Error::loader("backend unavailable"))
                } else {
                    Ok(Some(json!({ "id": id })))
                }
            })
        }
    }

    fn key(collection: &str, id: &str) -> LoadKey {
        LoadKey {
            transaction_id: None,
            collection: collection.to_string(),
            id: DocId::Str(id.to_string()),
            depth: 1,
            current_depth: 2,
            locale: None,
            fallback_locale: None,
            override_access: false,
            show_hidden_fields: false,
        }
    }

    #[tokio::test]
    async fn test_concurrent_equal_keys_share_one_load() {
        let loader = SlowLoader::new(false);
        let cache = LoadCache::new(loader.clone());
        let k = key("authors", "42");

        let (a, b) = tokio::join!(cache.get(&k), cache.get(&k));

        assert_eq!(a.unwrap(), Some(json!({ "id": "42" })));
        assert_eq!(b.unwrap(), Some(json!({ "id": "42" })));
        assert_eq!(loader.calls(), 1);
        assert_eq!(cache.stats().misses(), 1);
        assert_eq!(cache.stats().hits(), 1);
    }

    #[tokio::test]
    async fn test_completed_load_is_reused() {
        let loader = SlowLoader::new(false);
        let cache = LoadCache::new(loader.clone());
        let k = key("authors", "42");

        cache.get(&k).await.unwrap();
        cache.get(&k).await.unwrap();

        assert_eq!(loader.calls(), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_load_separately() {
        let loader = SlowLoader::new(false);
        let cache = LoadCache::new(loader.clone());

        let k42 = key("authors", "42");
        let k43 = key("authors", "43");
        let (a, b) = tokio::join!(cache.get(&k42), cache.get(&k43));

        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(loader.calls(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_error_propagates_to_every_waiter() {
        let loader = SlowLoader::new(true);
        let cache = LoadCache::new(loader.clone());
        let k = key("authors", "42");

        let (a, b) = tokio::join!(cache.get(&k), cache.get(&k));

        assert_eq!(a, Err(Error::loader("backend unavailable")));
        assert_eq!(b, Err(Error::loader("backend unavailable")));
        assert_eq!(loader.calls(), 1);
    }

    #[tokio::test]
    async fn test_clear_discards_results() {
        let loader = SlowLoader::new(false);
        let cache = LoadCache::new(loader.clone());
        let k = key("authors", "42");

        cache.get(&k).await.unwrap();
        assert!(!cache.is_empty());

        cache.clear();
        assert!(cache.is_empty());

        cache.get(&k).await.unwrap();
        assert_eq!(loader.calls(), 2);
    }
}
