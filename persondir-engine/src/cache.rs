//! Caching decorator and cache stores.
//!
//! [`CachingSource`] sits in front of any single source, including a whole
//! [`crate::AggregationEngine`]. The store behind it is injected; the
//! decorator adds no locking of its own, so two concurrent misses on the same
//! key may both reach the inner source.

use crate::source::AttributeSource;
use lru::LruCache;
use persondir_types::{
    AttributeError, AttributeMap, AttributeResult, CacheKey, DefaultAttribute,
};
use std::collections::{BTreeSet, HashMap};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// What a cache entry remembers about a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedResult {
    /// The inner source found these attributes.
    Found(AttributeMap),
    /// The inner source found nothing.
    Miss,
}

impl CachedResult {
    pub fn into_option(self) -> Option<AttributeMap> {
        match self {
            Self::Found(map) => Some(map),
            Self::Miss => None,
        }
    }
}

/// Key/value store behind a [`CachingSource`].
///
/// Implementations must be safe to share between threads. Whether a get
/// followed by a put is atomic is up to the implementation.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<CachedResult>;
    fn put(&self, key: CacheKey, value: CachedResult);
    fn remove(&self, key: &CacheKey) -> Option<CachedResult>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Unbounded in-process store.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<CacheKey, CachedResult>>,
}

impl MemoryCacheStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }

    pub fn clear(&self) {
        lock(&self.entries).clear();
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &CacheKey) -> Option<CachedResult> {
        lock(&self.entries).get(key).cloned()
    }

    fn put(&self, key: CacheKey, value: CachedResult) {
        lock(&self.entries).insert(key, value);
    }

    fn remove(&self, key: &CacheKey) -> Option<CachedResult> {
        lock(&self.entries).remove(key)
    }
}

/// Bounded store evicting the least recently used entry.
pub struct LruCacheStore {
    entries: Mutex<LruCache<CacheKey, CachedResult>>,
}

impl LruCacheStore {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}

impl CacheStore for LruCacheStore {
    fn get(&self, key: &CacheKey) -> Option<CachedResult> {
        lock(&self.entries).get(key).cloned()
    }

    fn put(&self, key: CacheKey, value: CachedResult) {
        lock(&self.entries).put(key, value);
    }

    fn remove(&self, key: &CacheKey) -> Option<CachedResult> {
        lock(&self.entries).pop(key)
    }
}

/// Caches the results of one inner source.
pub struct CachingSource {
    name: String,
    inner: Option<Arc<dyn AttributeSource>>,
    store: Option<Arc<dyn CacheStore>>,
    default_attribute: DefaultAttribute,
    key_attributes: Option<BTreeSet<String>>,
    cache_null_results: bool,
    queries: AtomicU64,
    misses: AtomicU64,
}

impl CachingSource {
    /// Creates an unconfigured decorator. The inner source and the store must
    /// be set before the first query.
    pub fn new() -> Self {
        Self {
            name: "cache".to_string(),
            inner: None,
            store: None,
            default_attribute: DefaultAttribute::default(),
            key_attributes: None,
            cache_null_results: false,
            queries: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Creates a decorator over `inner` backed by `store`.
    pub fn wrap(inner: Arc<dyn AttributeSource>, store: Arc<dyn CacheStore>) -> Self {
        let name = format!("cache({})", inner.name());
        Self::new().with_name(name).with_inner(inner).with_store(store)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_inner(mut self, inner: Arc<dyn AttributeSource>) -> Self {
        self.set_inner(inner);
        self
    }

    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.set_store(store);
        self
    }

    #[must_use]
    pub fn with_default_attribute(mut self, attribute: DefaultAttribute) -> Self {
        self.set_default_attribute(attribute);
        self
    }

    #[must_use]
    pub fn with_key_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_key_attributes(Some(names.into_iter().map(Into::into).collect()));
        self
    }

    #[must_use]
    pub fn with_cache_null_results(mut self, cache: bool) -> Self {
        self.set_cache_null_results(cache);
        self
    }

    // ── Configuration ────────────────────────────────────────────

    pub fn set_inner(&mut self, inner: Arc<dyn AttributeSource>) {
        self.inner = Some(inner);
    }

    pub fn set_store(&mut self, store: Arc<dyn CacheStore>) {
        self.store = Some(store);
    }

    pub fn set_default_attribute(&mut self, attribute: DefaultAttribute) {
        self.default_attribute = attribute;
    }

    /// Attributes the key is built from. `None` keys on the default
    /// attribute alone.
    pub fn set_key_attributes(&mut self, names: Option<BTreeSet<String>>) {
        self.key_attributes = names;
    }

    /// When `true`, a query that found nothing is remembered as a miss.
    pub fn set_cache_null_results(&mut self, cache: bool) {
        self.cache_null_results = cache;
    }

    // ── Counters ─────────────────────────────────────────────────

    /// Total queries received.
    pub fn queries(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    /// Keyed queries that had to reach the inner source.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    // ── Queries ──────────────────────────────────────────────────

    /// Derives the cache key for `seed`. `None` means the query is not
    /// cacheable.
    pub fn cache_key(&self, seed: &AttributeMap) -> Option<CacheKey> {
        match &self.key_attributes {
            Some(names) => CacheKey::derive(seed, names.iter().map(String::as_str)),
            None => CacheKey::derive(seed, [self.default_attribute.name()]),
        }
    }

    /// Resolves an identifier on the default attribute.
    pub fn resolve_by_identifier(&self, id: &str) -> AttributeResult<Option<AttributeMap>> {
        if id.trim().is_empty() {
            return Err(AttributeError::InvalidArgument(
                "identifier must not be empty".to_string(),
            ));
        }
        self.resolve_by_query(&self.default_attribute.seed_for(id))
    }

    pub fn resolve_by_query(&self, seed: &AttributeMap) -> AttributeResult<Option<AttributeMap>> {
        let (inner, store) = self.collaborators()?;
        self.queries.fetch_add(1, Ordering::Relaxed);

        let Some(key) = self.cache_key(seed) else {
            debug!("{}: no cache key for query, bypassing cache", self.name);
            return inner.resolve(seed);
        };

        if let Some(cached) = store.get(&key) {
            debug!("{}: cache hit", self.name);
            return Ok(cached.into_option());
        }

        let result = inner.resolve(seed)?;
        match &result {
            Some(found) => store.put(key, CachedResult::Found(found.clone())),
            None if self.cache_null_results => store.put(key, CachedResult::Miss),
            None => {}
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("{}: cache miss", self.name);
        Ok(result)
    }

    /// Evicts the entry `seed` maps to. Returns whether one was removed.
    pub fn remove_cached(&self, seed: &AttributeMap) -> AttributeResult<bool> {
        let (_, store) = self.collaborators()?;
        Ok(self
            .cache_key(seed)
            .is_some_and(|key| store.remove(&key).is_some()))
    }

    /// Evicts the entry for an identifier on the default attribute.
    pub fn remove_cached_identifier(&self, id: &str) -> AttributeResult<bool> {
        self.remove_cached(&self.default_attribute.seed_for(id))
    }

    fn collaborators(&self) -> AttributeResult<(&Arc<dyn AttributeSource>, &Arc<dyn CacheStore>)> {
        let inner = self.inner.as_ref().ok_or_else(|| {
            AttributeError::NotConfigured(format!("{} has no inner source", self.name))
        })?;
        let store = self.store.as_ref().ok_or_else(|| {
            AttributeError::NotConfigured(format!("{} has no cache store", self.name))
        })?;
        Ok((inner, store))
    }
}

impl Default for CachingSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeSource for CachingSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, query: &AttributeMap) -> AttributeResult<Option<AttributeMap>> {
        self.resolve_by_query(query)
    }

    fn possible_attribute_names(&self) -> AttributeResult<Option<BTreeSet<String>>> {
        self.collaborators()?.0.possible_attribute_names()
    }

    fn available_query_attributes(&self) -> AttributeResult<Option<BTreeSet<String>>> {
        self.collaborators()?.0.available_query_attributes()
    }
}
