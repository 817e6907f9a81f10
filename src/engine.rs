//! Cache query engine - owner of the key→entity map and the hit/miss split.

use crate::error::Result;
use crate::fetch::BatchFetch;
use crate::key::KeyPolicy;
use dashmap::DashMap;
use std::marker::PhantomData;

/// Read-through cache resolving batches of search tokens.
///
/// One engine instance exists per (entity type, key policy, fetch policy)
/// triple; both collaborators are injected at construction as first-class
/// values, never captured ambient state. The engine owns the only mutable
/// resource in the subsystem, the key→entity map, and mutates it exclusively
/// through [`get_items`](CacheQueryEngine::get_items) and
/// [`force_update`](CacheQueryEngine::force_update).
///
/// Entries are added on fetch and overwritten on refresh, never removed:
/// there is no eviction and no TTL. The only time-sensitivity lives in the
/// keys the policy generates (e.g. hour bucketing), not in cache management.
///
/// # Concurrency
///
/// Within one call, hit classification finishes before the fetch is awaited,
/// and results are committed only after the whole batch resolved. There is
/// no coordination *across* calls: two concurrent calls that miss on the
/// same key each invoke the fetch collaborator and each write the entry on
/// completion, last writer wins. This limitation is deliberate and part of
/// the engine's documented behavior.
///
/// # Example
///
/// ```ignore
/// let engine = CacheQueryEngine::new(HourBucketPolicy::new(place_id), PlaceApi::new());
///
/// // First call fetches all four; an identical second call fetches nothing.
/// let places = engine.get_items(&tokens, &range).await?;
/// ```
pub struct CacheQueryEngine<T, P, K, F>
where
    T: Clone + Send + Sync,
    K: KeyPolicy<T, P>,
    F: BatchFetch<T, P>,
{
    cache: DashMap<String, T>,
    keys: K,
    fetcher: F,
    _params: PhantomData<fn(P) -> P>,
}

impl<T, P, K, F> CacheQueryEngine<T, P, K, F>
where
    T: Clone + Send + Sync,
    K: KeyPolicy<T, P>,
    F: BatchFetch<T, P>,
{
    /// Create a new engine with an empty cache.
    pub fn new(keys: K, fetcher: F) -> Self {
        CacheQueryEngine {
            cache: DashMap::new(),
            keys,
            fetcher,
            _params: PhantomData,
        }
    }

    /// Resolve a batch of search tokens, fetching only the misses.
    ///
    /// Every token is classified as a hit or a miss via its retrieval key.
    /// Hits are returned in request order; if any tokens missed, the fetch
    /// collaborator is invoked exactly once with the full miss list, the
    /// results are written back under their store keys, and they are appended
    /// to the hits in whatever order the collaborator returned them (the
    /// engine makes no reordering guarantee for fresh entities).
    ///
    /// An all-hit call never invokes the fetch collaborator. An empty token
    /// slice returns an empty vector without invoking it either. Duplicate
    /// tokens are not deduplicated: each occurrence independently counts as a
    /// hit or miss and is independently included in the fetch batch.
    ///
    /// # Errors
    ///
    /// Returns the fetch collaborator's error unmodified. In that case the
    /// cache is exactly as it was before the call; misses are never partially
    /// committed.
    pub async fn get_items(&self, tokens: &[String], params: &P) -> Result<Vec<T>> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        // Step 1: classify every token before anything is awaited.
        let mut hits: Vec<T> = Vec::new();
        let mut misses: Vec<String> = Vec::new();
        for token in tokens {
            let key = self.keys.retrieval_key(token, params);
            match self.cache.get(&key) {
                Some(entry) => {
                    debug!("✓ Cache hit for {}", key);
                    hits.push(entry.value().clone());
                }
                None => {
                    debug!("✗ Cache miss for {}", key);
                    misses.push(token.clone());
                }
            }
        }

        debug!(
            "» Lookup classified: {} hits, {} misses of {} tokens",
            hits.len(),
            misses.len(),
            tokens.len()
        );

        // Step 2: all hits, nothing to fetch.
        if misses.is_empty() {
            return Ok(hits);
        }

        // Step 3: one round-trip for the whole miss list.
        let fetched = self.fetcher.fetch_batch(&misses, params).await?;

        // Step 4: commit after the batch resolved, never during it.
        for entity in &fetched {
            let key = self.keys.store_key(entity, params);
            self.cache.insert(key, entity.clone());
        }
        info!(
            "✓ Fetched {} entities for {} misses, cache now holds {}",
            fetched.len(),
            misses.len(),
            self.cache.len()
        );

        hits.extend(fetched);
        Ok(hits)
    }

    /// Fetch every token unconditionally and refresh the cache.
    ///
    /// Bypasses the cache read entirely: the fetch collaborator is invoked
    /// with all tokens regardless of prior population, and the results are
    /// written back exactly as a miss commit would be, updating shared cache
    /// state for any other reader.
    ///
    /// # Errors
    ///
    /// Same as [`get_items`](CacheQueryEngine::get_items): the collaborator's
    /// error is propagated unmodified and nothing is committed.
    pub async fn force_update(&self, tokens: &[String], params: &P) -> Result<Vec<T>> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        debug!("» Force update for {} tokens", tokens.len());
        let fetched = self.fetcher.fetch_batch(tokens, params).await?;

        for entity in &fetched {
            let key = self.keys.store_key(entity, params);
            self.cache.insert(key, entity.clone());
        }
        info!(
            "✓ Force update committed {} entities, cache now holds {}",
            fetched.len(),
            self.cache.len()
        );

        Ok(fetched)
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
