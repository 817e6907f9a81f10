//! Session-scoped binding exposing one shared engine to many consumers.

use crate::engine::CacheQueryEngine;
use crate::error::Result;
use crate::fetch::BatchFetch;
use crate::key::KeyPolicy;
use std::sync::Arc;

/// Cloneable handle to exactly one [`CacheQueryEngine`].
///
/// Constructed once at session start with a concrete fetch collaborator and
/// key policy baked in, then passed (by clone) to every consumer beneath it:
/// a cache warmed by one consumer benefits every other consumer reading the
/// same entity type. Wiring is an explicit handle, not an ambient lookup.
///
/// Never reconstruct a session mid-flight - a new `CacheSession` owns a new,
/// empty engine, silently discarding all cached state. Hand out clones of
/// the original instead.
///
/// Outward surface is exactly the two engine operations,
/// [`get_items`](CacheSession::get_items) and
/// [`force_update`](CacheSession::force_update), independent of how entities
/// are transported.
pub struct CacheSession<T, P, K, F>
where
    T: Clone + Send + Sync,
    K: KeyPolicy<T, P>,
    F: BatchFetch<T, P>,
{
    engine: Arc<CacheQueryEngine<T, P, K, F>>,
}

// Derived Clone would demand Clone from every type parameter; only the Arc
// is actually cloned.
impl<T, P, K, F> Clone for CacheSession<T, P, K, F>
where
    T: Clone + Send + Sync,
    K: KeyPolicy<T, P>,
    F: BatchFetch<T, P>,
{
    fn clone(&self) -> Self {
        CacheSession {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<T, P, K, F> CacheSession<T, P, K, F>
where
    T: Clone + Send + Sync,
    K: KeyPolicy<T, P>,
    F: BatchFetch<T, P>,
{
    /// Create the session's single engine instance.
    pub fn new(keys: K, fetcher: F) -> Self {
        info!("✓ Cache session created");
        CacheSession {
            engine: Arc::new(CacheQueryEngine::new(keys, fetcher)),
        }
    }

    /// See [`CacheQueryEngine::get_items`].
    pub async fn get_items(&self, tokens: &[String], params: &P) -> Result<Vec<T>> {
        self.engine.get_items(tokens, params).await
    }

    /// See [`CacheQueryEngine::force_update`].
    pub async fn force_update(&self, tokens: &[String], params: &P) -> Result<Vec<T>> {
        self.engine.force_update(tokens, params).await
    }

    /// Number of entries in the shared cache, for diagnostics.
    pub fn cached_len(&self) -> usize {
        self.engine.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug, PartialEq)]
    struct Person {
        name: String,
    }

    #[derive(Clone, Debug)]
    struct Day {
        timestamp: String,
    }

    struct DayKeys;

    impl KeyPolicy<Person, Day> for DayKeys {
        fn store_key(&self, person: &Person, day: &Day) -> String {
            format!("{}@{}", person.name, day.timestamp)
        }

        fn retrieval_key(&self, token: &str, day: &Day) -> String {
            format!("{}@{}", token, day.timestamp)
        }
    }

    /// Directory of ten known people; resolves any known name it is asked for.
    /// The call counter is shared with the test through the `Arc`.
    struct Directory {
        people: Vec<Person>,
        calls: Arc<AtomicUsize>,
    }

    impl Directory {
        fn new() -> (Self, Arc<AtomicUsize>) {
            let names = [
                "Bob", "Joe", "Phil", "Bubbles", "Sally", "Ricky", "Lucy", "Jill", "Julian",
                "Susy",
            ];
            let calls = Arc::new(AtomicUsize::new(0));
            let directory = Directory {
                people: names
                    .iter()
                    .map(|n| Person { name: n.to_string() })
                    .collect(),
                calls: Arc::clone(&calls),
            };
            (directory, calls)
        }
    }

    impl BatchFetch<Person, Day> for Directory {
        async fn fetch_batch(&self, tokens: &[String], _day: &Day) -> Result<Vec<Person>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .people
                .iter()
                .filter(|p| tokens.contains(&p.name))
                .cloned()
                .collect())
        }
    }

    fn search_set() -> Vec<String> {
        ["Julian", "Ricky", "Lucy", "Bubbles"]
            .iter()
            .map(|n| n.to_string())
            .collect()
    }

    fn day(ts: &str) -> Day {
        Day { timestamp: ts.to_string() }
    }

    #[tokio::test]
    async fn test_end_to_end_population_reuse_and_context_change() {
        let (directory, calls) = Directory::new();
        let session = CacheSession::new(DayKeys, directory);
        let names = search_set();

        // First call: four misses, one fetch, four results.
        let first = session.get_items(&names, &day("1990/10/16")).await.unwrap();
        assert_eq!(first.len(), 4);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Identical second call: zero misses, zero new fetch calls.
        let second = session.get_items(&names, &day("1990/10/16")).await.unwrap();
        assert_eq!(second.len(), 4);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Same tokens under a new day: four misses again.
        let third = session.get_items(&names, &day("1992/10/16")).await.unwrap();
        assert_eq!(third.len(), 4);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // Both days now live in the cache side by side.
        assert_eq!(session.cached_len(), 8);
    }

    #[tokio::test]
    async fn test_clones_share_one_cache() {
        let (directory, calls) = Directory::new();
        let session = CacheSession::new(DayKeys, directory);
        let consumer_a = session.clone();
        let consumer_b = session.clone();
        let params = day("1990/10/16");

        consumer_a.get_items(&search_set(), &params).await.unwrap();

        // Consumer B rides on the cache consumer A warmed.
        let got = consumer_b.get_items(&search_set(), &params).await.unwrap();
        assert_eq!(got.len(), 4);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reconstruction_discards_cached_state() {
        let (directory, _calls) = Directory::new();
        let first = CacheSession::new(DayKeys, directory);
        let params = day("1990/10/16");
        first.get_items(&search_set(), &params).await.unwrap();
        assert_eq!(first.cached_len(), 4);

        // A fresh session owns a fresh engine; nothing carries over.
        let (directory2, _calls2) = Directory::new();
        let second = CacheSession::new(DayKeys, directory2);
        assert_eq!(second.cached_len(), 0);
    }
}
