//! Key-generation contract and time-bucket helpers.
//!
//! The cache never inspects entities itself: every instantiation supplies a
//! [`KeyPolicy`] that maps entities and search tokens to string keys, and the
//! engine does nothing but string equality on the result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pluggable key-generation policy for one cached entity type.
///
/// A policy must encode exactly the dimensions of context that make two
/// lookups "the same" for this entity type, and only those. The two methods
/// are duals:
///
/// - [`store_key`](KeyPolicy::store_key) is computed from a *fetched entity*
///   when writing the cache.
/// - [`retrieval_key`](KeyPolicy::retrieval_key) is computed from a
///   *caller-supplied search token* when reading it.
///
/// For any lookup the policy considers equivalent to a prior store, the two
/// must produce byte-identical strings; for any lookup it considers distinct,
/// they must differ. Violating either direction silently turns into perpetual
/// cache misses or wrong-entity hits.
///
/// # Example
///
/// ```
/// use fetch_cache::key::{DateRange, KeyPolicy};
///
/// #[derive(Clone)]
/// struct Place {
///     id: String,
///     name: String,
/// }
///
/// struct PlaceKeys;
///
/// impl KeyPolicy<Place, DateRange> for PlaceKeys {
///     fn store_key(&self, place: &Place, range: &DateRange) -> String {
///         format!("{}@{}", place.id, range.bucket())
///     }
///
///     fn retrieval_key(&self, token: &str, range: &DateRange) -> String {
///         format!("{}@{}", token, range.bucket())
///     }
/// }
/// ```
pub trait KeyPolicy<T, P>: Send + Sync {
    /// Key under which a fetched entity is written.
    fn store_key(&self, entity: &T, params: &P) -> String;

    /// Key under which a search token is looked up.
    fn retrieval_key(&self, token: &str, params: &P) -> String;
}

/// Floor a timestamp to the hour and render it as a stable key fragment.
///
/// Two timestamps inside the same UTC hour produce the same fragment; the
/// minute and second components never leak into the key. This is the
/// deliberate precision/cost trade-off behind time-bucketed caches: coarser
/// buckets raise the hit rate at the cost of serving approximately-current
/// data within the bucket.
pub fn hour_bucket(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H").to_string()
}

/// A start/end window shared by every lookup in one batch call.
///
/// The canonical context-parameter shape for availability-style lookups.
/// Only `start` participates in key generation (see [`DateRange::bucket`]);
/// `end` rides along for the fetch collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Hour bucket of the window's start time.
    pub fn bucket(&self) -> String {
        hour_bucket(self.start)
    }
}

/// Ready-made policy combining a stable entity identity with the hour bucket
/// of a [`DateRange`].
///
/// The identity extractor is passed in as a plain function so one policy
/// value fully determines key generation, with no ambient state captured.
pub struct HourBucketPolicy<T> {
    identity: fn(&T) -> String,
}

impl<T> HourBucketPolicy<T> {
    /// `identity` must return the same string the caller later uses as a
    /// search token for that entity.
    pub fn new(identity: fn(&T) -> String) -> Self {
        Self { identity }
    }
}

impl<T: Send + Sync> KeyPolicy<T, DateRange> for HourBucketPolicy<T> {
    fn store_key(&self, entity: &T, params: &DateRange) -> String {
        format!("{}@{}", (self.identity)(entity), params.bucket())
    }

    fn retrieval_key(&self, token: &str, params: &DateRange) -> String {
        format!("{}@{}", token, params.bucket())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Clone)]
    struct Spot {
        id: String,
    }

    fn spot_id(spot: &Spot) -> String {
        spot.id.clone()
    }

    fn range(h: u32, m: u32) -> DateRange {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, h, m, 0).unwrap();
        let end = start + chrono::Duration::hours(2);
        DateRange::new(start, end)
    }

    #[test]
    fn test_same_bucket_keys_match() {
        // 03:15-05:15 and 03:50-05:50 both bucket to hour 3.
        let policy = HourBucketPolicy::new(spot_id);
        let spot = Spot { id: "spot_7".to_string() };

        let stored = policy.store_key(&spot, &range(3, 15));
        let retrieved = policy.retrieval_key("spot_7", &range(3, 50));

        assert_eq!(stored, retrieved);
    }

    #[test]
    fn test_different_bucket_keys_differ() {
        // 04:50-06:50 lands in a different hour than 03:15-05:15.
        let policy = HourBucketPolicy::new(spot_id);
        let spot = Spot { id: "spot_7".to_string() };

        let stored = policy.store_key(&spot, &range(3, 15));
        let retrieved = policy.retrieval_key("spot_7", &range(4, 50));

        assert_ne!(stored, retrieved);
    }

    #[test]
    fn test_different_identity_keys_differ() {
        let policy = HourBucketPolicy::new(spot_id);
        let a = Spot { id: "spot_7".to_string() };
        let b = Spot { id: "spot_8".to_string() };
        let params = range(3, 15);

        assert_ne!(policy.store_key(&a, &params), policy.store_key(&b, &params));
    }

    #[test]
    fn test_hour_bucket_drops_minutes_and_seconds() {
        let a = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 1).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 6, 1, 9, 59, 59).unwrap();
        assert_eq!(hour_bucket(a), hour_bucket(b));
        assert_eq!(hour_bucket(a), "2024-06-01T09");
    }

    #[test]
    fn test_bucket_uses_window_start_only() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 3, 15, 0).unwrap();
        let short = DateRange::new(start, start + chrono::Duration::hours(1));
        let long = DateRange::new(start, start + chrono::Duration::hours(8));
        assert_eq!(short.bucket(), long.bucket());
    }
}
