//! Batched-fetch collaborator contract.

use crate::error::Result;

/// The injected collaborator that resolves cache misses in one round-trip.
///
/// The engine calls this exactly once per `get_items` invocation that has at
/// least one miss, passing the full list of missed tokens. N misses produce
/// one downstream call, never N. Transport is entirely the implementor's
/// business (REST, RPC, a database pool, a test double).
///
/// # Contract
///
/// An implementation should return at most one entity per resolvable token.
/// The engine does not validate count or identity of the returned entities
/// against the requested tokens: a collaborator that returns fewer, more, or
/// different entities is a caller-side bug, and shows up as perpetual cache
/// misses on later lookups rather than as an error.
///
/// # Example
///
/// ```ignore
/// struct PlaceApi {
///     client: reqwest::Client,
/// }
///
/// impl BatchFetch<Place, DateRange> for PlaceApi {
///     async fn fetch_batch(&self, tokens: &[String], range: &DateRange) -> Result<Vec<Place>> {
///         self.client
///             .get("/places")
///             .query(&[("ids", tokens.join(",")), ("from", range.start.to_rfc3339())])
///             .send()
///             .await
///             .map_err(|e| Error::fetch(e.to_string()))?
///             .json()
///             .await
///             .map_err(|e| Error::fetch(e.to_string()))
///     }
/// }
/// ```
#[allow(async_fn_in_trait)]
pub trait BatchFetch<T, P>: Send + Sync {
    /// Resolve the given tokens under the shared context parameters.
    ///
    /// # Errors
    ///
    /// Returns `Error::Fetch` when the underlying transport fails; the engine
    /// propagates it unmodified and commits nothing to the cache.
    async fn fetch_batch(&self, tokens: &[String], params: &P) -> Result<Vec<T>>;
}
