//! Consumer-side accessor wrapping engine calls with asynchronous status.

use crate::error::Error;
use crate::fetch::BatchFetch;
use crate::key::KeyPolicy;
use crate::session::CacheSession;

/// Status of a consumer's most recent cache call.
///
/// ```text
/// Idle --> Loading --> Success
///            |   \
///            v    --> Error
///         (next invocation re-enters Loading,
///          clearing any prior result or error)
/// ```
#[derive(Debug)]
pub enum QueryState<T> {
    /// No call has been made since construction or the last reset.
    Idle,
    /// A call is in flight; any prior result or error has been cleared.
    Loading,
    /// The last call resolved with these entities.
    Success(Vec<T>),
    /// The last call failed; no result is held.
    Error(Error),
}

impl<T> QueryState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The resolved entities, if the last call succeeded.
    pub fn result(&self) -> Option<&[T]> {
        match self {
            Self::Success(items) => Some(items),
            _ => None,
        }
    }

    /// The failure, if the last call errored.
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }
}

/// Presentation-facing wrapper around one [`CacheSession`] handle.
///
/// Each accessor owns its own [`QueryState`]; independent accessors built
/// from clones of the same session share the underlying cache. A `Loading`
/// triggered by consumer A can therefore complete with data that consumer
/// B's later call finds already cached.
///
/// The accessor never alters engine semantics: it is the only layer that
/// converts a rejected call into state instead of returning it, and it does
/// nothing else with the error.
///
/// There is no cancellation. Dropping the future of an in-flight call leaves
/// this accessor in `Loading`, while the engine call, if it completes inside
/// another consumer's invocation, still writes the shared cache.
pub struct CacheAccessor<T, P, K, F>
where
    T: Clone + Send + Sync,
    K: KeyPolicy<T, P>,
    F: BatchFetch<T, P>,
{
    session: CacheSession<T, P, K, F>,
    state: QueryState<T>,
}

impl<T, P, K, F> CacheAccessor<T, P, K, F>
where
    T: Clone + Send + Sync,
    K: KeyPolicy<T, P>,
    F: BatchFetch<T, P>,
{
    /// Bind an accessor to a session handle (usually a clone).
    pub fn new(session: CacheSession<T, P, K, F>) -> Self {
        CacheAccessor {
            session,
            state: QueryState::Idle,
        }
    }

    /// Invoke [`get_items`](CacheSession::get_items) and track its status.
    pub async fn get(&mut self, tokens: &[String], params: &P) {
        self.state = QueryState::Loading;
        self.state = match self.session.get_items(tokens, params).await {
            Ok(items) => QueryState::Success(items),
            Err(e) => QueryState::Error(e),
        };
    }

    /// Invoke [`force_update`](CacheSession::force_update) and track its status.
    pub async fn update(&mut self, tokens: &[String], params: &P) {
        self.state = QueryState::Loading;
        self.state = match self.session.force_update(tokens, params).await {
            Ok(items) => QueryState::Success(items),
            Err(e) => QueryState::Error(e),
        };
    }

    /// Return to `Idle`, dropping any held result or error.
    pub fn reset(&mut self) {
        self.state = QueryState::Idle;
    }

    pub fn state(&self) -> &QueryState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn result(&self) -> Option<&[T]> {
        self.state.result()
    }

    pub fn error(&self) -> Option<&Error> {
        self.state.error()
    }
}
