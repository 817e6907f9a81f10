//! Error types for cache operations.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by cache operations.
///
/// The engine performs no retry, backoff, or suppression: a failure from the
/// injected fetch collaborator is returned to the immediate caller exactly as
/// the collaborator produced it, and the cache is left untouched.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The injected batched-fetch collaborator rejected.
    ///
    /// Constructed by fetch implementations; the engine only propagates it.
    #[error("batched fetch failed: {0}")]
    Fetch(String),
}

impl Error {
    /// Convenience constructor for fetch implementations.
    pub fn fetch(message: impl Into<String>) -> Self {
        Error::Fetch(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = Error::fetch("upstream returned 502");
        assert_eq!(err.to_string(), "batched fetch failed: upstream returned 502");
    }
}
