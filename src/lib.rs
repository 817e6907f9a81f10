//! # fetch-cache
//!
//! A type-safe, generic read-through cache with batched miss fetching.
//!
//! ## Features
//!
//! - **Fully Generic:** Cache any `Clone` entity type under any context
//!   parameter type
//! - **Batched Misses:** N misses in one lookup produce exactly one
//!   downstream fetch call, never N
//! - **Pluggable Keys:** Key generation is a caller-supplied [`KeyPolicy`],
//!   including time-bucketed keys for approximate-context collapsing
//! - **Shared Sessions:** One engine per session, handed to every consumer
//!   through cheap [`CacheSession`] clones
//! - **Presentation Ready:** [`CacheAccessor`] tracks each consumer's call as
//!   an explicit `Idle`/`Loading`/`Success`/`Error` state machine
//!
//! ## Quick Start
//!
//! ```ignore
//! use fetch_cache::{BatchFetch, CacheSession, KeyPolicy};
//! use fetch_cache::key::{DateRange, HourBucketPolicy};
//!
//! // 1. Define your entity
//! #[derive(Clone)]
//! struct Place {
//!     id: String,
//!     name: String,
//! }
//!
//! // 2. Implement the batched fetch against your transport
//! struct PlaceApi { /* http client, auth, ... */ }
//!
//! impl BatchFetch<Place, DateRange> for PlaceApi {
//!     async fn fetch_batch(&self, tokens: &[String], range: &DateRange)
//!         -> fetch_cache::Result<Vec<Place>>
//!     {
//!         // one round-trip for the whole batch
//!         todo!()
//!     }
//! }
//!
//! // 3. Create one session at session start and clone it everywhere
//! let session = CacheSession::new(
//!     HourBucketPolicy::new(place_id),
//!     PlaceApi::new(),
//! );
//!
//! let places = session.get_items(&tokens, &range).await?;
//! ```
//!
//! ## What this is not
//!
//! The cache is in-memory only, session-scoped, and grows monotonically:
//! no distribution, no persistence, no eviction, no TTL. Entries live until
//! the owning session is dropped, and time-sensitivity is expressed in the
//! keys (bucketing), not in cache management. Concurrent calls that miss on
//! the same key are not coalesced; each fetches and the last writer wins.

#[macro_use]
extern crate log;

pub mod accessor;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod key;
pub mod session;

// Re-exports for convenience
pub use accessor::{CacheAccessor, QueryState};
pub use engine::CacheQueryEngine;
pub use error::{Error, Result};
pub use fetch::BatchFetch;
pub use key::KeyPolicy;
pub use session::CacheSession;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
