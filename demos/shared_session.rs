//! Shared session example: independent consumers, one cache.
//!
//! Two accessors built from clones of the same session each track their own
//! `Idle`/`Loading`/`Success`/`Error` state, while every entity fetched by one
//! is already warm for the other.

use chrono::{Duration, TimeZone, Utc};
use fetch_cache::error::Result;
use fetch_cache::key::{DateRange, HourBucketPolicy};
use fetch_cache::{BatchFetch, CacheAccessor, CacheSession};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone, Debug)]
struct Coordinates {
    user: String,
    lat: f64,
    lon: f64,
}

struct CoordinatesApi {
    round_trips: Arc<AtomicUsize>,
}

impl BatchFetch<Coordinates, DateRange> for CoordinatesApi {
    async fn fetch_batch(&self, tokens: &[String], _range: &DateRange) -> Result<Vec<Coordinates>> {
        self.round_trips.fetch_add(1, Ordering::SeqCst);
        Ok(tokens
            .iter()
            .enumerate()
            .map(|(i, user)| Coordinates {
                user: user.clone(),
                lat: 49.16 + i as f64 * 0.01,
                lon: -123.13,
            })
            .collect())
    }
}

fn coordinates_user(c: &Coordinates) -> String {
    c.user.clone()
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init()
        .ok();

    println!("\n=== fetch-cache - Shared Session Example ===\n");

    let round_trips = Arc::new(AtomicUsize::new(0));
    let session = CacheSession::new(
        HourBucketPolicy::new(coordinates_user),
        CoordinatesApi {
            round_trips: Arc::clone(&round_trips),
        },
    );

    let start = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let window = DateRange::new(start, start + Duration::hours(1));

    // Two independent consumers, e.g. a map pane and a sidebar list.
    let mut map_pane = CacheAccessor::new(session.clone());
    let mut sidebar = CacheAccessor::new(session.clone());

    let users: Vec<String> = ["ana", "boris", "chen"].iter().map(|s| s.to_string()).collect();

    map_pane.get(&users, &window).await;
    println!(
        "map pane: success={} entities={}",
        map_pane.state().is_success(),
        map_pane.result().map_or(0, |r| r.len())
    );

    sidebar.get(&users, &window).await;
    println!(
        "sidebar:  success={} entities={}",
        sidebar.state().is_success(),
        sidebar.result().map_or(0, |r| r.len())
    );

    println!(
        "\nTotal API round-trips for both consumers: {}",
        round_trips.load(Ordering::SeqCst)
    );
    println!("Cached entries in the shared session: {}", session.cached_len());

    println!("\n=== Example Complete ===\n");

    Ok(())
}
