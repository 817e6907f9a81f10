//! Basic usage example of the read-through batched cache.

use chrono::{Duration, TimeZone, Utc};
use fetch_cache::error::Result;
use fetch_cache::key::{DateRange, HourBucketPolicy};
use fetch_cache::{BatchFetch, CacheSession};
use serde::{Deserialize, Serialize};

/// Example entity: a bookable place with availability data.
#[derive(Clone, Serialize, Deserialize, Debug)]
struct Place {
    id: String,
    name: String,
    open_slots: u32,
}

/// Mock fetch collaborator that simulates the remote availability API.
struct PlaceApi;

impl BatchFetch<Place, DateRange> for PlaceApi {
    async fn fetch_batch(&self, tokens: &[String], range: &DateRange) -> Result<Vec<Place>> {
        println!(
            "  [API] One round-trip for {} place(s) in window {} .. {}",
            tokens.len(),
            range.start,
            range.end
        );

        Ok(tokens
            .iter()
            .enumerate()
            .map(|(i, id)| Place {
                id: id.clone(),
                name: format!("Place #{}", id),
                open_slots: 3 + i as u32,
            })
            .collect())
    }
}

fn place_id(place: &Place) -> String {
    place.id.clone()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .try_init()
        .ok();

    println!("\n=== fetch-cache - Basic Example ===\n");

    // 1. One session per surface, constructed once.
    println!("1. Creating cache session...");
    let session = CacheSession::new(HourBucketPolicy::new(place_id), PlaceApi);
    println!("   ✓ Session ready\n");

    let start = Utc.with_ymd_and_hms(2024, 6, 1, 3, 15, 0).unwrap();
    let window = DateRange::new(start, start + Duration::hours(2));
    let tokens: Vec<String> = ["p_101", "p_102", "p_103"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    // 2. First request: three misses, one batched fetch.
    println!("2. First request for three places:");
    let places = session.get_items(&tokens, &window).await?;
    println!("   ✓ {} places loaded, {} cached\n", places.len(), session.cached_len());

    // 3. Same window shifted by minutes: same hour bucket, all hits.
    println!("3. Same places, window shifted to 03:50 (same hour bucket):");
    let shifted = DateRange::new(start + Duration::minutes(35), start + Duration::minutes(155));
    let places = session.get_items(&tokens, &shifted).await?;
    println!("   ✓ {} places served without any API call\n", places.len());

    // 4. Partial miss: one new token joins two cached ones.
    println!("4. Adding one new place to the request:");
    let mut wider = tokens.clone();
    wider.push("p_104".to_string());
    let places = session.get_items(&wider, &window).await?;
    println!(
        "   ✓ {} places returned, only the new one was fetched ({} cached)\n",
        places.len(),
        session.cached_len()
    );

    // 5. Authoritative refresh.
    println!("5. Force update for the original three:");
    let refreshed = session.force_update(&tokens, &window).await?;
    println!("   ✓ {} places refreshed from the API:", refreshed.len());
    println!("{}", serde_json::to_string_pretty(&refreshed).expect("serializable"));

    println!("\n=== Example Complete ===\n");

    Ok(())
}
