//! Discovery example: run one search window and print every sighting

use std::time::Duration;

use lumen::{Discoverer, DiscoveryEvent};

#[tokio::main]
async fn main() -> lumen::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let window = std::env::var("DISCOVERY_SECONDS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(5);

    println!("Searching for bulbs ({window}s window)...");

    let mut run = Discoverer::new(Duration::from_secs(window))?.start();
    while let Some(event) = run.next_event().await {
        match event {
            DiscoveryEvent::Sighting(endpoint) => println!("✓ Found bulb at {endpoint}"),
            DiscoveryEvent::Completed => println!("✓ Search complete"),
            DiscoveryEvent::Cancelled => println!("Search cancelled"),
            DiscoveryEvent::Failed(e) => println!("✗ Search failed: {e}"),
        }
    }

    Ok(())
}
