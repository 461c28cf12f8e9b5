//! Toggle example: command a static bulb, or discover one first

use lumen::{Endpoint, FixedGate, ToggleConfig, ToggleController, ToggleOutcome, TriggerReply};

#[tokio::main]
async fn main() -> lumen::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Point LUMEN_CONFIG at a TOML file, or set LUMEN_BULB / LUMEN_NETWORK
    // directly, e.g. LUMEN_BULB=192.168.1.50:55443
    let config = match std::env::var("LUMEN_CONFIG") {
        Ok(path) => ToggleConfig::from_path(path)?,
        Err(_) => {
            let static_bulb = std::env::var("LUMEN_BULB")
                .ok()
                .map(|addr| Endpoint::parse(&addr))
                .transpose()?;
            ToggleConfig {
                static_bulb,
                home_network: Some(
                    std::env::var("LUMEN_NETWORK").unwrap_or_else(|_| "Home".to_string()),
                ),
            }
        }
    };

    // The wifi query is platform-specific; the example assumes we are home
    let mut controller = ToggleController::new(config, FixedGate(true));

    match controller.trigger() {
        TriggerReply::Accepted => match controller.next_outcome().await {
            Some(ToggleOutcome::Sent { endpoint }) => println!("✓ Toggled {endpoint}"),
            Some(ToggleOutcome::Failed(e)) => println!("✗ Toggle failed: {e}"),
            None => {}
        },
        TriggerReply::Rejected(reason) => println!("✗ Rejected: {reason:?}"),
    }

    Ok(())
}
