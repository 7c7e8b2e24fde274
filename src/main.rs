//! dinefind — restaurant directory API and data tools.
//!
//! Loads restaurant datasets into a local database and serves a JSON API
//! for browsing, filtering, and geographic search.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if dinefind::cli::is_verbose() {
        "dinefind=info"
    } else {
        "dinefind=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Run CLI
    dinefind::cli::run().await
}
