//! campusrate - campus facility and course review backend.
//!
//! Stores entities (canteens, dorms, classrooms, professors, toilets) and
//! their reviews, keeps per-entity rating aggregates up to date, and
//! generates natural-language review summaries through an OpenAI-compatible
//! provider.

mod aggregator;
mod allocator;
mod cli;
mod models;
mod server;
mod services;
mod store;
mod summary;
mod validation;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "campusrate=info"
    } else {
        "campusrate=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Run CLI
    cli::run().await
}
