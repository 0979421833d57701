//! CLI commands implementation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;

use crate::server::AppState;
use crate::summary::SummaryConfig;

#[derive(Parser)]
#[command(name = "campusrate")]
#[command(about = "Campus review backend with rating aggregation and AI summaries")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the review API server
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default: 127.0.0.1:3030)
        #[arg(default_value = "127.0.0.1:3030")]
        bind: String,
        /// JSON file to preload entities and reviews from
        #[arg(long)]
        seed: Option<PathBuf>,
    },

    /// Run the review summarization batch over a seeded dataset
    Summarize {
        /// JSON file to load entities and reviews from
        seed: PathBuf,
        /// Limit number of entities to process (0 = unlimited)
        #[arg(short, long, default_value = "0")]
        limit: usize,
        /// Keep running, repeating the batch every N seconds
        #[arg(long)]
        every: Option<u64>,
    },

    /// Show summary provider configuration
    Status,

    /// Validate a seed file by loading it into a scratch store
    Seed {
        /// Seed file to validate
        file: PathBuf,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, seed } => cmd_serve(&bind, seed.as_deref()).await,
        Commands::Summarize { seed, limit, every } => cmd_summarize(&seed, limit, every).await,
        Commands::Status => cmd_status(),
        Commands::Seed { file } => cmd_seed(&file).await,
    }
}

async fn cmd_serve(bind: &str, seed: Option<&Path>) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind)?;

    let state = AppState::new(SummaryConfig::default())?;

    if let Some(path) = seed {
        let stats = super::helpers::load_seed(&state, path).await?;
        println!(
            "{} Seeded {} entities and {} reviews from {}",
            style("✓").green(),
            stats.entities,
            stats.reviews,
            path.display()
        );
        if stats.rejected_reviews > 0 {
            println!(
                "  {} {} reviews rejected by validation",
                style("!").yellow(),
                stats.rejected_reviews
            );
        }
    }

    println!(
        "{} Starting campusrate server at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(state, &host, port).await
}

async fn cmd_summarize(seed: &Path, limit: usize, every: Option<u64>) -> anyhow::Result<()> {
    let state = AppState::new(SummaryConfig::default())?;

    let stats = super::helpers::load_seed(&state, seed).await?;
    println!(
        "{} Loaded {} entities and {} reviews",
        style("✓").green(),
        stats.entities,
        stats.reviews
    );

    let limit = if limit > 0 { Some(limit) } else { None };

    match every {
        None => run_batch_once(&state, limit).await,
        Some(secs) => {
            println!(
                "{} Running summarization every {}s (Ctrl+C to stop)",
                style("→").cyan(),
                secs
            );
            let mut ticker = tokio::time::interval(Duration::from_secs(secs));
            loop {
                ticker.tick().await;
                if let Err(e) = run_batch_once(&state, limit).await {
                    eprintln!("{} Batch failed: {}", style("✗").red(), e);
                }
            }
        }
    }
}

async fn run_batch_once(state: &AppState, limit: Option<usize>) -> anyhow::Result<()> {
    let stats = state.summarize.run(limit).await?;
    println!(
        "{} Summaries: {} generated, {} skipped, {} errors",
        style("✓").green(),
        stats.success_count,
        stats.skipped_count,
        stats.error_count
    );
    Ok(())
}

fn cmd_status() -> anyhow::Result<()> {
    let config = SummaryConfig::default();

    println!("\n{}", style("Summary Provider").bold());
    println!("{}", "-".repeat(40));
    println!(
        "{:<15} {}",
        "Enabled:",
        if config.enabled {
            style("yes").green().to_string()
        } else {
            style("no").yellow().to_string()
        }
    );
    println!("{:<15} {}", "Endpoint:", config.endpoint);
    println!("{:<15} {}", "Model:", config.model);
    println!("{:<15} {}", "Max tokens:", config.max_tokens);
    println!("{:<15} {}", "Temperature:", config.temperature);
    println!(
        "{:<15} {}",
        "API key:",
        if config.api_key.is_some() {
            style("configured").green().to_string()
        } else {
            style("missing").red().to_string()
        }
    );

    Ok(())
}

async fn cmd_seed(file: &Path) -> anyhow::Result<()> {
    let state = AppState::new(SummaryConfig::default())?;
    let stats = super::helpers::load_seed(&state, file).await?;

    println!(
        "{} {} is valid: {} entities, {} reviews",
        style("✓").green(),
        file.display(),
        stats.entities,
        stats.reviews
    );
    if stats.rejected_reviews > 0 {
        println!(
            "  {} {} reviews rejected by validation",
            style("!").yellow(),
            stats.rejected_reviews
        );
    }

    Ok(())
}

/// Parse a bind address that can be:
/// - Just a port: "3030" -> 127.0.0.1:3030
/// - Just a host: "0.0.0.0" -> 0.0.0.0:3030
/// - Host and port: "0.0.0.0:3030" -> 0.0.0.0:3030
fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("127.0.0.1".to_string(), port));
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
    }

    Ok((bind.to_string(), 3030))
}
