mod api;
mod models;
mod scrapers;
mod storage;

use std::net::SocketAddr;

use anyhow::Result;
use clap::{Parser, Subcommand};
use scrapers::{DevfolioScraper, Scraper};
use storage::{JsonFileStore, ListingStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "startup-scout")]
#[command(about = "Scrapes hackathon listings and serves them to the startup directory UI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the Devfolio scraper once and overwrite data/hackathons.json
    Scrape,
    /// Serve the read API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0:3000")]
        addr: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Scrape => scrape().await,
        Command::Serve { addr } => api::serve(addr, api::AppState::with_default_paths()).await,
    }
}

async fn scrape() -> Result<()> {
    let scraper = DevfolioScraper::new()?;
    let outcome = scraper.scrape().await?;

    for (i, listing) in outcome.listings.iter().enumerate() {
        println!("{}. {} ({})", i + 1, listing.title, listing.date);
        println!("   {} · {:?}", listing.location, listing.mode);
        println!("   {}", listing.link);
        println!();
    }

    let store = JsonFileStore::hackathons();
    store.save(&outcome.listings).await?;

    info!(
        "✅ Scraped {} listings from {}",
        outcome.listings.len(),
        scraper.source_name()
    );
    Ok(())
}
