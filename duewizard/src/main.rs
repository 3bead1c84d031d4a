//! Duewizard - re-date Canvas LMS assignments with AI-assisted matching.
//!
//! Architecture:
//! - A three-step wizard (API keys, matching, Canvas update) served over HTTP
//! - Matching is delegated to Gemini or Claude with ordered fallback
//! - Canvas updates are sequential REST calls resolved by fuzzy name matching
//! - Per-browser session state lives behind a pluggable store

mod ai;
mod canvas;
mod cli;
mod config;
mod dates;
mod models;
mod schedule;
mod server;
mod session;
#[cfg(test)]
mod testing;
mod wizard;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{execute, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("duewizard=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    execute(cli).await
}
