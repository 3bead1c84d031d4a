//! CLI command execution.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::ai::{AiGateway, HttpProviders, ProviderKeys, ProviderSettings};
use crate::config::{ServerConfig, SessionBackend};
use crate::models::AiProvider;
use crate::schedule::fall_2025_schedule;
use crate::server;
use crate::session::FileSessionStore;

use super::args::{Cli, Commands};

// === Command Execution ===

pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve {
            port,
            bind,
            open,
            session_dir,
            persist,
            session_idle_minutes,
            canvas_url,
            providers,
        } => {
            let sessions = match (session_dir, persist) {
                (Some(dir), _) => SessionBackend::File(dir),
                (None, true) => SessionBackend::File(
                    FileSessionStore::default_dir()
                        .context("Could not find a local data directory")?,
                ),
                (None, false) => SessionBackend::Memory,
            };
            let config = ServerConfig {
                bind,
                port,
                sessions,
                session_idle: Duration::from_secs(session_idle_minutes.saturating_mul(60)),
                canvas_default_url: canvas_url,
                providers: providers.into(),
            };
            server::start_server(config, open).await
        }
        Commands::Schedule => {
            println!("{}", fall_2025_schedule());
            Ok(())
        }
        Commands::Match {
            file,
            provider,
            gemini_key,
            claude_key,
            providers,
        } => {
            let keys = ProviderKeys {
                gemini: gemini_key,
                claude: claude_key,
                preferred: AiProvider::from_form(&provider),
            };
            match_file(&file, &keys, providers.into()).await
        }
    }
}

async fn read_assignment_list(file: &str) -> Result<String> {
    if file == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read assignment list from stdin")?;
        Ok(text)
    } else {
        tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read {file}"))
    }
}

async fn match_file(file: &str, keys: &ProviderKeys, settings: ProviderSettings) -> Result<()> {
    let assignment_list = read_assignment_list(file).await?;
    if assignment_list.trim().is_empty() {
        bail!("Assignment list is empty");
    }

    let factory = HttpProviders::new(reqwest::Client::new(), settings);
    let gateway = AiGateway::for_keys(&factory, keys)
        .context("Set GEMINI_API_KEY or CLAUDE_API_KEY (or pass --gemini-key / --claude-key)")?;

    let matches = gateway
        .match_assignments(&assignment_list, fall_2025_schedule())
        .await?;
    info!(count = matches.len(), "assignments matched");

    println!("{}", serde_json::to_string_pretty(&matches)?);
    Ok(())
}
