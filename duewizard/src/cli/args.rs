//! CLI argument definitions.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::ai::{
    ProviderSettings, DEFAULT_CLAUDE_BASE_URL, DEFAULT_CLAUDE_MODEL, DEFAULT_GEMINI_BASE_URL,
    DEFAULT_GEMINI_MODEL,
};
use crate::config::{DEFAULT_CANVAS_URL, DEFAULT_SESSION_IDLE_MINUTES};

/// Duewizard - Re-date Canvas assignments with AI-assisted matching
#[derive(Parser, Debug)]
#[command(name = "duewizard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the wizard web server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "DUEWIZARD_PORT", default_value = "58240")]
        port: u16,

        /// Address to bind
        #[arg(long, env = "DUEWIZARD_BIND", default_value = "127.0.0.1")]
        bind: IpAddr,

        /// Open browser automatically
        #[arg(long)]
        open: bool,

        /// Keep sessions as JSON files in this directory
        #[arg(long, env = "DUEWIZARD_SESSION_DIR")]
        session_dir: Option<PathBuf>,

        /// Keep sessions on disk in the platform data directory
        #[arg(long, conflicts_with = "session_dir")]
        persist: bool,

        /// Drop sessions idle for this many minutes
        #[arg(
            long,
            env = "DUEWIZARD_SESSION_IDLE_MINUTES",
            default_value_t = DEFAULT_SESSION_IDLE_MINUTES,
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        session_idle_minutes: u64,

        /// Canvas API URL pre-filled on the update step
        #[arg(long, env = "CANVAS_DEFAULT_URL", default_value = DEFAULT_CANVAS_URL)]
        canvas_url: String,

        #[command(flatten)]
        providers: ProviderArgs,
    },

    /// Print the Fall 2025 due date schedule
    Schedule,

    /// Match an assignment list against the schedule and print JSON
    Match {
        /// File with one assignment per line ("-" reads stdin)
        #[arg(default_value = "-")]
        file: String,

        /// Provider to try first
        #[arg(long, default_value = "gemini", value_parser = ["gemini", "claude"])]
        provider: String,

        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        gemini_key: Option<String>,

        #[arg(long, env = "CLAUDE_API_KEY", hide_env_values = true)]
        claude_key: Option<String>,

        #[command(flatten)]
        providers: ProviderArgs,
    },
}

/// Provider endpoints and models
#[derive(Args, Debug, Clone)]
pub struct ProviderArgs {
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub gemini_base_url: String,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    #[arg(long, env = "CLAUDE_BASE_URL", default_value = DEFAULT_CLAUDE_BASE_URL)]
    pub claude_base_url: String,

    #[arg(long, env = "CLAUDE_MODEL", default_value = DEFAULT_CLAUDE_MODEL)]
    pub claude_model: String,
}

impl From<ProviderArgs> for ProviderSettings {
    fn from(args: ProviderArgs) -> Self {
        Self {
            gemini_base_url: args.gemini_base_url,
            gemini_model: args.gemini_model,
            claude_base_url: args.claude_base_url,
            claude_model: args.claude_model,
        }
    }
}
