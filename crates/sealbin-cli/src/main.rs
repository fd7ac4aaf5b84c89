//! # sealbin-cli
//!
//! Administration CLI for a Sealbin storage root. It drives the storage
//! engine directly — posting, reading, and deleting pastes, sweeping
//! expired ones — without going through the HTTP layer.

use anyhow::Result;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use sealbin_config::Config;
use sealbin_store::Engine;
use tracing_subscriber::EnvFilter;

mod commands;

/// Encrypted pastebin storage engine administration
#[derive(Parser)]
#[command(name = "sealbin", version, about = "Sealbin storage engine CLI")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    pub conf: Option<Utf8PathBuf>,

    /// Storage root, overriding the configuration file
    #[arg(long, global = true)]
    pub root: Option<Utf8PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Post a new paste from a file, or stdin when no file is given
    Post {
        file: Option<Utf8PathBuf>,
        /// Delete the paste after its first read
        #[arg(long)]
        burn: bool,
        /// Enable syntax highlighting
        #[arg(long)]
        highlight: bool,
        /// Enable discussions
        #[arg(long)]
        discussion: bool,
        /// Expiration delay in seconds
        #[arg(long, default_value_t = 86_400)]
        expire: i64,
        /// Client key for the antiflood gate
        #[arg(long)]
        client: Option<String>,
    },
    /// Show a paste (applies expiry and burn-after-read effects)
    Show { id: String },
    /// Delete a paste with its delete token
    Delete { id: String, token: String },
    /// Sweep expired pastes once and exit
    Sweep,
    /// Run the background reaper until interrupted
    Reap,
    /// List the expiration index
    Index,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.conf {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(root) = &cli.root {
        config.root = root.clone();
    }

    setup_logging(&config, cli.verbose);

    let engine = Engine::open(&config)?;

    match cli.command {
        Commands::Post {
            file,
            burn,
            highlight,
            discussion,
            expire,
            client,
        } => commands::post(&engine, file, burn, highlight, discussion, expire, client),
        Commands::Show { id } => commands::show(&engine, &id),
        Commands::Delete { id, token } => commands::delete(&engine, &id, &token),
        Commands::Sweep => commands::sweep(&engine),
        Commands::Reap => commands::reap(engine, &config),
        Commands::Index => commands::index(&engine),
    }
}

fn setup_logging(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
