//! skincache CLI
//!
//! Looks up, pins and clears cached player skins, loading `cache.json` on
//! start and saving it after every mutating command.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use skincache::mojang::MojangClient;
use skincache::{Config, ProfileResolver, SkinFetchError, SkinService, SkinStorage};

#[derive(Debug, Parser)]
#[command(name = "skincache", version, about = "Resolve and cache player skins")]
struct Cli {
    /// Config file (defaults to ./skincache.yaml)
    #[arg(long, env = "SKINCACHE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the skin for a player, fetching it if missing or stale
    Lookup {
        name: String,
        /// Last known identifier for the player
        #[arg(long)]
        uuid: Option<String>,
    },
    /// Pin the skin of SKIN_OWNER to NAME
    Set { name: String, skin_owner: String },
    /// Remove the cached or pinned skin for a player
    Clear { name: String },
    /// List cached skins
    List,
}

impl Command {
    fn mutates(&self) -> bool {
        !matches!(self, Command::List)
    }
}

async fn run(
    service: &SkinService<MojangClient>,
    command: &Command,
) -> Result<(), SkinFetchError> {
    match command {
        Command::Lookup { name, uuid } => {
            let profile = service.skin_for(name, uuid.as_deref()).await?;
            print_json(&*profile);
        }
        Command::Set { name, skin_owner } => {
            let profile = service.set_skin(name, skin_owner).await?;
            println!("Pinned skin of {} to {}", profile.name(), name);
        }
        Command::Clear { name } => {
            service.clear_skin(name);
            println!("Cleared skin for {}", name);
        }
        Command::List => {
            let records = service.storage().snapshot();
            if records.is_empty() {
                println!("No skins cached.");
            } else {
                for (key, profile) in records {
                    println!(
                        "  {} -> {} ({}){}",
                        key,
                        profile.name(),
                        profile.id().unwrap_or("unresolved"),
                        if profile.is_forced() { " [forced]" } else { "" }
                    );
                }
            }
        }
    }
    Ok(())
}

fn print_json(profile: &skincache::SkinProfile) {
    match serde_json::to_string_pretty(profile) {
        Ok(json) => println!("{}", json),
        Err(e) => error!(error = %e, "Failed to encode skin profile"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let storage = Arc::new(SkinStorage::new(&config.data_dir));
    storage.load_data();

    let client = MojangClient::with_config(&config.provider)
        .context("Failed to create Mojang client")?;
    let service = SkinService::new(
        Arc::clone(&storage),
        ProfileResolver::new(client),
        Duration::from_secs(config.refresh_after_secs),
    );

    let outcome = run(&service, &cli.command).await;

    if cli.command.mutates() {
        storage.save_data();
    }

    if let Err(e) = outcome {
        error!(reason = ?e.reason(), error = %e, "Skin fetch failed");
        eprintln!("{}", config.messages.for_reason(e.reason()));
        std::process::exit(1);
    }

    info!(records = storage.len(), "Done");
    Ok(())
}
