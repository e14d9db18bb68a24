// src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use modsync::catalog::CatalogClient;
use modsync::config::{self, Config};
use modsync::report::ConsoleReporter;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "modsync")]
#[command(author, version, about = "Keep a mods directory deduplicated and up to date", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one update pass over the mods directory
    Update {
        /// Mods directory (overrides the config file)
        #[arg(short, long)]
        path: Option<PathBuf>,
        /// Catalog API base URL (overrides the config file)
        #[arg(long)]
        api_base: Option<String>,
    },
    /// Interactively write the config file
    Setup,
    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;

    match cli.command {
        Some(Commands::Update { path, api_base }) => {
            let mut cfg = config::load(&cwd)?;
            if let Some(path) = path {
                cfg.mods_path = path;
            }
            if let Some(api_base) = api_base {
                cfg.api_base = api_base;
            }

            info!(
                "Updating {} against {}",
                cfg.mods_path.display(),
                cfg.api_base
            );
            println!("Mods path: {}", cfg.mods_path.display());
            println!("Scanning local mods...\n");

            let client = CatalogClient::new(&cfg.api_base)?;
            let mut reporter = ConsoleReporter::new();
            modsync::reconcile::run(&cfg.mods_path, &client, &mut reporter)?;
            Ok(())
        }
        Some(Commands::Setup) => {
            println!("Modsync - Setup\n");
            println!("Default mods path: {}", config::DEFAULT_MODS_PATH);
            print!("Mods folder path ({}): ", config::DEFAULT_MODS_PATH);
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            let trimmed = input.trim();
            let mods_path = if trimmed.is_empty() {
                PathBuf::from(config::DEFAULT_MODS_PATH)
            } else {
                PathBuf::from(trimmed)
            };

            if !mods_path.exists() {
                println!("Warning: path does not exist yet. You can create it later.");
            }

            let cfg = Config {
                mods_path,
                ..Config::default()
            };
            config::save(&cwd, &cfg)?;
            println!("Saved config to {}", config::config_path(&cwd).display());
            Ok(())
        }
        Some(Commands::Config) => {
            let cfg = config::load(&cwd)?;
            println!("{}", serde_json::to_string_pretty(&cfg)?);
            Ok(())
        }
        None => {
            // No command provided, show help
            println!("Modsync v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'modsync --help' for usage information");
            Ok(())
        }
    }
}
