mod commands;
mod config;
mod supabase;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::process;
use tracing_subscriber::EnvFilter;

use crate::commands::{
    NutrientArgs, cmd_add, cmd_compare, cmd_favorites_list, cmd_favorites_toggle,
    cmd_history_clear, cmd_history_list, cmd_history_remove, cmd_scan, cmd_search, cmd_update,
};
use crate::config::Config;
use crate::supabase::SupabaseClient;
use nutriscan_core::db::Database;
use nutriscan_core::service::NutriScanService;

const DEFAULT_LOG_FILTER: &str = "nutriscan=warn,nutriscan_core=warn";

#[derive(Parser)]
#[command(
    name = "nutriscan",
    version,
    about = "Scan barcodes, search foods, and keep favorites",
    long_about = "Look up foods in the NutriScan database by name or barcode.\n\
                  Recent searches and favorites are kept on this machine."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search foods by name
    Search {
        /// Search query (at least 2 characters)
        query: String,
        /// Add or remove the Nth result (1-based) from favorites
        #[arg(long, value_name = "N")]
        favorite: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Look up a food by barcode
    Scan {
        /// Barcode number
        barcode: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Register a new food
    Add {
        /// Food name
        name: String,
        /// Calories (kcal per 100 g)
        #[arg(long)]
        calories: f64,
        #[command(flatten)]
        nutrients: NutrientArgs,
        /// Product barcode
        #[arg(long)]
        barcode: Option<String>,
        /// Product image URL
        #[arg(long)]
        image_url: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update fields of a registered food
    Update {
        /// Food ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// Calories (kcal per 100 g)
        #[arg(long)]
        calories: Option<f64>,
        #[command(flatten)]
        nutrients: NutrientArgs,
        /// Product barcode
        #[arg(long)]
        barcode: Option<String>,
        /// Product image URL
        #[arg(long)]
        image_url: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show or edit recent searches
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Show or toggle favorite foods
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommands,
    },
    /// Compare the nutrients of up to three foods
    Compare {
        /// One search query per food
        #[arg(required = true, num_args = 1..=3)]
        queries: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// List recent searches, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove one food from recent searches
    Remove {
        /// Food ID
        id: String,
    },
    /// Remove all recent searches
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum FavoritesCommands {
    /// List favorite foods
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add or remove a favorite by food ID
    Toggle {
        /// Food ID (from favorites or recent searches)
        id: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runtime plus client for commands that reach the food database. The
/// repository calls block on `runtime` from this (non-async) thread.
struct Remote {
    _runtime: tokio::runtime::Runtime,
    client: SupabaseClient,
}

impl Remote {
    fn connect(config: &Config) -> Result<Self> {
        let remote = config.remote()?;
        let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
        let client = SupabaseClient::new(&remote, runtime.handle().clone())?;
        Ok(Self {
            _runtime: runtime,
            client,
        })
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&config.db_path)?;
    let svc = NutriScanService::with_store(db);

    match cli.command {
        Commands::Search {
            query,
            favorite,
            json,
        } => {
            let remote = Remote::connect(&config)?;
            cmd_search(&svc, &remote.client, &query, favorite, json)
        }
        Commands::Scan { barcode, json } => {
            let remote = Remote::connect(&config)?;
            cmd_scan(&svc, &remote.client, &barcode, json)
        }
        Commands::Add {
            name,
            calories,
            nutrients,
            barcode,
            image_url,
            json,
        } => {
            let remote = Remote::connect(&config)?;
            cmd_add(
                &svc,
                &remote.client,
                &name,
                calories,
                &nutrients,
                barcode,
                image_url,
                json,
            )
        }
        Commands::Update {
            id,
            name,
            calories,
            nutrients,
            barcode,
            image_url,
            json,
        } => {
            let remote = Remote::connect(&config)?;
            cmd_update(
                &svc,
                &remote.client,
                &id,
                name,
                calories,
                &nutrients,
                barcode,
                image_url,
                json,
            )
        }
        Commands::History { command } => match command {
            HistoryCommands::List { json } => cmd_history_list(&svc, json),
            HistoryCommands::Remove { id } => cmd_history_remove(&svc, &id),
            HistoryCommands::Clear { yes } => cmd_history_clear(&svc, yes),
        },
        Commands::Favorites { command } => match command {
            FavoritesCommands::List { json } => cmd_favorites_list(&svc, json),
            FavoritesCommands::Toggle { id } => cmd_favorites_toggle(&svc, &id),
        },
        Commands::Compare { queries, json } => {
            let remote = Remote::connect(&config)?;
            cmd_compare(&svc, &remote.client, &queries, json)
        }
    }
}
