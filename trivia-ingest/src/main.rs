//! trivia-ingest - Trivia season loader
//!
//! Reads tab-delimited season export files and loads episodes, categories,
//! and questions into the relational store. Strictly sequential: one file
//! runs to completion before the next begins, and any failure terminates
//! the run with the error surfaced.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trivia_common::config::{Mode, Settings};
use trivia_ingest::loader::SeasonLoader;
use trivia_ingest::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Development,
    Production,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Development => Mode::Development,
            ModeArg::Production => Mode::Production,
        }
    }
}

/// Load trivia season export files into the relational store
#[derive(Parser)]
#[command(name = "trivia-ingest")]
#[command(about = "Loads tab-delimited trivia season exports into the database", long_about = None)]
struct Cli {
    /// Running mode; selects the per-mode config file
    #[arg(long, value_enum, default_value_t = ModeArg::Development)]
    mode: ModeArg,

    /// Delete all previously loaded rows before loading
    #[arg(long)]
    purge: bool,

    /// Directory containing season<N>.tsv files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Database file location
    #[arg(long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let mode = Mode::from(cli.mode);

    info!("Starting trivia-ingest");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if !confirm(&format!(
        "Confirm you want to run in {} mode [y/N]: ",
        mode
    ))? {
        println!("Did not receive an affirmative response (e.g. y, yes). Exiting");
        return Ok(());
    }

    let settings = Settings::resolve(mode, cli.database.as_deref(), cli.data_dir.as_deref());
    info!("Database: {}", settings.database_path.display());
    info!("Season files: {}", settings.data_dir.display());

    // Connection failure is fatal; nothing is loaded against an unreachable store
    let pool = trivia_common::db::init_database(&settings.database_path).await?;

    let mut store = Store::new(pool);
    if cli.purge {
        if !confirm("This deletes every previously loaded row. Continue [y/N]: ")? {
            println!("Purge not confirmed. Exiting");
            return Ok(());
        }
        store.purge().await?;
    }

    let mut loader = SeasonLoader::new(store);
    let loaded = loader.load_seasons(&settings.data_dir).await?;
    info!(seasons = loaded, "Load complete");

    Ok(())
}

/// Prompt on stdout and read a y/yes confirmation from stdin
fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    std::io::stdout().flush()?;

    let mut response = String::new();
    std::io::stdin().read_line(&mut response)?;

    Ok(matches!(
        response.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}
