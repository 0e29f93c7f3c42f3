//! Blood bank CLI
//!
//! Connects blood donors with receivers:
//! - Accounts and a persistent login session
//! - Blood requests posted by receivers
//! - Compatible, same-location matches and eligibility checks for donors
//! - Donation recording and a shared dashboard

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use blood_store::JsonFileBloodStore;
use chrono::Utc;
use clap::Parser;
use tracing::{debug, error, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

use commands::Command;
use config::AppConfig;
use error::CliResult;

#[derive(Parser)]
#[command(name = "bloodbank")]
#[command(about = "Match blood donors with open requests")]
#[command(
    after_help = "Environment:\n  BLOODBANK_STORE_PATH   Store document location\n  BLOODBANK_LOG_LEVEL    Log verbosity"
)]
struct Cli {
    /// Store document to use instead of the configured one
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "Command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<String> {
    let mut config = AppConfig::load()?;
    if let Some(path) = cli.store {
        config = config.with_store_path(path)?;
    }

    init_tracing(&config);

    let store = Arc::new(JsonFileBloodStore::new(&config.store_path));
    debug!(store = %store.path().display(), "Using store");
    commands::execute(cli.command, store, Utc::now()).await
}

fn init_tracing(config: &AppConfig) {
    let log_level = match config.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "bloodbank={log_level},matching={log_level},auth={log_level},\
                     blood_store={log_level}"
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
