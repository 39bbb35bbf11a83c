// ./src/main.rs
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use token_recover_approver::app::Application;
use token_recover_approver::config::{Config, DEFAULT_CONFIG_PATH};
use token_recover_approver::logging::init_tracing;
use token_recover_approver::snapshot::verify_snapshot;
use token_recover_approver::store::{self, SledStore, Snapshot};

#[derive(Parser, Debug)]
#[command(name = "token-recover-approver", version, about = "Issues token claim approvals")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the approval API (default)
    Serve {
        /// Seconds to wait for in-flight requests on shutdown
        #[arg(long, default_value_t = 300)]
        timeout: u64,
    },
    /// Write the JSON snapshot documents into a sled database
    Import {
        #[arg(long)]
        sled: PathBuf,
    },
    /// Check every stored proof against the state root
    VerifySnapshot,
    /// Print name and version
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Some(Command::Version) = cli.command {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = ?e, "fatal");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::load(&cli.config)?;
    init_tracing(&config.logger)?;

    match cli.command.unwrap_or(Command::Serve { timeout: 300 }) {
        Command::Serve { timeout } => {
            let app = Application::build(config)?;
            app.run(Duration::from_secs(timeout)).await?;
            info!("stopped");
            Ok(ExitCode::SUCCESS)
        }
        Command::Import { sled } => {
            let network = config.network()?;
            let snapshot = Snapshot::load(&config.store.memory_store, &network)
                .context("failed to load snapshot documents")?;
            let db = SledStore::open(&sled)
                .with_context(|| format!("failed to open sled database {}", sled.display()))?;
            db.import(&snapshot)?;
            println!(
                "imported {} accounts, {} proofs, {} assets into {}",
                snapshot.accounts.len(),
                snapshot.proofs.len(),
                snapshot.assets.len(),
                sled.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::VerifySnapshot => {
            let network = config.network()?;
            let store = store::open(&config.store, &network).context("failed to open ledger store")?;
            let report = verify_snapshot(store.as_ref(), config.leaf_encoder())?;
            for mismatch in &report.mismatches {
                println!(
                    "MISMATCH {} index={} denom={}: {}",
                    network.format_account(&mismatch.address),
                    mismatch.index,
                    mismatch.denom,
                    mismatch.reason
                );
            }
            println!(
                "checked {} proofs over {} accounts, {} mismatches",
                report.proofs,
                report.accounts,
                report.mismatches.len()
            );
            Ok(if report.is_consistent() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Version => Ok(ExitCode::SUCCESS),
    }
}
