//! # Energy Ledger Node
//!
//! Command-line entry point for the energy ledger.
//!
//! ## Startup Sequence
//!
//! 1. Parse CLI flags
//! 2. Load configuration (defaults, then `ETN_*` environment, then flags)
//! 3. Validate configuration
//! 4. Install the `tracing` subscriber (logs go to stderr)
//! 5. Open the configured world state and run the command
//!
//! Invocation results are printed to stdout as JSON envelopes.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use etn_ledger::{InMemoryWorldState, LedgerRequest, WorldState};
use etn_node::{LedgerNode, NodeConfig, StorageBackend};

/// Energy token ledger node
#[derive(Parser, Debug)]
#[command(name = "etn-node")]
#[command(about = "Run invocations against the energy token ledger")]
struct Args {
    /// World-state backend (memory or rocksdb)
    #[arg(long)]
    storage: Option<StorageBackend>,

    /// Data directory for the rocksdb backend
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Currency token symbol used in reports
    #[arg(long)]
    token_symbol: Option<String>,

    /// Log filter directive (e.g. `etn_ledger=debug`)
    #[arg(long)]
    log: Option<String>,

    /// Seed the genesis accounts before running the command
    #[arg(long)]
    seed: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seed the genesis accounts
    Init,
    /// Run one JSON invocation, e.g. '{"function":"ListAccounts"}'
    Exec { request: String },
    /// Run a file of JSON invocations, one per line ("-" reads stdin)
    Replay { path: PathBuf },
    /// List every account
    Accounts,
    /// List every trade, or only those of one account
    Trades { account_id: Option<String> },
    /// List active offers
    Offers,
    /// Show the energy position of one account
    Status { account_id: String },
    /// Show every committed write to one account
    History { account_id: String },
    /// Show total energy and currency supply
    Supply,
}

fn init_tracing(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(directive) => EnvFilter::try_new(directive).context("invalid log filter")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn load_config(args: &Args) -> Result<NodeConfig> {
    let mut config = NodeConfig::from_env()?;

    if let Some(backend) = args.storage {
        config.storage.backend = backend;
    }
    if let Some(dir) = &args.data_dir {
        config.storage.data_dir = dir.clone();
    }
    if let Some(symbol) = &args.token_symbol {
        config.ledger.token_symbol = symbol.clone();
    }
    if let Some(filter) = &args.log {
        config.log_filter = Some(filter.clone());
    }

    config.validate()?;
    Ok(config)
}

fn print_json(value: &Value) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Print an invocation envelope; a failed invocation fails the process.
fn print_outcome(value: Value) -> Result<()> {
    print_json(&value)?;
    if value["ok"] != true {
        bail!("invocation failed");
    }
    Ok(())
}

fn run<S: WorldState>(node: &mut LedgerNode<S>, seed: bool, command: Command) -> Result<()> {
    if seed {
        print_outcome(node.exec(LedgerRequest::InitLedger))?;
    }

    match command {
        Command::Init => print_outcome(node.exec(LedgerRequest::InitLedger)),
        Command::Exec { request } => print_outcome(node.exec_line(&request)),
        Command::Replay { path } => {
            let stdout = io::stdout().lock();
            let summary = if path.as_os_str() == "-" {
                node.replay(io::stdin().lock(), stdout)?
            } else {
                let file = File::open(&path)
                    .with_context(|| format!("failed to open {}", path.display()))?;
                node.replay(BufReader::new(file), stdout)?
            };
            if summary.failed > 0 {
                warn!(failed = summary.failed, "some invocations failed");
            }
            Ok(())
        }
        Command::Accounts => print_outcome(node.exec(LedgerRequest::ListAccounts)),
        Command::Trades { account_id: None } => print_outcome(node.exec(LedgerRequest::ListTrades)),
        Command::Trades {
            account_id: Some(account_id),
        } => print_outcome(node.exec(LedgerRequest::ListTradesForAccount { account_id })),
        Command::Offers => print_outcome(node.exec(LedgerRequest::ListActiveOffers)),
        Command::Status { account_id } => {
            println!("{}", node.status_report(&account_id)?);
            Ok(())
        }
        Command::History { account_id } => {
            print_outcome(node.exec(LedgerRequest::AccountHistory { account_id }))
        }
        Command::Supply => {
            println!("{}", node.supply_report()?);
            Ok(())
        }
    }
}

#[cfg(feature = "rocksdb")]
fn run_rocksdb(config: NodeConfig, seed: bool, command: Command) -> Result<()> {
    use etn_node::adapters::storage::{RocksDbConfig, RocksDbWorldState};

    let state = RocksDbWorldState::open(RocksDbConfig::from_storage(&config.storage))
        .with_context(|| format!("failed to open {}", config.storage.data_dir.display()))?;
    info!(
        path = %config.storage.data_dir.display(),
        version = state.last_version(),
        "Opened RocksDB world state"
    );
    let mut node = LedgerNode::new(state, config.ledger);
    run(&mut node, seed, command)
}

#[cfg(not(feature = "rocksdb"))]
fn run_rocksdb(_config: NodeConfig, _seed: bool, _command: Command) -> Result<()> {
    Err(etn_node::ConfigError::RocksDbUnavailable.into())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_tracing(config.log_filter.as_deref())?;

    info!(
        backend = ?config.storage.backend,
        token = %config.ledger.token_symbol,
        "Starting energy ledger node"
    );

    match config.storage.backend {
        StorageBackend::Memory => {
            let mut node = LedgerNode::new(InMemoryWorldState::new(), config.ledger);
            run(&mut node, args.seed, args.command)
        }
        StorageBackend::RocksDb => run_rocksdb(config, args.seed, args.command),
    }
}
