//! Agora daemon: entry point for serving the proposal API.

mod config;
mod error;

use std::path::PathBuf;
use std::sync::Arc;

use agora_governance::ProposalEngine;
use agora_rpc::handlers::{ListProposalsResponse, ProposalResponse};
use agora_rpc::RpcServer;
use agora_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment};
use clap::Parser;
use tokio::signal;

use crate::config::DaemonConfig;
use crate::error::DaemonError;

/// Number of named LMDB databases the environment may hold.
const MAX_DBS: u32 = 4;

#[derive(Parser)]
#[command(name = "agora-daemon", about = "Agora proposal voting daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "AGORA_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for proposal storage.
    #[arg(long, env = "AGORA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// RPC server port.
    #[arg(long, env = "AGORA_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Address the RPC server binds to.
    #[arg(long, env = "AGORA_BIND_ADDRESS")]
    bind_address: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "AGORA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "AGORA_LOG_FORMAT")]
    log_format: Option<String>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the RPC server until interrupted.
    Serve,
    /// Print every stored proposal as JSON and exit.
    List,
}

impl Cli {
    fn resolve_config(&self) -> Result<DaemonConfig, DaemonError> {
        let mut config = match &self.config {
            Some(path) => DaemonConfig::from_toml_file(path)?,
            None => DaemonConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(port) = self.rpc_port {
            config.rpc_port = port;
        }
        if let Some(addr) = &self.bind_address {
            config.bind_address = addr.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.log_format = format.clone();
        }
        Ok(config)
    }
}

/// Run the startup checks and open the proposal engine over LMDB.
fn open_engine(config: &DaemonConfig) -> Result<Arc<ProposalEngine>, DaemonError> {
    check_data_dir(&config.data_dir).map_err(DaemonError::Integrity)?;
    let env = LmdbEnvironment::open(&config.data_dir, MAX_DBS, config.map_size_bytes())?;

    let report = check_integrity(env.env())?;
    if !report.is_healthy() {
        return Err(DaemonError::Integrity(report.errors.join("; ")));
    }
    tracing::info!(
        databases = report.databases_checked,
        entries = report.total_entries,
        "integrity check passed"
    );

    let store = Arc::new(env.proposal_store());
    Ok(Arc::new(ProposalEngine::new(
        store,
        config.governance_params(),
    )))
}

/// Resolve once SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("failed to listen for SIGINT: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { tracing::info!("received SIGINT, shutting down"); }
        _ = terminate => { tracing::info!("received SIGTERM, shutting down"); }
    }
}

async fn serve(config: &DaemonConfig) -> Result<(), DaemonError> {
    let addr = config.rpc_addr()?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        %addr,
        "starting Agora daemon"
    );
    let engine = open_engine(config)?;
    tracing::info!(proposals = engine.proposal_count()?, "proposal store ready");
    RpcServer::new(addr, engine)
        .start(shutdown_signal())
        .await?;
    tracing::info!("Agora daemon exited cleanly");
    Ok(())
}

fn list(config: &DaemonConfig) -> Result<(), DaemonError> {
    let engine = open_engine(config)?;
    let proposals = engine
        .get_all_proposals()?
        .into_iter()
        .map(|(_, p)| ProposalResponse::from(p))
        .collect();
    let listing = ListProposalsResponse { proposals };
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    agora_utils::init_logging(config.log_format()?, &config.log_level)
        .map_err(|e| DaemonError::Logging(e.to_string()))?;

    match cli.command {
        Command::Serve => serve(&config).await?,
        Command::List => list(&config)?,
    }

    Ok(())
}
