//! Data-node binary

use clap::Parser;
use minidfs::common::{DataNodeConfig, DEFAULT_COORDINATOR_ADDR};
use minidfs::DataNodeServer;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "minidfs-datanode")]
#[command(about = "minidfs chunk-holding data node")]
#[command(version)]
struct Cli {
    /// Port to listen on
    #[arg(long)]
    port: u16,

    /// Directory for chunk files
    #[arg(long)]
    storage: PathBuf,

    /// Coordinator address
    #[arg(long, default_value = DEFAULT_COORDINATOR_ADDR)]
    master: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DataNodeConfig {
        port: cli.port,
        storage_dir: cli.storage,
        master_addr: cli.master,
    };

    DataNodeServer::new(config).serve().await?;

    Ok(())
}
