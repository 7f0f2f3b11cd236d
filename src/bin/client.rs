//! Client binary

use clap::{Parser, Subcommand};
use minidfs::common::{format_bytes, ClientConfig, DEFAULT_COORDINATOR_ADDR};
use minidfs::DfsClient;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "minidfs")]
#[command(about = "minidfs distributed file store client")]
#[command(version)]
struct Cli {
    /// Coordinator address
    #[arg(long, default_value = DEFAULT_COORDINATOR_ADDR)]
    master: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a local file
    Upload {
        /// Local file path to upload
        #[arg(long)]
        file: PathBuf,

        /// Remote file name
        #[arg(long)]
        name: String,
    },

    /// Download a remote file
    Download {
        /// Remote file name to download
        #[arg(long)]
        name: String,

        /// Local output file path
        #[arg(long)]
        output: PathBuf,
    },

    /// List all files
    List,
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

    let config = ClientConfig {
        master_addr: cli.master,
        ..ClientConfig::default()
    };
    config.validate()?;
    let client = DfsClient::with_config(config);

    match cli.command {
        Commands::Upload { file, name } => {
            client.upload(&file, &name).await?;
            println!("Successfully uploaded: {}", name);
        }

        Commands::Download { name, output } => {
            client.download(&name, &output).await?;
            println!("Successfully downloaded to: {}", output.display());
        }

        Commands::List => {
            let files = client.list().await?;
            if files.is_empty() {
                println!("No files in the system");
            } else {
                println!("Files ({} total):", files.len());
                println!("----------------------------------------");
                for file in files {
                    println!("Name:   {}", file.filename);
                    println!("Size:   {}", format_bytes(file.filesize as u64));
                    println!("Chunks: {}", file.num_chunks);
                    println!("----------------------------------------");
                }
            }
        }
    }

    Ok(())
}
