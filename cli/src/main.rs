mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use modelhub_core::Config;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "modelhub")]
#[command(author, version, about = "Serve model artifacts over HTTP", long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/modelhub/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the model server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List registered models and whether their files are present
    #[command(alias = "ls")]
    Models,

    /// View or set configuration
    Config {
        /// Config key (e.g., "server.port", "storage.base_path")
        key: Option<String>,

        /// Value to set (if omitted, shows current value)
        value: Option<String>,
    },

    /// Check whether a server is responding
    Status {
        /// Server base URL (default: public_url from config)
        #[arg(long)]
        url: Option<String>,
    },
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Serve { host, port } => {
            let config = load_config(config_path)?;
            commands::serve::execute(config, host, port).await?;
        }
        Commands::Models => {
            let config = load_config(config_path)?;
            commands::models::execute(&config).await?;
        }
        Commands::Config { key, value } => {
            commands::config::execute(config_path, key.as_deref(), value.as_deref()).await?;
        }
        Commands::Status { url } => {
            let config = load_config(config_path)?;
            commands::status::execute(&config, url.as_deref()).await?;
        }
    }

    Ok(())
}
