use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use evmdeploy_tools::{Configuration, Manifest, SecretStore};

#[derive(Parser)]
#[command(name = "evmdeploy")]
#[command(about = "EVM deployment configuration tools")]
struct Cli {
    /// Path to the deployment manifest
    #[arg(long, default_value = "deploy.toml")]
    manifest: PathBuf,
    /// Path to the secrets file
    #[arg(long, default_value = "secrets.toml")]
    secrets: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and display the deployment configuration
    Config {
        /// Emit the resolved configuration as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Resolve everything and report success
    Check,
    /// List manifest targets without resolving secrets
    Networks,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let manifest = Manifest::load_or_default(&cli.manifest)?;

    match cli.command {
        Commands::Config { json } => {
            let secrets = SecretStore::load_from(&cli.secrets)?;
            let config = Configuration::build(&manifest, &secrets)?;
            if json {
                println!("{}", config.to_json()?);
            } else {
                config.print_summary();
            }
            Ok(())
        }
        Commands::Check => {
            let secrets = SecretStore::load_from(&cli.secrets)?;
            let config = Configuration::build(&manifest, &secrets)?;
            println!("configuration ok ({} networks)", config.networks.len());
            Ok(())
        }
        Commands::Networks => {
            for (name, spec) in &manifest.networks {
                println!("{name:<12} {spec}");
            }
            Ok(())
        }
    }
}
