//! CLI for talking to the coordinator

use anyhow::Context;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "trikv")]
#[command(about = "trikv coordinator CLI")]
#[command(version)]
struct Cli {
    /// Coordinator URL
    #[arg(long, default_value = "http://localhost:8080")]
    coordinator: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a value
    Put {
        key: String,
        value: String,
    },

    /// Fetch a value (prints "0" when no value is available)
    Get {
        key: String,

        /// Data-center location to read from (1, 2 or 3; only honored in
        /// sharding mode)
        #[arg(long, default_value = "1")]
        loc: String,
    },

    /// Switch placement mode
    SetMode {
        /// "replication" or "sharding"
        mode: String,
    },

    /// Show coordinator health and current mode
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Put { key, value } => {
            let url = format!("{}/put", cli.coordinator);
            let resp = client
                .get(&url)
                .query(&[("key", key.as_str()), ("value", value.as_str())])
                .send()
                .await
                .context("coordinator unreachable")?;
            anyhow::ensure!(resp.status().is_success(), "put failed: {}", resp.status());
            println!("OK");
        }
        Commands::Get { key, loc } => {
            let url = format!("{}/get", cli.coordinator);
            let resp = client
                .get(&url)
                .query(&[("key", key.as_str()), ("loc", loc.as_str())])
                .send()
                .await
                .context("coordinator unreachable")?;
            anyhow::ensure!(resp.status().is_success(), "get failed: {}", resp.status());
            println!("{}", resp.text().await?);
        }
        Commands::SetMode { mode } => {
            let url = format!("{}/storage", cli.coordinator);
            let resp = client
                .get(&url)
                .query(&[("storage", mode.as_str())])
                .send()
                .await
                .context("coordinator unreachable")?;
            anyhow::ensure!(
                resp.status().is_success(),
                "set-mode failed: {}",
                resp.status()
            );
            println!("mode set to {}", mode);
        }
        Commands::Status => {
            let url = format!("{}/health", cli.coordinator);
            let resp = client
                .get(&url)
                .send()
                .await
                .context("coordinator unreachable")?;
            println!("{}", resp.text().await?);
        }
    }

    Ok(())
}
