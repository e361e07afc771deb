//! Coordinator binary

use clap::{Parser, Subcommand};
use trikv::Coordinator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "trikv-coord")]
#[command(about = "trikv coordinator fronting three KV data centers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start coordinator server
    Serve {
        /// Bind address for HTTP
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,

        /// Data-center base URLs in partition order (comma-separated, exactly 3)
        #[arg(long, value_delimiter = ',')]
        data_centers: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, data_centers } => {
            // Load config from file, then override with CLI arguments
            let config = trikv::common::Config::load();
            let mut coord_config = config.coordinator;

            if bind != "0.0.0.0:8080" {
                coord_config.bind_addr = bind.parse()?;
            }
            if !data_centers.is_empty() {
                coord_config.data_centers = <[String; 3]>::try_from(data_centers)
                    .map_err(|v: Vec<String>| {
                        anyhow::anyhow!("expected exactly 3 data centers, got {}", v.len())
                    })?;
            }

            let coord = Coordinator::new(coord_config);
            coord.serve().await?;
        }
    }

    Ok(())
}
