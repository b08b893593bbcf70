use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use pncp::config::{AppConfig, DatabaseConfig};
use pncp::server;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        #[clap(flatten)]
        config: AppConfig,
    },
    /// Check that the configured database is reachable
    CheckDb {
        #[clap(flatten)]
        database: DatabaseConfig,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Serve { config } => {
            info!("Starting server on port {}", config.port);
            server::start_server(config).await?;
        }
        Commands::CheckDb { database } => {
            server::check_database(&database).await?;
        }
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!(
            "sqlx=warn,hyper=info,{}",
            log_level
        )))
        .init();
}
