//! ComptoxAI Graph API - Main Server
//!
//! A REST API over the ComptoxAI Neo4j knowledge graph.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use comptox_api::neo4j::{schema::filter_namespace, Neo4jClient};
use comptox_api::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "comptox-api")]
#[command(about = "ComptoxAI knowledge graph API server")]
struct Cli {
    /// YAML config file (defaults to ./config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Port to listen on (overrides config.yaml and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check the database connection and list the node types it exposes
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,comptox_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_yaml_and_env(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server_port = port;
            }
            comptox_api::start_server(config).await
        }
        Commands::Check => run_check(config).await,
    }
}

async fn run_check(config: Config) -> Result<()> {
    let client =
        Neo4jClient::new(&config.neo4j_uri, &config.neo4j_user, &config.neo4j_password).await?;

    if !client.health_check().await? {
        bail!("Neo4j at {} did not answer", config.neo4j_uri);
    }

    let labels = client.list_labels().await?;
    let node_types = filter_namespace(&labels, config.namespace.as_deref());
    println!(
        "Connected to {} ({} node types in namespace {})",
        config.neo4j_uri,
        node_types.len(),
        config.namespace.as_deref().unwrap_or("<none>")
    );
    for node_type in node_types {
        println!("  {}", node_type);
    }
    Ok(())
}
