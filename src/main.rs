//! Evaltrack server entry point

use clap::Parser;
use evaltrack::{
    api::{ApiServer, ApiServerConfig},
    config, SqliteStore,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "evaltrack", about = "Course evaluation tracker")]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("evaltrack=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let db_path = config::resolve_db_path(cli.db_path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    info!("Using database at {}", db_path.display());

    let store = SqliteStore::new(&db_path)?;
    store.migrate().await?;

    let server = ApiServer::new(ApiServerConfig { addr: cli.addr }, Arc::new(store));
    server.serve().await
}
