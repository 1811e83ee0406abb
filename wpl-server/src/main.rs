mod routes;
mod singleton;
mod state;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wpl_core::constants::{DEFAULT_NAMESPACE, DEFAULT_SERVER_PORT};

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "wpl-server")]
#[command(about = "Key-value backend the planner syncs its local store with")]
struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    #[arg(short, long, default_value_t = DEFAULT_SERVER_PORT)]
    port: u16,

    /// Storage file, defaults to the platform data directory
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Only keys with this prefix are accepted
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,
}

fn default_data_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(data_dir.join("wpl-server").join("storage.json"))
}

fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::storage::router())
        .merge(routes::health::router())
        .with_state(state)
        .layer(cors)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let data_path = match args.data {
        Some(path) => path,
        None => default_data_path()?,
    };

    // One server per storage file
    let _lock = singleton::acquire_lock(&data_path)?;

    let state = AppState::open(&data_path, &args.namespace)
        .with_context(|| format!("Failed to open {}", data_path.display()))?;

    let addr = SocketAddr::new(args.host, args.port);
    info!(%addr, data = %data_path.display(), namespace = %args.namespace, "wpl-server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
