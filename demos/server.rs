//! Standalone server over a SQLite file.
//!
//! Run: `cargo run --example server`
//! Settings come from `CRUD_*` environment variables or `.env`.

use sql_crud::{build_router, load_from_env, AppState, SqliteStore};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sql_crud=info")),
        )
        .init();

    let config = load_from_env()?;
    let store = SqliteStore::connect(&config).await?;
    let listen_addr = config.listen_addr.clone();
    let state = AppState::new(config, Arc::new(store));

    let app = build_router(state);
    let listener = TcpListener::bind(&listen_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
