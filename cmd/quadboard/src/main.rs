//! # Quadboard Binary
//!
//! Assembles the campus board from the configured adapters and serves the
//! HTTP surface. The store backend is selected at compile time: Postgres
//! with the default `db-postgres` feature, an in-memory store otherwise
//! (useful for local hacking without a database).

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{router, ApiState};
use auth_adapters::JwtSessions;
use configs::AppConfig;
use services::BoardService;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "db-postgres")]
use secrecy::ExposeSecret;
#[cfg(feature = "db-postgres")]
use storage_adapters::PostgresStore;

#[cfg(not(feature = "db-postgres"))]
use storage_adapters::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    #[cfg(feature = "db-postgres")]
    let store = Arc::new(
        PostgresStore::connect(
            config.database.url.expose_secret(),
            config.database.max_connections,
        )
        .await
        .context("failed to connect to Postgres")?,
    );

    #[cfg(not(feature = "db-postgres"))]
    let store = {
        tracing::warn!("built without db-postgres; using a volatile in-memory store");
        Arc::new(MemoryStore::new())
    };

    let board = Arc::new(BoardService::new(store.clone(), store));
    let sessions = Arc::new(JwtSessions::new(&config.auth.jwt_secret));
    let app = router(ApiState::new(board, sessions));

    let addr = config.server.bind_addr();
    tracing::info!(%addr, "quadboard listening");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
