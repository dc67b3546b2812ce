//! # Top 5 Lister Binary
//!
//! Assembles the Postgres adapters, the JWT auth provider, and the axum
//! router into a running server.

use std::sync::Arc;

use anyhow::Context;
use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

use api_adapters::AppState;
use auth_adapters::JwtAuthProvider;
use configs::AppConfig;
use domains::{AuthProvider, CommunityRepo, ListRepo, UserRepo};
use services::{AggregationEngine, CommunityService, ListService, UserService};
use storage_adapters::PgStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = AppConfig::load().context("loading configuration")?;

    let store = PgStore::connect(
        cfg.database.url.expose_secret(),
        cfg.database.max_connections,
    )
    .await
    .context("connecting to postgres")?;

    let user_repo: Arc<dyn UserRepo> = store.clone();
    let list_repo: Arc<dyn ListRepo> = store.clone();
    let community_repo: Arc<dyn CommunityRepo> = store;

    let auth: Arc<dyn AuthProvider> = Arc::new(JwtAuthProvider::new(
        cfg.auth.jwt_secret,
        cfg.auth.token_ttl_hours,
    ));
    let engine = Arc::new(AggregationEngine::new(
        list_repo.clone(),
        community_repo.clone(),
    ));

    let state = AppState {
        users: Arc::new(UserService::new(user_repo.clone(), auth.clone())),
        user_repo,
        auth,
        lists: Arc::new(ListService::new(list_repo, engine)),
        community: Arc::new(CommunityService::new(community_repo)),
    };

    let app = api_adapters::router(state);
    let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "top5-lister listening");
    axum::serve(listener, app).await?;
    Ok(())
}
