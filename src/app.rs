/*
 * Responsibility
 * - tracing 初期化 → Config 読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (CORS / request-id / trace など)
 * - axum::serve() で起動
 */
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, handlers::health::health};
use crate::config::Config;
use crate::middleware;
use crate::repos::PostgrestBookRepo;
use crate::services::{identity::GoTrueIdentity, supabase::SupabaseClient};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,book_catalog=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    tracing::info!(
        "starting book catalog API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the upstream adapters and inject them into the shared state.
pub fn build_state(config: &Config) -> Result<AppState> {
    // GoTrue と PostgREST で connection pool を共有する
    let supabase = SupabaseClient::new(
        config.supabase_url.clone(),
        config.supabase_service_key.clone(),
    )
    .context("failed to build Supabase HTTP client")?;

    tracing::info!(url = %supabase.base_url(), table = %config.books_table, "using Supabase project");

    let identity = Arc::new(GoTrueIdentity::new(supabase.clone()));
    let books = Arc::new(PostgrestBookRepo::new(supabase, config.books_table.clone()));

    Ok(AppState::new(identity, books))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api", api::routes(state.clone()))
        .with_state(state);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}
