//! 画像サイズ合わせサービス
//!
//! multipart でアップロードされた画像をプリセットまたはルール文の仕様
//! （寸法・KB 範囲・形式）に合わせて再エンコードし、JSON で返す。

use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod config;
mod handler;
mod process;

use config::ServerConfig;

/// multipart の境界やヘッダ分の余裕
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/process", post(handler::process))
        .route("/api/presets", get(handler::list_presets))
        .layer(DefaultBodyLimit::max(
            fit_core::MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fit_server=info,fit_core=info,tower_http=info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::from_env()?;
    std::fs::create_dir_all(&config.upload_dir)?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        upload_dir = %config.upload_dir.display(),
        max_attempts = config.fit.max_attempts(),
        "starting fit-server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let listener = TcpListener::bind(config.bind_addr).await?;
    let state = AppState {
        config: Arc::new(config),
    };

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown signal received");
}
