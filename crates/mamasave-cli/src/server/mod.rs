//! HTTP surface of the inference service.
//!
//! The predictor is loaded before the listener is bound and then shared
//! read-only by every request through [`AppState`].
pub mod error;
pub mod routes;

use std::future::Future;
use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use mamasave_classifiers::RiskPredictor;

use crate::config::ServeConfig;

#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<RiskPredictor>,
}

pub fn router(predictor: Arc<RiskPredictor>, cors: bool) -> Router {
    let app = Router::new()
        .route("/predict", post(routes::predict))
        .route("/health", get(routes::health))
        .with_state(AppState { predictor });

    if cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Bind the configured address and serve until a shutdown signal arrives.
pub async fn serve(config: &ServeConfig, predictor: Arc<RiskPredictor>) -> Result<()> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    log::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(predictor, config.cors))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("Server stopped");
    Ok(())
}

/// Resolve once `signal` fires. A listener that failed to install is logged
/// and never resolves, so it cannot start a shutdown on its own.
async fn on_signal<F>(signal: F, name: &str)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => log::info!("Received {}", name),
        Err(e) => {
            log::error!("Failed to listen for {}: {}", name, e);
            std::future::pending::<()>().await
        }
    }
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let sigterm = async {
        signal(SignalKind::terminate())?.recv().await;
        Ok::<(), io::Error>(())
    };

    tokio::select! {
        _ = on_signal(sigterm, "SIGTERM") => {},
        _ = on_signal(tokio::signal::ctrl_c(), "SIGINT") => {},
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    on_signal(tokio::signal::ctrl_c(), "Ctrl+C").await
}
