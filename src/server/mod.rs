use crate::config::{CacheConfig, HttpConfig};
use crate::state::IndexStore;
use anyhow::{Context, Result};
use axum::{routing::get, Router};
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

pub mod cache;
pub mod deadline;
pub mod error;
pub mod routes_pages;
pub mod routes_raw;

use cache::CachePolicy;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    /// Published file index, replaced by the watch loop
    pub store: Arc<IndexStore>,
    /// Absolute directory that index entries are relative to
    pub root: Arc<PathBuf>,
    pub cache: Arc<CachePolicy>,
}

impl AppContext {
    pub fn new(store: Arc<IndexStore>, root: PathBuf, cache: &CacheConfig) -> Self {
        Self {
            store,
            root: Arc::new(root),
            cache: Arc::new(CachePolicy::new(cache)),
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(routes_pages::player_page))
        .route("/list", get(routes_pages::list_page))
        .route("/raw/{*path}", get(routes_raw::serve_raw))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Bind the listening socket.
pub async fn bind(addr: &str) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))
}

/// Serve `app` on `listener` until `cancel` fires.
///
/// Each request gets `read_timeout` to deliver its headers and then
/// `write_timeout` to be answered in full; both reset for every request on a
/// keep-alive connection. Once cancelled, the listener is closed and open
/// connections get `shutdown_grace` to finish before they are abandoned.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    http: &HttpConfig,
    cancel: CancellationToken,
) -> Result<()> {
    let app = app.layer(axum::middleware::from_fn_with_state(
        http.write_timeout(),
        deadline::limit_response,
    ));
    let graceful = GracefulShutdown::new();

    let mut builder = http1::Builder::new();
    builder
        .timer(TokioTimer::new())
        .header_read_timeout(http.read_timeout());

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer) = match result {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        tracing::debug!("Accept error: {e}");
                        continue;
                    }
                };
                let service = TowerToHyperService::new(app.clone().into_service());
                let conn = graceful.watch(builder.serve_connection(TokioIo::new(stream), service));
                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        tracing::debug!(%peer, "Connection error: {e}");
                    }
                });
            }
            _ = cancel.cancelled() => break,
        }
    }

    drop(listener);
    tracing::info!("Waiting for in-flight connections to finish");

    tokio::select! {
        _ = graceful.shutdown() => {
            tracing::info!("Server shutdown complete");
        }
        _ = tokio::time::sleep(http.shutdown_grace()) => {
            tracing::warn!(
                grace_secs = http.shutdown_grace_secs,
                "Grace period elapsed; abandoning open connections"
            );
        }
    }

    Ok(())
}

/// Resolve on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
