//! serve-videos - serve a directory of media files over HTTP
//!
//! A directory scanner and a filesystem watch loop keep an in-memory index of
//! playable files up to date; the HTTP layer only serves files that are in
//! the currently published index.

pub mod config;
pub mod scanner;
pub mod server;
pub mod state;
pub mod watch;

use anyhow::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use config::Config;
use server::AppContext;
use state::IndexStore;
use watch::WatchLoop;

/// Scan the root, start watching it and serve HTTP until a shutdown signal.
pub async fn start(config: Config) -> Result<()> {
    let root = config::resolve_root(&config.server.root)?;
    let extensions = config.server.extensions.clone();

    // Bind before any background task is spawned.
    let listener = server::bind(&config.server.addr).await?;

    tracing::info!(
        root = %root.display(),
        extensions = %extensions,
        "Looking for files"
    );

    let (handle, index) = watch::initial_scan(root.clone(), extensions.clone()).await?;
    let store = Arc::new(IndexStore::new(index));

    let cancel = CancellationToken::new();
    let watcher = WatchLoop::new(root.clone(), extensions, store.clone())
        .with_settle_window(config.watch.coalesce_window());
    let watch_task = tokio::spawn(watcher.run(handle, cancel.clone()));

    let ctx = AppContext::new(store, root, &config.cache);
    let app = server::create_router(ctx);

    match listener.local_addr() {
        Ok(addr) => tracing::info!("Listening on http://{}", addr),
        Err(_) => tracing::info!("Listening on http://{}", config.server.addr),
    }

    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        server::shutdown_signal().await;
        signal_cancel.cancel();
    });

    let result = server::serve(listener, app, &config.http, cancel.clone()).await;

    cancel.cancel();
    if let Err(e) = watch_task.await {
        tracing::warn!("Watch task ended abnormally: {}", e);
    }

    result
}
