//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates a temporary media root, scans it
//! into an [`IndexStore`] and builds the full [`AppContext`]. Requests are
//! driven through the router with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use serve_videos::config::CacheConfig;
use serve_videos::scanner::{self, WatchHandle};
use serve_videos::server::{create_router, AppContext};
use serve_videos::state::IndexStore;
use serve_videos_common::ExtensionSet;

/// Test harness wrapping a temporary media root and a fully-constructed
/// [`AppContext`].
pub struct TestHarness {
    pub dir: TempDir,
    pub store: Arc<IndexStore>,
    pub ctx: AppContext,
    pub extensions: ExtensionSet,
}

impl TestHarness {
    /// Create a harness with an empty root.
    pub fn new() -> Self {
        Self::with_files(&[])
    }

    /// Create a harness whose root holds `files` (each file's contents are
    /// its own relative path) and scan it once.
    pub fn with_files(files: &[&str]) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        for rel in files {
            write_file(dir.path(), rel, rel.as_bytes());
        }

        let extensions = ExtensionSet::default();
        let (handle, index) =
            scanner::scan(dir.path(), &extensions).expect("initial scan failed");
        handle.close();

        let store = Arc::new(IndexStore::new(index));
        let ctx = AppContext::new(
            store.clone(),
            dir.path().to_path_buf(),
            &CacheConfig::default(),
        );

        Self {
            dir,
            store,
            ctx,
            extensions,
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file below the root. The index is not updated.
    pub fn write(&self, rel: &str, contents: &[u8]) {
        write_file(self.root(), rel, contents);
    }

    /// Rescan the root and publish the result, as the watch loop would.
    pub fn rescan(&self) -> u64 {
        let (handle, index) = self.scan();
        handle.close();
        self.store.publish(index)
    }

    /// Scan the root without publishing.
    pub fn scan(&self) -> (WatchHandle, serve_videos::state::FileIndex) {
        scanner::scan(self.root(), &self.extensions).expect("rescan failed")
    }

    pub fn router(&self) -> Router {
        create_router(self.ctx.clone())
    }

    /// Send a request through a fresh router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router().oneshot(request).await.unwrap()
    }

    /// GET `uri` through a fresh router.
    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }
}

fn write_file(root: &Path, rel: &str, contents: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

/// Helper to get response body as string
pub async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Helper to get response body as raw bytes
pub async fn body_to_bytes(body: Body) -> Vec<u8> {
    body.collect().await.unwrap().to_bytes().to_vec()
}
