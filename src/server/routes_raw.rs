//! Raw file retrieval.
//!
//! `GET /raw/<path>` serves a file only if `<path>` is in the published
//! index. Range requests, conditional requests and `Content-Type` are left
//! to `tower_http`'s `ServeFile`.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use super::error::AppError;
use super::AppContext;
use crate::state;

/// Route prefix for raw file retrieval.
pub const RAW_PREFIX: &str = "/raw/";

/// GET /raw/{*path}
pub async fn serve_raw(State(ctx): State<AppContext>, request: Request) -> Response {
    // The still-encoded path, so decoding happens exactly once.
    let raw = request
        .uri()
        .path()
        .strip_prefix(RAW_PREFIX)
        .unwrap_or_default()
        .to_owned();

    let rel = {
        let index = ctx.store.snapshot();
        match state::resolve(&index, &raw) {
            Ok(rel) => rel,
            Err(e) => {
                tracing::info!(path = %raw, reason = %e, "Rejected raw request");
                return AppError::from(e).into_response();
            }
        }
    };

    let directive = ctx.cache.for_path(&rel);
    let file_path = ctx.root.join(&rel);

    let mut response = match ServeFile::new(&file_path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    };

    let status = response.status();
    if status.is_success() || status == StatusCode::NOT_MODIFIED {
        directive.apply(response.headers_mut());
    } else if status == StatusCode::NOT_FOUND {
        // Indexed but gone from disk; the next rescan will drop it.
        tracing::debug!(path = %rel, "Indexed file missing on disk");
    }

    response
}
