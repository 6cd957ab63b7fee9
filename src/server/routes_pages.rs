//! HTML pages: the file list and the video player.
//!
//! Both pages are static HTML followed by a script tag carrying the current
//! index snapshot, which saves the browser an extra API round trip.

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serve_videos_common::Error;

use super::cache::CacheDirective;
use super::error::AppError;
use super::AppContext;
use crate::state::FileIndex;

const PLAYER_HTML: &str = include_str!("pages/player.html");
const LIST_HTML: &str = include_str!("pages/list.html");

#[derive(Serialize)]
struct PageData<'a> {
    files: &'a FileIndex,
}

/// GET /
pub async fn player_page(State(ctx): State<AppContext>) -> Result<Response, AppError> {
    render(PLAYER_HTML, &ctx.store.snapshot())
}

/// GET /list
pub async fn list_page(State(ctx): State<AppContext>) -> Result<Response, AppError> {
    render(LIST_HTML, &ctx.store.snapshot())
}

fn render(page: &str, index: &FileIndex) -> Result<Response, AppError> {
    let script = data_script(index)?;
    let mut body = String::with_capacity(page.len() + script.len());
    body.push_str(page);
    body.push_str(&script);

    let mut headers = HeaderMap::new();
    CacheDirective::NoStore.apply(&mut headers);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );

    Ok((StatusCode::OK, headers, body).into_response())
}

/// Render the `<script>` tag that defines the page's `data` global.
pub fn data_script(index: &FileIndex) -> Result<String, Error> {
    let json = serde_json::to_string(&PageData { files: index })
        .map_err(|e| Error::internal(format!("failed to encode page data: {e}")))?;
    Ok(format!(
        "<script>'use strict';const data = {};</script>",
        escape_for_script(&json)
    ))
}

/// Escape JSON so it cannot terminate the surrounding `<script>` element.
fn escape_for_script(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}
