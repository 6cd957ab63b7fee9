//! Integration tests for `GET /raw/<path>`.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{body_to_bytes, body_to_string, TestHarness};
use serve_videos::server::cache::NO_STORE;

#[tokio::test]
async fn serves_indexed_file() {
    let h = TestHarness::with_files(&["a.mp4"]);

    let resp = h.get("/raw/a.mp4").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "video/mp4");
    assert_eq!(
        resp.headers()[header::CACHE_CONTROL],
        "public, max-age=86400"
    );
    assert_eq!(body_to_string(resp.into_body()).await, "a.mp4");
}

#[tokio::test]
async fn playlist_is_not_cached() {
    let h = TestHarness::with_files(&["live/index.m3u8"]);

    let resp = h.get("/raw/live/index.m3u8").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CACHE_CONTROL], NO_STORE);
    assert_eq!(resp.headers()[header::PRAGMA], "no-cache");
    assert_eq!(resp.headers()[header::EXPIRES], "0");
}

#[tokio::test]
async fn segments_are_cached() {
    let h = TestHarness::with_files(&["live/seg001.ts"]);

    let resp = h.get("/raw/live/seg001.ts").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CACHE_CONTROL],
        "public, max-age=86400"
    );
}

#[tokio::test]
async fn traversal_is_rejected() {
    let h = TestHarness::with_files(&["a.mp4"]);
    std::fs::write(h.root().join("secret.mp4"), b"nope").unwrap();

    for uri in [
        "/raw/../secret.mp4",
        "/raw/%2E%2E/secret.mp4",
        "/raw/%2e%2e%2fsecret.mp4",
        "/raw/./a.mp4",
    ] {
        let resp = h.get(uri).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body_to_string(resp.into_body()).await, "Invalid path");
    }
}

#[tokio::test]
async fn unindexed_file_on_disk_is_not_served() {
    let h = TestHarness::with_files(&["a.mp4", "notes.txt"]);

    let resp = h.get("/raw/notes.txt").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.headers().get(header::CACHE_CONTROL).is_none());
    assert_eq!(body_to_string(resp.into_body()).await, "Invalid path");
}

#[tokio::test]
async fn file_added_after_scan_is_not_served_until_rescan() {
    let h = TestHarness::with_files(&["a.mp4"]);
    h.write("b.mkv", b"b");

    assert_eq!(h.get("/raw/b.mkv").await.status(), StatusCode::NOT_FOUND);

    h.rescan();
    assert_eq!(h.get("/raw/b.mkv").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_escapes_are_rejected() {
    let h = TestHarness::with_files(&["a.mp4"]);

    for uri in ["/raw/%zz.mp4", "/raw/a%2.mp4", "/raw/%ff.mp4"] {
        let resp = h.get(uri).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body_to_string(resp.into_body()).await, "Invalid path");
    }
}

#[tokio::test]
async fn percent_encoded_names() {
    let h = TestHarness::with_files(&["sub dir/clip one.mp4", "a+b.mkv", "100%.mp4"]);

    let resp = h.get("/raw/sub%20dir/clip%20one.mp4").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_to_string(resp.into_body()).await,
        "sub dir/clip one.mp4"
    );

    // '+' is literal in a path.
    assert_eq!(h.get("/raw/a+b.mkv").await.status(), StatusCode::OK);
    assert_eq!(h.get("/raw/a%2Bb.mkv").await.status(), StatusCode::OK);

    // Decoded exactly once.
    assert_eq!(h.get("/raw/100%25.mp4").await.status(), StatusCode::OK);
    assert_eq!(
        h.get("/raw/100%2525.mp4").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn range_request() {
    let h = TestHarness::new();
    let data: Vec<u8> = (0..=255u8).cycle().take(2048).collect();
    h.write("range.mp4", &data);
    h.rescan();

    let resp = h
        .send(
            Request::builder()
                .uri("/raw/range.mp4")
                .header(header::RANGE, "bytes=100-199")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(resp.headers()[header::CONTENT_RANGE], "bytes 100-199/2048");
    assert_eq!(
        resp.headers()[header::CACHE_CONTROL],
        "public, max-age=86400"
    );
    assert_eq!(body_to_bytes(resp.into_body()).await, &data[100..200]);
}

#[tokio::test]
async fn head_request() {
    let h = TestHarness::with_files(&["a.mp4"]);

    let resp = h
        .send(
            Request::builder()
                .method(Method::HEAD)
                .uri("/raw/a.mp4")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_LENGTH], "5");
    assert!(body_to_bytes(resp.into_body()).await.is_empty());
}

#[tokio::test]
async fn indexed_file_missing_on_disk() {
    let h = TestHarness::with_files(&["a.mp4"]);
    std::fs::remove_file(h.root().join("a.mp4")).unwrap();

    let resp = h.get("/raw/a.mp4").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.headers().get(header::CACHE_CONTROL).is_none());
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let h = TestHarness::with_files(&["a.mp4"]);

    assert_eq!(h.get("/a.mp4").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(h.get("/nope").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(h.get("/raw").await.status(), StatusCode::NOT_FOUND);
}
