// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Intercepting-proxy tests with an unreachable upstream.
//!
//! Everything here runs offline, so these tests pin down the cache
//! fallback contract: what is served from the stores and what surfaces as
//! a gateway error when nothing is cached.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use gymsync::cache::{dynamic_store_name, static_store_name, CachedResponse};
use tower::ServiceExt;

mod common;

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

#[tokio::test]
async fn test_network_first_uncached_offline_is_bad_gateway() {
    let (app, _state, _dir) = common::create_test_app().await;

    let response = app
        .oneshot(get("/api/workout-sessions"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_network_first_falls_back_to_cached_entry() {
    let (app, state, _dir) = common::create_test_app().await;

    let dynamic = state
        .agent
        .registry()
        .open(&dynamic_store_name(&state.config.cache_generation));
    dynamic.put(
        "GET:/api/workout-sessions",
        CachedResponse::new(200, "application/json", r#"[{"id":1}]"#),
    );

    let response = app
        .oneshot(get("/api/workout-sessions"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, r#"[{"id":1}]"#);
}

#[tokio::test]
async fn test_stale_while_revalidate_serves_cached_api_response() {
    let (app, state, _dir) = common::create_test_app().await;

    let dynamic = state
        .agent
        .registry()
        .open(&dynamic_store_name(&state.config.cache_generation));
    dynamic.put(
        "GET:/api/achievements",
        CachedResponse::new(200, "application/json", r#"{"unlocked":[]}"#),
    );

    let response = app.oneshot(get("/api/achievements")).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/json"),
    );
    assert_eq!(body_string(response).await, r#"{"unlocked":[]}"#);
}

#[tokio::test]
async fn test_cache_first_serves_seeded_static_asset() {
    let (app, state, _dir) = common::create_test_app().await;

    let statics = state
        .agent
        .registry()
        .open(&static_store_name(&state.config.cache_generation));
    statics.put(
        "GET:/logo.png",
        CachedResponse::new(200, "image/png", "png-bytes"),
    );

    let response = app.oneshot(get("/logo.png")).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "png-bytes");
}

#[tokio::test]
async fn test_offline_navigation_falls_back_to_root_document() {
    let (app, state, _dir) = common::create_test_app().await;

    let statics = state
        .agent
        .registry()
        .open(&static_store_name(&state.config.cache_generation));
    statics.put(
        "GET:/",
        CachedResponse::new(200, "text/html", "<html>app shell</html>"),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/dashboard")
                .header(header::ACCEPT, "text/html,application/xhtml+xml")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "<html>app shell</html>");
}

#[tokio::test]
async fn test_offline_non_navigation_gets_no_root_fallback() {
    let (app, state, _dir) = common::create_test_app().await;

    let statics = state
        .agent
        .registry()
        .open(&static_store_name(&state.config.cache_generation));
    statics.put(
        "GET:/",
        CachedResponse::new(200, "text/html", "<html>app shell</html>"),
    );

    // No Accept: text/html, so the root document must not be substituted
    let response = app.oneshot(get("/api/progress")).await.expect("response");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_query_string_is_part_of_cache_identity() {
    let (app, state, _dir) = common::create_test_app().await;

    let dynamic = state
        .agent
        .registry()
        .open(&dynamic_store_name(&state.config.cache_generation));
    dynamic.put(
        "GET:/api/workout-sessions?page=1",
        CachedResponse::new(200, "application/json", r#"{"page":1}"#),
    );

    let hit = app
        .clone()
        .oneshot(get("/api/workout-sessions?page=1"))
        .await
        .expect("response");
    assert_eq!(hit.status(), StatusCode::OK);

    let miss = app
        .oneshot(get("/api/workout-sessions?page=2"))
        .await
        .expect("response");
    assert_eq!(miss.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_mutations_pass_through_and_are_never_cached() {
    let (app, state, _dir) = common::create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/meal-logs")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"calories":500}"#))
                .expect("request"),
        )
        .await
        .expect("response");

    // Unreachable upstream surfaces as a gateway error; nothing was cached
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let dynamic = state
        .agent
        .registry()
        .open(&dynamic_store_name(&state.config.cache_generation));
    assert!(dynamic.is_empty());
}
