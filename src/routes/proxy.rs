// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The intercepting proxy fallback: every request not aimed at the agent's
//! own routes flows through here.
//!
//! HTTP(S) GET traffic is served through the cache strategies; everything
//! else (mutations in particular) passes through to the upstream
//! unmodified. Mutations are never transparently cached.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use std::sync::Arc;

use crate::cache::CachedResponse;
use crate::error::{AppError, Result};
use crate::AgentState;

/// Upper bound on buffered request bodies (8 MiB).
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

pub async fn intercept(State(state): State<Arc<AgentState>>, req: Request) -> Result<Response> {
    let (parts, body) = req.into_parts();

    let method = parts.method.as_str().to_string();
    let path = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());
    // Relative-form request targets carry no scheme; the proxy only ever
    // speaks plain HTTP.
    let scheme = parts.uri.scheme_str().unwrap_or("http");

    if !state.agent.intercepts(&method, scheme) {
        let content_type = parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| AppError::BadRequest(format!("unreadable body: {e}")))?;

        let response = state
            .upstream
            .passthrough(&method, &path, content_type.as_deref(), bytes)
            .await?;
        return into_http(response);
    }

    // Closest HTTP-visible analog of a navigation request
    let is_navigation = parts
        .headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"));

    let upstream = state.upstream.clone();
    let fetch_path = path.clone();
    let (response, _refresh) = state
        .agent
        .handle_fetch(&path, is_navigation, move || async move {
            upstream.get(&fetch_path).await
        })
        .await?;

    into_http(response)
}

fn into_http(cached: CachedResponse) -> Result<Response> {
    let status = StatusCode::from_u16(cached.status)
        .map_err(|_| AppError::Upstream(format!("invalid upstream status {}", cached.status)))?;

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, cached.content_type)
        .body(Body::from(cached.body))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("response build failed: {e}")))
}
