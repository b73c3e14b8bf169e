// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The three cache strategies.
//!
//! Each strategy takes the store(s) it may read or write plus a fetch
//! closure, so callers (and tests) control how the network is reached.
//! Network failures on read paths are recovered via the cache wherever the
//! contract allows; they surface only when there is nothing cached to serve.

use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::cache::store::{request_key, CachedResponse, CacheStore, StoreRegistry};
use crate::error::{AppError, Result};

/// Root document key used as the navigation fallback.
fn root_key() -> String {
    request_key("GET", "/")
}

/// Network-first: try the network, write through on success, fall back to
/// the cache on failure. Navigations without a cached entry fall back to
/// the cached root document.
pub async fn network_first<F, Fut>(
    registry: &StoreRegistry,
    dynamic: &CacheStore,
    key: &str,
    is_navigation: bool,
    fetch: F,
) -> Result<CachedResponse>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<CachedResponse>>,
{
    match fetch().await {
        Ok(response) => {
            if response.is_ok() {
                dynamic.put(key, response.clone());
            }
            Ok(response)
        }
        Err(err) => {
            tracing::debug!(key, "Network failed, trying cache");

            if let Some(cached) = registry.lookup(key) {
                return Ok(cached);
            }
            if is_navigation {
                if let Some(root) = registry.lookup(&root_key()) {
                    return Ok(root);
                }
            }
            Err(AppError::CacheMiss(err.to_string()))
        }
    }
}

/// Cache-first: return a hit immediately; on a miss fetch and populate the
/// static store. A miss combined with a network failure propagates; there
/// is no further fallback for static assets.
pub async fn cache_first<F, Fut>(
    registry: &StoreRegistry,
    static_store: &CacheStore,
    key: &str,
    fetch: F,
) -> Result<CachedResponse>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<CachedResponse>>,
{
    if let Some(cached) = registry.lookup(key) {
        return Ok(cached);
    }

    let response = fetch().await?;
    if response.is_ok() {
        static_store.put(key, response.clone());
    }
    Ok(response)
}

/// Stale-while-revalidate: return the cached value immediately when present
/// while a background task refreshes the store; otherwise wait for the
/// network.
///
/// The refresh task's handle is returned so callers can await completion
/// instead of racing a fire-and-forget chain. Duplicate in-flight refreshes
/// for the same key are tolerated; the last write wins.
pub async fn stale_while_revalidate<F, Fut>(
    dynamic: Arc<CacheStore>,
    key: &str,
    fetch: F,
) -> Result<(CachedResponse, Option<JoinHandle<()>>)>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<CachedResponse>> + Send + 'static,
{
    match dynamic.get(key) {
        Some(cached) => {
            let key = key.to_string();
            let refresh = tokio::spawn(async move {
                match fetch().await {
                    Ok(response) if response.is_ok() => {
                        dynamic.put(&key, response);
                    }
                    Ok(response) => {
                        tracing::debug!(key, status = response.status, "Refresh not cached");
                    }
                    // The stale value already returned takes precedence.
                    Err(err) => {
                        tracing::debug!(key, error = %err, "Background refresh failed");
                    }
                }
            });
            Ok((cached, Some(refresh)))
        }
        None => {
            let response = fetch().await?;
            if response.is_ok() {
                dynamic.put(key, response.clone());
            }
            Ok((response, None))
        }
    }
}
