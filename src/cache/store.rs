// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Named, versioned cache stores.
//!
//! A store maps request identity (method + URL) to a stored response plus
//! fetch metadata. Writes are idempotent replacements by key, so concurrent
//! writers never need read-modify-write locking.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

/// A response held in a cache store.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Bytes,
    /// When this response was fetched from the network.
    pub fetched_at: DateTime<Utc>,
}

impl CachedResponse {
    pub fn new(status: u16, content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body: body.into(),
            fetched_at: Utc::now(),
        }
    }

    /// Successful (2xx) responses are the only ones worth caching.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Request identity used as the cache key.
pub fn request_key(method: &str, path: &str) -> String {
    format!("{method}:{path}")
}

/// One named cache store.
#[derive(Debug)]
pub struct CacheStore {
    name: String,
    entries: DashMap<String, CachedResponse>,
}

impl CacheStore {
    fn new(name: String) -> Self {
        Self {
            name,
            entries: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<CachedResponse> {
        self.entries.get(key).map(|e| e.clone())
    }

    /// Insert or replace by key.
    pub fn put(&self, key: impl Into<String>, response: CachedResponse) {
        self.entries.insert(key.into(), response);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Registry owning every named store for this agent instance.
///
/// Modeled as an explicit owned object with open/delete lifecycle rather
/// than ambient global state, so tests can build isolated instances.
#[derive(Debug, Default)]
pub struct StoreRegistry {
    stores: DashMap<String, Arc<CacheStore>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store by name, creating it if absent.
    pub fn open(&self, name: &str) -> Arc<CacheStore> {
        self.stores
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(CacheStore::new(name.to_string())))
            .clone()
    }

    /// Delete a store. Returns `true` if it existed.
    pub fn delete(&self, name: &str) -> bool {
        self.stores.remove(name).is_some()
    }

    /// Delete every store.
    pub fn clear(&self) {
        self.stores.clear();
    }

    /// Names of every currently open store.
    pub fn names(&self) -> Vec<String> {
        self.stores.iter().map(|e| e.key().clone()).collect()
    }

    /// Look a key up across every store, in no particular order.
    pub fn lookup(&self, key: &str) -> Option<CachedResponse> {
        self.stores.iter().find_map(|store| store.get(key))
    }

    /// Entry counts per store, for `GET_CACHE_STATUS` replies.
    pub fn status(&self) -> HashMap<String, usize> {
        self.stores
            .iter()
            .map(|store| (store.name().to_string(), store.len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_replaces_by_key() {
        let registry = StoreRegistry::new();
        let store = registry.open("gymsync-dynamic-test");

        let key = request_key("GET", "/api/achievements");
        store.put(&key, CachedResponse::new(200, "application/json", "[]"));
        store.put(
            &key,
            CachedResponse::new(200, "application/json", r#"[{"id":"streak-7"}]"#),
        );

        assert_eq!(store.len(), 1);
        let cached = store.get(&key).unwrap();
        assert_eq!(cached.body.as_ref(), br#"[{"id":"streak-7"}]"#);
    }

    #[test]
    fn open_is_idempotent() {
        let registry = StoreRegistry::new();
        let a = registry.open("gymsync-static-test");
        a.put("GET:/", CachedResponse::new(200, "text/html", "<html>"));

        let b = registry.open("gymsync-static-test");
        assert_eq!(b.len(), 1);
        assert_eq!(registry.names().len(), 1);
    }

    #[test]
    fn delete_and_status() {
        let registry = StoreRegistry::new();
        registry
            .open("a")
            .put("GET:/x", CachedResponse::new(200, "text/plain", "x"));
        registry.open("b");

        let status = registry.status();
        assert_eq!(status.get("a"), Some(&1));
        assert_eq!(status.get("b"), Some(&0));

        assert!(registry.delete("a"));
        assert!(!registry.delete("a"));
        assert_eq!(registry.names(), vec!["b".to_string()]);
    }

    #[test]
    fn lookup_spans_stores() {
        let registry = StoreRegistry::new();
        registry
            .open("gymsync-static-v1")
            .put("GET:/", CachedResponse::new(200, "text/html", "<html>"));

        assert!(registry.lookup("GET:/").is_some());
        assert!(registry.lookup("GET:/missing").is_none());
    }
}
