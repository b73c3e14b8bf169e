// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route classification: maps a request path to a caching strategy.
//!
//! Evaluation order is fixed and significant: network-first patterns win
//! over cache-first patterns, which win over the cacheable-API table.
//! Anything matching nothing defaults to network-first. Only GET requests
//! are ever classified; mutations bypass interception entirely.

/// Strategy tags, one per cache strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    NetworkFirst,
    CacheFirst,
    StaleWhileRevalidate,
}

/// Mutable, user-specific resources: always try the network first.
const NETWORK_FIRST_PREFIXES: &[&str] = &[
    "/api/workout-sessions",
    "/api/meal-logs",
    "/api/progress",
    "/api/admin",
];

/// Static asset extensions served cache-first.
const CACHE_FIRST_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".svg", ".gif", ".webp", ".ico", ".css", ".js",
];

/// Read-mostly API resources suitable for stale-while-revalidate.
const API_CACHE_PREFIXES: &[&str] = &[
    "/api/auth/user",
    "/api/motivation-quote",
    "/api/achievements",
    "/api/workout-plans",
    "/api/meal-plans",
];

/// Classify a request path. Deterministic: a given path always maps to the
/// same strategy regardless of call order.
pub fn classify(path: &str) -> Strategy {
    if matches_prefix(path, NETWORK_FIRST_PREFIXES) {
        Strategy::NetworkFirst
    } else if is_static_asset(path) {
        Strategy::CacheFirst
    } else if matches_prefix(path, API_CACHE_PREFIXES) {
        Strategy::StaleWhileRevalidate
    } else {
        Strategy::NetworkFirst
    }
}

fn matches_prefix(path: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| path.starts_with(p))
}

fn is_static_asset(path: &str) -> bool {
    // Query strings never reach here; the proxy classifies on the path only.
    let lower = path.to_ascii_lowercase();
    CACHE_FIRST_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
        || lower.starts_with("/fonts/")
}
