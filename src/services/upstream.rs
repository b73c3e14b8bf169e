// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the upstream fitness API.
//!
//! Handles:
//! - GET proxying for the cache strategies
//! - Replaying queued mutations to their resource endpoints

use bytes::Bytes;

use crate::cache::CachedResponse;
use crate::error::{AppError, Result};
use crate::models::{PendingMutation, ResourceTag};

/// Upstream API client.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch a resource by path into a cacheable response.
    pub async fn get(&self, path: &str) -> Result<CachedResponse> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let body: Bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        Ok(CachedResponse::new(status, content_type, body))
    }

    /// Pass a mutating request through unmodified.
    pub async fn passthrough(
        &self,
        method: &str,
        path: &str,
        content_type: Option<&str>,
        body: Bytes,
    ) -> Result<CachedResponse> {
        let url = format!("{}{}", self.base_url, path);
        let method: reqwest::Method = method
            .parse()
            .map_err(|_| AppError::BadRequest(format!("invalid method for {path}")))?;

        let mut request = self.http.request(method, &url).body(body);
        if let Some(ct) = content_type {
            request = request.header(reqwest::header::CONTENT_TYPE, ct);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        Ok(CachedResponse::new(status, content_type, body))
    }

    /// Replay a queued mutation against its resource endpoint.
    ///
    /// Endpoints per resource family:
    /// - workout: `PATCH /api/workout-sessions/{sessionId}/complete`
    /// - meal:    `POST /api/meal-logs`
    /// - progress: `POST /api/progress`
    pub async fn deliver(&self, mutation: &PendingMutation) -> Result<()> {
        let response = match mutation.resource_tag {
            ResourceTag::Workout => {
                let session_id = mutation
                    .payload
                    .get("sessionId")
                    .and_then(|v| v.as_u64())
                    .ok_or_else(|| {
                        AppError::BadRequest(format!(
                            "workout mutation {} has no sessionId",
                            mutation.id
                        ))
                    })?;
                let url = format!(
                    "{}/api/workout-sessions/{}/complete",
                    self.base_url, session_id
                );
                self.http.patch(&url).json(&mutation.payload).send().await
            }
            ResourceTag::Meal => {
                let url = format!("{}/api/meal-logs", self.base_url);
                self.http.post(&url).json(&mutation.payload).send().await
            }
            ResourceTag::Progress => {
                let url = format!("{}/api/progress", self.base_url);
                self.http.post(&url).json(&mutation.payload).send().await
            }
        }
        .map_err(|e| AppError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "delivery of {} rejected: {}",
                mutation.id,
                response.status()
            )));
        }
        Ok(())
    }
}
