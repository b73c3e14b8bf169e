// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable offline mutation queue.
//!
//! Records mutations attempted while disconnected and replays them when a
//! sync trigger fires. Persistence is a JSON journal rewritten atomically
//! (temp file + rename) after every change; the queue only ever holds the
//! mutations made while offline, so a full rewrite stays cheap.
//!
//! Delivery is at-least-once: a record is deleted only after the remote
//! call definitively succeeds, so a crash between success and deletion
//! redelivers. The upstream endpoints must tolerate replay.

use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{PendingMutation, ResourceTag};

/// Outcome of draining one resource tag.
///
/// Callers use the per-id lists to emit sync-success events and decide
/// whether anything is left for the next trigger.
#[derive(Debug, Clone, Default)]
pub struct DrainReport {
    /// Number of mutations delivered and deleted.
    pub delivered: u32,
    /// Number of mutations that failed delivery and were retained.
    pub failed: u32,
    /// Ids of delivered mutations, in delivery (creation) order.
    pub delivered_ids: Vec<Uuid>,
    /// Ids of retained mutations.
    pub failed_ids: Vec<Uuid>,
}

impl DrainReport {
    /// Returns true if every attempted mutation was delivered.
    pub fn is_complete_success(&self) -> bool {
        self.failed == 0
    }

    /// Returns true if every attempted mutation failed.
    pub fn is_complete_failure(&self) -> bool {
        self.delivered == 0 && self.failed > 0
    }

    /// Returns true if some mutations succeeded and some failed.
    pub fn is_partial_failure(&self) -> bool {
        self.delivered > 0 && self.failed > 0
    }
}

/// Durable record of mutations attempted while disconnected.
pub struct OfflineQueue {
    path: PathBuf,
    /// In creation order; `enqueue` appends and `open` re-sorts.
    inner: Mutex<Vec<PendingMutation>>,
    /// Delivery attempts allowed per mutation; `None` is unbounded.
    max_attempts: Option<u32>,
}

impl OfflineQueue {
    /// Open the queue at `path`, loading any existing journal.
    pub async fn open(path: impl AsRef<Path>, max_attempts: Option<u32>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut mutations: Vec<PendingMutation> = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| AppError::Queue(format!("corrupt journal {}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(AppError::Queue(format!(
                    "cannot read journal {}: {e}",
                    path.display()
                )))
            }
        };
        mutations.sort_by_key(|m| m.created_at);

        tracing::info!(
            path = %path.display(),
            pending = mutations.len(),
            "Offline queue opened"
        );

        Ok(Self {
            path,
            inner: Mutex::new(mutations),
            max_attempts,
        })
    }

    /// Persist a new pending mutation with `attempts = 0`.
    ///
    /// No network is touched; the caller gets the record back immediately.
    pub async fn enqueue(
        &self,
        resource_tag: ResourceTag,
        payload: serde_json::Value,
    ) -> Result<PendingMutation> {
        let mutation = PendingMutation::new(resource_tag, payload);

        let mut inner = self.inner.lock().await;
        inner.push(mutation.clone());
        self.persist(&inner).await?;

        tracing::info!(
            id = %mutation.id,
            tag = resource_tag.as_str(),
            pending = inner.len(),
            "Queued offline mutation"
        );
        Ok(mutation)
    }

    /// Drain all mutations for one resource tag, oldest first.
    ///
    /// Delivery goes through `deliver`; a record is deleted only on
    /// success. Failures increment `attempts` and retain the record for the
    /// next trigger, unless the configured attempt cap is exceeded, in
    /// which case the record is dropped with a warning.
    pub async fn drain<F, Fut>(&self, resource_tag: ResourceTag, deliver: F) -> Result<DrainReport>
    where
        F: Fn(PendingMutation) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let mut inner = self.inner.lock().await;
        let mut report = DrainReport::default();
        let mut retained = Vec::with_capacity(inner.len());

        // Creation order within the tag preserves causal ordering of a
        // user's sequential edits.
        for mut mutation in inner.drain(..) {
            if mutation.resource_tag != resource_tag {
                retained.push(mutation);
                continue;
            }

            if let Some(cap) = self.max_attempts {
                if mutation.attempts >= cap {
                    tracing::warn!(
                        id = %mutation.id,
                        attempts = mutation.attempts,
                        cap,
                        "Dropping mutation: attempt cap exceeded"
                    );
                    continue;
                }
            }

            match deliver(mutation.clone()).await {
                Ok(()) => {
                    report.delivered += 1;
                    report.delivered_ids.push(mutation.id);
                }
                Err(err) => {
                    mutation.attempts += 1;
                    tracing::warn!(
                        id = %mutation.id,
                        tag = resource_tag.as_str(),
                        attempts = mutation.attempts,
                        error = %err,
                        "Delivery failed, mutation retained"
                    );
                    report.failed += 1;
                    report.failed_ids.push(mutation.id);
                    retained.push(mutation);
                }
            }
        }

        *inner = retained;
        self.persist(&inner).await?;

        tracing::info!(
            tag = resource_tag.as_str(),
            delivered = report.delivered,
            failed = report.failed,
            "Drain complete"
        );
        Ok(report)
    }

    /// Number of pending mutations for a tag.
    pub async fn pending(&self, resource_tag: ResourceTag) -> usize {
        self.inner
            .lock()
            .await
            .iter()
            .filter(|m| m.resource_tag == resource_tag)
            .count()
    }

    /// Snapshot of the pending mutations for a tag, oldest first.
    pub async fn snapshot(&self, resource_tag: ResourceTag) -> Vec<PendingMutation> {
        self.inner
            .lock()
            .await
            .iter()
            .filter(|m| m.resource_tag == resource_tag)
            .cloned()
            .collect()
    }

    /// Atomically rewrite the journal (temp file + rename).
    async fn persist(&self, mutations: &[PendingMutation]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AppError::Queue(format!("cannot create {}: {e}", parent.display())))?;
            }
        }

        let bytes = serde_json::to_vec_pretty(mutations)
            .map_err(|e| AppError::Queue(format!("serialize journal: {e}")))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| AppError::Queue(format!("write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| AppError::Queue(format!("rename {}: {e}", self.path.display())))?;
        Ok(())
    }
}
