//! Audit sink seam for compliance logging.
//!
//! The engine hands every decision to an [`AuditSink`] and moves on; sinks
//! must not fail the caller. Persistence belongs to the sink implementation.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{FailureKind, ReviewContext, Strategy};

/// One auditable recovery decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event: String,
    pub repository: String,
    pub commit_sha: String,
    pub target_branch: String,
    pub failure_kind: Option<FailureKind>,
    pub strategy: Strategy,
    pub attempt: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(
        event: impl Into<String>,
        context: &ReviewContext,
        failure_kind: Option<FailureKind>,
        strategy: Strategy,
        attempt: u32,
    ) -> Self {
        Self {
            event: event.into(),
            repository: context.repository.clone(),
            commit_sha: context.commit_sha.clone(),
            target_branch: context.target_branch.clone(),
            failure_kind,
            strategy,
            attempt,
            detail: None,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Fire-and-forget receiver of audit events.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: AuditEvent) {}
}

/// Forwards events to `tracing` under the `revguard::audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        tracing::info!(
            target: "revguard::audit",
            event = %event.event,
            repository = %event.repository,
            commit_sha = %event.commit_sha,
            failure_kind = ?event.failure_kind,
            strategy = %event.strategy,
            attempt = event.attempt,
            detail = event.detail.as_deref().unwrap_or(""),
        );
    }
}

/// Keeps events in memory; handy for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
