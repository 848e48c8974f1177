//! Structured observability hooks for review recovery.
//!
//! This module provides:
//! - Review-scoped tracing spans via the `ReviewSpan` RAII guard
//! - Emission functions for recovery events: decision, degraded review,
//!   emergency bypass, failed attempt
//!
//! Events are emitted at `info!` level, failures and bypasses at `warn!`
//! (filter with `RUST_LOG`). For JSON output pass `json = true` to
//! [`crate::init_tracing`].

use tracing::{info, warn};

use crate::domain::{FailureKind, Strategy};

/// RAII guard that enters a review-scoped tracing span.
///
/// # Example
///
/// ```ignore
/// let _span = ReviewSpan::enter("org/repo", "abc123");
/// // tracing calls are now tagged with repository and commit_sha
/// ```
pub struct ReviewSpan {
    _span: tracing::span::EnteredSpan,
}

impl ReviewSpan {
    /// Create and enter a span tagged with the repository and commit.
    pub fn enter(repository: &str, commit_sha: &str) -> Self {
        Self {
            _span: review_span(repository, commit_sha).entered(),
        }
    }
}

/// Review-scoped span for instrumenting futures; entered guards must not be
/// held across `.await`.
pub fn review_span(repository: &str, commit_sha: &str) -> tracing::Span {
    tracing::info_span!(
        "revguard.review",
        repository = %repository,
        commit_sha = %commit_sha,
    )
}

/// Emit event: a recovery decision was made.
pub fn emit_fallback_decided(kind: Option<FailureKind>, strategy: Strategy, attempt: u32) {
    info!(
        event = "fallback.decided",
        failure_kind = kind.map(|k| k.as_str()).unwrap_or("none"),
        strategy = %strategy,
        attempt = attempt,
        terminal = strategy.is_terminal(),
    );
}

/// Emit event: a degraded static review replaced the AI review.
pub fn emit_degraded_review(files_analyzed: usize, issues: usize) {
    info!(
        event = "fallback.degraded_review",
        files_analyzed = files_analyzed,
        issues = issues,
    );
}

/// Emit event: an emergency bypass was produced (warning level).
pub fn emit_emergency_bypass(repository: &str, reason: &str) {
    warn!(event = "fallback.emergency_bypass", repository = %repository, reason = %reason);
}

/// Emit event: a primary review attempt failed (warning level).
pub fn emit_attempt_failed(attempt: u32, error: &dyn std::fmt::Display) {
    warn!(event = "review.attempt_failed", attempt = attempt, error = %error);
}
