//! Revguard Core Library
//!
//! Failure-recovery decisions for an AI code-review pipeline: classify an
//! upstream failure, pick a recovery strategy for the current attempt, and
//! either signal a retry or produce a review result with the same shape as
//! a successful AI review.

pub mod analyzer;
pub mod audit;
pub mod backoff;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod executors;
pub mod obs;
pub mod orchestrator;
pub mod prompt;
pub mod review_loop;
pub mod selector;
pub mod telemetry;

pub use domain::{
    FailureKind, FallbackType, Issue, Result, ReviewContext, ReviewFile, ReviewMetadata,
    ReviewSummary, RevguardError, Severity, Strategy, StructuredReviewResult, UpstreamError,
};

pub use analyzer::{HeuristicAnalyzer, StaticAnalyzer};
pub use audit::{AuditEvent, AuditSink, MemoryAuditSink, NoopAuditSink, TracingAuditSink};
pub use backoff::{delay_ms, Backoff, BASE_DELAY_MS, MAX_DELAY_MS};
pub use classifier::classify;
pub use config::FallbackConfig;
pub use executors::{DecisionReport, FallbackDecision};
pub use orchestrator::{FallbackOrchestrator, FallbackRequest};
pub use prompt::ReviewPrompt;
pub use review_loop::{review_with_fallback, ReviewCompleter, ReviewJob};
pub use selector::select_strategy;

pub use obs::{
    emit_attempt_failed, emit_degraded_review, emit_emergency_bypass, emit_fallback_decided,
    review_span, ReviewSpan,
};
pub use telemetry::init_tracing;

/// Revguard version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
