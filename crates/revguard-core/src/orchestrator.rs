//! Fallback orchestrator: classify → select → execute.
//!
//! The orchestrator holds only read-only collaborators, so one instance can
//! serve concurrent review requests. Attempt counters belong to the caller.
//! It never errors: malformed input falls back to safe defaults.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analyzer::{HeuristicAnalyzer, StaticAnalyzer};
use crate::audit::{AuditEvent, AuditSink, NoopAuditSink};
use crate::backoff::Backoff;
use crate::classifier::classify;
use crate::config::FallbackConfig;
use crate::domain::{
    FailureKind, ReviewContext, ReviewFile, Strategy, StructuredReviewResult, UpstreamError,
};
use crate::executors::{
    execute_degraded, execute_emergency, execute_manual, execute_retry, execute_simplified,
    FallbackDecision,
};
use crate::obs;
use crate::prompt::ReviewPrompt;
use crate::selector::select_strategy;

/// Everything the engine needs to decide on one failed attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackRequest {
    pub error: UpstreamError,
    pub context: ReviewContext,
    /// 1-based attempt that just failed; `0` is read as `1`.
    pub attempt: u32,
    /// Changed files, used by degraded review and prompt rebuilding.
    pub files: Vec<ReviewFile>,
    /// Prompt that failed, used to build the simplified prompt.
    pub prompt: Option<ReviewPrompt>,
    /// Operator-supplied reason for an emergency bypass.
    pub bypass_reason: Option<String>,
}

impl FallbackRequest {
    pub fn new(error: UpstreamError, context: ReviewContext, attempt: u32) -> Self {
        Self {
            error,
            context,
            attempt,
            ..Self::default()
        }
    }

    pub fn with_files(mut self, files: Vec<ReviewFile>) -> Self {
        self.files = files;
        self
    }

    pub fn with_prompt(mut self, prompt: ReviewPrompt) -> Self {
        self.prompt = Some(prompt);
        self
    }

    pub fn with_bypass_reason(mut self, reason: impl Into<String>) -> Self {
        self.bypass_reason = Some(reason.into());
        self
    }

    fn attempt(&self) -> u32 {
        self.attempt.max(1)
    }
}

/// Façade over the classifier, selector, backoff and executors.
pub struct FallbackOrchestrator {
    config: Arc<FallbackConfig>,
    backoff: Backoff,
    analyzer: Arc<dyn StaticAnalyzer>,
    audit: Arc<dyn AuditSink>,
}

impl FallbackOrchestrator {
    pub fn new(config: Arc<FallbackConfig>) -> Self {
        Self {
            config,
            backoff: Backoff::default(),
            analyzer: Arc::new(HeuristicAnalyzer::new()),
            audit: Arc::new(NoopAuditSink),
        }
    }

    pub fn with_analyzer(mut self, analyzer: Arc<dyn StaticAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn config(&self) -> &FallbackConfig {
        &self.config
    }

    /// Classify and select without executing anything.
    pub fn plan(&self, error: &UpstreamError, attempt: u32) -> (FailureKind, Strategy) {
        let kind = classify(error);
        let strategy = select_strategy(kind, attempt, &self.config);
        (kind, strategy)
    }

    /// Decide how to recover from one failed attempt.
    pub fn handle(&self, request: &FallbackRequest) -> FallbackDecision {
        let attempt = request.attempt();
        let (kind, strategy) = self.plan(&request.error, attempt);
        let decision = self.materialize(strategy, request, Some(kind));

        obs::emit_fallback_decided(Some(kind), strategy, attempt);
        self.record("fallback.decided", request, Some(kind), strategy);
        decision
    }

    /// Materialize a specific strategy on request, bypassing selection.
    pub fn execute(
        &self,
        strategy: Strategy,
        request: &FallbackRequest,
        kind: Option<FailureKind>,
    ) -> FallbackDecision {
        let decision = self.materialize(strategy, request, kind);
        obs::emit_fallback_decided(kind, strategy, request.attempt());
        self.record("fallback.executed", request, kind, strategy);
        decision
    }

    /// Like [`execute`](Self::execute) but by name; unknown names yield
    /// `FallbackDecision::None` so a typo never turns into endless retries.
    pub fn execute_named(&self, name: &str, request: &FallbackRequest) -> FallbackDecision {
        match name.parse::<Strategy>() {
            Ok(strategy) => self.execute(strategy, request, None),
            Err(err) => {
                tracing::warn!(error = %err, "refusing to execute unknown strategy");
                self.record("fallback.unknown_strategy", request, None, Strategy::None);
                FallbackDecision::None
            }
        }
    }

    /// Operator-forced bypass. Works even when fallbacks are disabled.
    pub fn emergency_bypass(
        &self,
        context: &ReviewContext,
        reason: Option<&str>,
    ) -> StructuredReviewResult {
        let mut request = FallbackRequest::new(UpstreamError::default(), context.clone(), 1);
        request.bypass_reason = reason.map(str::to_string);
        let result = self.emergency(&request);
        obs::emit_fallback_decided(None, Strategy::Emergency, request.attempt());
        self.record("fallback.executed", &request, None, Strategy::Emergency);
        result
    }

    fn emergency(&self, request: &FallbackRequest) -> StructuredReviewResult {
        let mut result = execute_emergency(&request.context, request.bypass_reason.as_deref());
        result.metadata.attempt = request.attempt();
        obs::emit_emergency_bypass(
            &request.context.repository,
            result.summary.bypass_reason.as_deref().unwrap_or_default(),
        );
        result
    }

    fn materialize(
        &self,
        strategy: Strategy,
        request: &FallbackRequest,
        kind: Option<FailureKind>,
    ) -> FallbackDecision {
        let attempt = request.attempt();
        let decision = match strategy {
            Strategy::None => FallbackDecision::None,
            Strategy::Retry => execute_retry(attempt, &self.backoff),
            Strategy::Simplified => execute_simplified(
                attempt,
                &self.backoff,
                request.prompt.as_ref(),
                &request.files,
            ),
            Strategy::Degraded => {
                let result =
                    execute_degraded(self.analyzer.as_ref(), &request.files, &request.context);
                obs::emit_degraded_review(result.metadata.files_analyzed, result.issues.len());
                FallbackDecision::Degraded { result }
            }
            Strategy::Manual => FallbackDecision::Manual {
                result: execute_manual(&request.context, &self.config, kind),
            },
            Strategy::Emergency => FallbackDecision::Emergency {
                result: self.emergency(request),
            },
        };
        decision.stamp(attempt, kind)
    }

    fn record(
        &self,
        event: &str,
        request: &FallbackRequest,
        kind: Option<FailureKind>,
        strategy: Strategy,
    ) {
        let mut audit = AuditEvent::new(event, &request.context, kind, strategy, request.attempt());
        if !request.error.message.is_empty() {
            audit = audit.with_detail(request.error.message.clone());
        }
        self.audit.record(audit);
    }
}
