//! Strategy executors.
//!
//! One builder per [`Strategy`]. Non-terminal strategies produce a retry
//! signal for the caller; terminal strategies produce a
//! [`StructuredReviewResult`] with the same shape as an AI review.

use serde::{Deserialize, Serialize};

use crate::analyzer::StaticAnalyzer;
use crate::backoff::Backoff;
use crate::config::FallbackConfig;
use crate::domain::{
    FailureKind, FallbackType, Issue, ReviewContext, ReviewFile, Severity, Strategy,
    StructuredReviewResult,
};
use crate::prompt::ReviewPrompt;

pub const DEFAULT_BYPASS_REASON: &str = "emergency";
pub const CATEGORY_STANDARDS: &str = "Standards";

const EMERGENCY_WARNING: &str =
    "AI review was bypassed; manual review is strongly recommended before release";

/// What the caller should do after a failed review attempt.
///
/// `Retry` re-sends the same request; `Simplified` re-sends with the attached
/// prompt instead. Every other variant is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FallbackDecision {
    /// No recovery; surface the original error.
    None,
    Retry {
        delay_ms: u64,
    },
    Simplified {
        delay_ms: u64,
        prompt: ReviewPrompt,
    },
    Degraded {
        result: StructuredReviewResult,
    },
    Manual {
        result: StructuredReviewResult,
    },
    Emergency {
        result: StructuredReviewResult,
    },
}

impl FallbackDecision {
    pub fn strategy(&self) -> Strategy {
        match self {
            FallbackDecision::None => Strategy::None,
            FallbackDecision::Retry { .. } => Strategy::Retry,
            FallbackDecision::Simplified { .. } => Strategy::Simplified,
            FallbackDecision::Degraded { .. } => Strategy::Degraded,
            FallbackDecision::Manual { .. } => Strategy::Manual,
            FallbackDecision::Emergency { .. } => Strategy::Emergency,
        }
    }

    pub fn should_retry(&self) -> bool {
        matches!(
            self,
            FallbackDecision::Retry { .. } | FallbackDecision::Simplified { .. }
        )
    }

    pub fn delay_ms(&self) -> Option<u64> {
        match self {
            FallbackDecision::Retry { delay_ms } | FallbackDecision::Simplified { delay_ms, .. } => {
                Some(*delay_ms)
            }
            _ => None,
        }
    }

    /// Replacement prompt; present only for `Simplified`.
    pub fn prompt(&self) -> Option<&ReviewPrompt> {
        match self {
            FallbackDecision::Simplified { prompt, .. } => Some(prompt),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&StructuredReviewResult> {
        match self {
            FallbackDecision::Degraded { result }
            | FallbackDecision::Manual { result }
            | FallbackDecision::Emergency { result } => Some(result),
            _ => None,
        }
    }

    pub fn into_result(self) -> Option<StructuredReviewResult> {
        match self {
            FallbackDecision::Degraded { result }
            | FallbackDecision::Manual { result }
            | FallbackDecision::Emergency { result } => Some(result),
            _ => None,
        }
    }

    /// Serializable view that also carries `should_retry`.
    pub fn report(&self) -> DecisionReport<'_> {
        DecisionReport {
            should_retry: self.should_retry(),
            decision: self,
        }
    }

    fn result_mut(&mut self) -> Option<&mut StructuredReviewResult> {
        match self {
            FallbackDecision::Degraded { result }
            | FallbackDecision::Manual { result }
            | FallbackDecision::Emergency { result } => Some(result),
            _ => None,
        }
    }

    /// Record which attempt and failure produced a terminal result.
    pub(crate) fn stamp(mut self, attempt: u32, kind: Option<FailureKind>) -> Self {
        if let Some(result) = self.result_mut() {
            result.metadata.attempt = attempt;
            result.metadata.failure_kind = kind;
        }
        self
    }
}

/// JSON-friendly wrapper around a [`FallbackDecision`].
#[derive(Debug, Serialize)]
pub struct DecisionReport<'a> {
    pub should_retry: bool,
    #[serde(flatten)]
    pub decision: &'a FallbackDecision,
}

/// Retry the same request after the backoff delay.
pub fn execute_retry(attempt: u32, backoff: &Backoff) -> FallbackDecision {
    FallbackDecision::Retry {
        delay_ms: backoff.delay_ms(attempt),
    }
}

/// Retry with a reduced prompt after the backoff delay.
pub fn execute_simplified(
    attempt: u32,
    backoff: &Backoff,
    original: Option<&ReviewPrompt>,
    files: &[ReviewFile],
) -> FallbackDecision {
    FallbackDecision::Simplified {
        delay_ms: backoff.delay_ms(attempt),
        prompt: ReviewPrompt::simplified(original, files),
    }
}

/// Static-analysis substitute review over every supplied file. Files missing
/// a path or content are skipped and not counted as analyzed.
pub fn execute_degraded(
    analyzer: &dyn StaticAnalyzer,
    files: &[ReviewFile],
    context: &ReviewContext,
) -> StructuredReviewResult {
    let issues: Vec<Issue> = files.iter().flat_map(|f| analyzer.analyze(f)).collect();
    let mut result = StructuredReviewResult::new(
        Strategy::Degraded,
        Some(FallbackType::DegradedReview),
        issues,
        context,
    );
    result.metadata.files_analyzed = files
        .iter()
        .filter(|f| f.path.is_some() && f.content.is_some())
        .count();
    result.summary.warning = Some(
        "AI review unavailable; findings come from pattern-based static analysis only".to_string(),
    );
    result
}

fn manual_instructions(config: &FallbackConfig, branch: &str) -> Vec<String> {
    if config.is_production_branch(branch) {
        vec![
            format!("Production branch `{branch}`: require at least two approving reviews before merge"),
            "Review security-sensitive changes (authentication, secrets, input handling) line by line"
                .to_string(),
            "Confirm tests cover every behavior change and CI is green".to_string(),
            "Check for breaking API or schema changes and confirm a rollback plan".to_string(),
        ]
    } else {
        vec![
            "Check readability, naming and function size".to_string(),
            "Confirm new behavior is covered by tests".to_string(),
            "Look for duplicated logic that could be shared".to_string(),
            "Verify error handling on new code paths".to_string(),
        ]
    }
}

/// Placeholder asking for a human reviewer.
pub fn execute_manual(
    context: &ReviewContext,
    config: &FallbackConfig,
    kind: Option<FailureKind>,
) -> StructuredReviewResult {
    let reason = kind.map(|k| k.as_str()).unwrap_or("unknown");
    let issue = Issue::new(
        Severity::Medium,
        CATEGORY_STANDARDS,
        format!("AI review unavailable ({reason}); manual review is required before merge"),
    );
    let mut result = StructuredReviewResult::new(
        Strategy::Manual,
        Some(FallbackType::ManualReview),
        vec![issue],
        context,
    );
    result.metadata.instructions = manual_instructions(config, &context.target_branch);
    result
}

/// Operator-forced bypass: no findings, an explicit warning and the reason.
pub fn execute_emergency(context: &ReviewContext, reason: Option<&str>) -> StructuredReviewResult {
    let reason = reason
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_BYPASS_REASON);
    let mut result = StructuredReviewResult::new(
        Strategy::Emergency,
        Some(FallbackType::EmergencyBypass),
        Vec::new(),
        context,
    );
    result.summary.bypass_reason = Some(reason.to_string());
    result.summary.warning = Some(EMERGENCY_WARNING.to_string());
    result
}
