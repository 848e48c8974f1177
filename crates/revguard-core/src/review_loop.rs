//! Caller-side review loop.
//!
//! The engine never sleeps; this driver does. It calls the AI completion
//! seam, hands failures to the [`FallbackOrchestrator`], waits out retry
//! delays and swaps in simplified prompts until it holds a review result.

use std::time::Duration;

use async_trait::async_trait;
use tracing::Instrument;

use crate::domain::{
    Issue, ReviewContext, ReviewFile, Result, RevguardError, StructuredReviewResult,
    UpstreamError,
};
use crate::executors::FallbackDecision;
use crate::obs;
use crate::orchestrator::{FallbackOrchestrator, FallbackRequest};
use crate::prompt::ReviewPrompt;

/// AI completion seam: a prompt in, review issues or a classified error out.
#[async_trait]
pub trait ReviewCompleter: Send + Sync {
    async fn complete(&self, prompt: &ReviewPrompt) -> std::result::Result<Vec<Issue>, UpstreamError>;
}

/// One pull request to review.
#[derive(Debug, Clone)]
pub struct ReviewJob {
    pub context: ReviewContext,
    pub prompt: ReviewPrompt,
    pub files: Vec<ReviewFile>,
}

/// Review `job`, recovering from upstream failures.
///
/// Returns the AI review, or the terminal fallback result. Fails only when
/// recovery is disabled, with the last upstream error.
pub async fn review_with_fallback(
    completer: &dyn ReviewCompleter,
    orchestrator: &FallbackOrchestrator,
    job: ReviewJob,
) -> Result<StructuredReviewResult> {
    let span = obs::review_span(&job.context.repository, &job.context.commit_sha);
    drive(completer, orchestrator, job).instrument(span).await
}

async fn drive(
    completer: &dyn ReviewCompleter,
    orchestrator: &FallbackOrchestrator,
    job: ReviewJob,
) -> Result<StructuredReviewResult> {
    let mut request = FallbackRequest::new(UpstreamError::default(), job.context, 1)
        .with_files(job.files)
        .with_prompt(job.prompt.clone());
    let mut prompt = job.prompt;
    let mut attempt = 1u32;

    loop {
        let error = match completer.complete(&prompt).await {
            Ok(issues) => {
                let mut result = StructuredReviewResult::primary(issues, &request.context);
                result.metadata.attempt = attempt;
                result.metadata.files_analyzed = request.files.len();
                return Ok(result);
            }
            Err(error) => error,
        };

        obs::emit_attempt_failed(attempt, &error);
        request.error = error;
        request.attempt = attempt;

        match orchestrator.handle(&request) {
            FallbackDecision::None => return Err(RevguardError::Upstream(request.error)),
            FallbackDecision::Retry { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
            FallbackDecision::Simplified {
                delay_ms,
                prompt: simplified,
            } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                prompt = simplified;
            }
            FallbackDecision::Degraded { result }
            | FallbackDecision::Manual { result }
            | FallbackDecision::Emergency { result } => return Ok(result),
        }

        attempt = attempt.saturating_add(1);
    }
}
