//! Review inputs and the structured result every review path produces.

use serde::{Deserialize, Serialize};

use super::failure::FailureKind;
use super::strategy::{FallbackType, Strategy};

const UNKNOWN: &str = "unknown";

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// Issue severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// A single review finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub category: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Issue {
    pub fn new(
        severity: Severity,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category: category.into(),
            description: description.into(),
            location: None,
        }
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Pull-request context passed through from the pipeline. Read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewContext {
    #[serde(default = "unknown")]
    pub repository: String,
    #[serde(default = "unknown")]
    pub target_branch: String,
    #[serde(default = "unknown")]
    pub commit_sha: String,
    #[serde(default = "unknown")]
    pub author: String,
    #[serde(default)]
    pub pull_request: Option<u64>,
}

impl Default for ReviewContext {
    fn default() -> Self {
        Self {
            repository: unknown(),
            target_branch: unknown(),
            commit_sha: unknown(),
            author: unknown(),
            pull_request: None,
        }
    }
}

impl ReviewContext {
    pub fn new(repository: impl Into<String>, target_branch: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            target_branch: target_branch.into(),
            ..Self::default()
        }
    }
}

/// A changed file supplied by the caller for degraded review.
///
/// Both fields are optional so partially populated payloads never fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewFile {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ReviewFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            content: Some(content.into()),
        }
    }
}

/// Aggregate view of a review's issues plus fallback annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub total_issues: usize,
    pub critical_issues: usize,
    pub high_issues: usize,
    pub medium_issues: usize,
    pub low_issues: usize,
    pub fallback_used: bool,
    pub fallback_type: Option<FallbackType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bypass_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Provenance of a review result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewMetadata {
    pub strategy: Strategy,
    pub failure_kind: Option<FailureKind>,
    pub attempt: u32,
    pub repository: String,
    pub target_branch: String,
    pub commit_sha: String,
    pub files_analyzed: usize,
    #[serde(default)]
    pub instructions: Vec<String>,
}

/// The review contract shared by the AI path and every fallback path.
///
/// # Invariants
///
/// `summary.fallback_used == (metadata.strategy != Strategy::None)` and the
/// summary counts are derived from `issues` at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredReviewResult {
    pub issues: Vec<Issue>,
    pub summary: ReviewSummary,
    pub metadata: ReviewMetadata,
}

impl StructuredReviewResult {
    pub fn new(
        strategy: Strategy,
        fallback_type: Option<FallbackType>,
        issues: Vec<Issue>,
        context: &ReviewContext,
    ) -> Self {
        let count = |sev: Severity| issues.iter().filter(|i| i.severity == sev).count();
        let summary = ReviewSummary {
            total_issues: issues.len(),
            critical_issues: count(Severity::Critical),
            high_issues: count(Severity::High),
            medium_issues: count(Severity::Medium),
            low_issues: count(Severity::Low),
            fallback_used: strategy != Strategy::None,
            fallback_type,
            bypass_reason: None,
            warning: None,
        };
        let metadata = ReviewMetadata {
            strategy,
            failure_kind: None,
            attempt: 1,
            repository: context.repository.clone(),
            target_branch: context.target_branch.clone(),
            commit_sha: context.commit_sha.clone(),
            files_analyzed: 0,
            instructions: Vec::new(),
        };
        Self {
            issues,
            summary,
            metadata,
        }
    }

    /// Result of a successful AI review.
    pub fn primary(issues: Vec<Issue>, context: &ReviewContext) -> Self {
        Self::new(Strategy::None, None, issues, context)
    }

    pub fn max_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|i| i.severity).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_issues() -> Vec<Issue> {
        vec![
            Issue::new(Severity::High, "Security", "eval usage").at("app.js:3"),
            Issue::new(Severity::Low, "Code Quality", "console.log"),
            Issue::new(Severity::Low, "Code Quality", "console.log"),
        ]
    }

    #[test]
    fn test_summary_counts_follow_issues() {
        let result = StructuredReviewResult::new(
            Strategy::Degraded,
            Some(FallbackType::DegradedReview),
            sample_issues(),
            &ReviewContext::default(),
        );
        assert_eq!(result.summary.total_issues, 3);
        assert_eq!(result.summary.high_issues, 1);
        assert_eq!(result.summary.low_issues, 2);
        assert_eq!(result.summary.critical_issues, 0);
        assert!(result.summary.fallback_used);
        assert_eq!(result.max_severity(), Some(Severity::High));
    }

    #[test]
    fn test_primary_result_is_not_a_fallback() {
        let result = StructuredReviewResult::primary(Vec::new(), &ReviewContext::default());
        assert!(!result.summary.fallback_used);
        assert_eq!(result.summary.fallback_type, None);
        assert!(result.issues.is_empty());
        assert_eq!(result.max_severity(), None);
    }

    #[test]
    fn test_context_fields_default_to_unknown() {
        let ctx: ReviewContext = serde_json::from_str(r#"{"target_branch":"main"}"#).unwrap();
        assert_eq!(ctx.target_branch, "main");
        assert_eq!(ctx.repository, "unknown");
        assert_eq!(ctx.commit_sha, "unknown");
        assert_eq!(ctx.pull_request, None);
    }

    #[test]
    fn test_severity_serializes_uppercase_and_orders() {
        assert_eq!(
            serde_json::to_string(&Severity::Critical).unwrap(),
            "\"CRITICAL\""
        );
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_review_file_tolerates_missing_fields() {
        let file: ReviewFile = serde_json::from_str("{}").unwrap();
        assert_eq!(file, ReviewFile::default());
    }
}
