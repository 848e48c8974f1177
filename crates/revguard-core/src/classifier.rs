//! Upstream failure classification.
//!
//! Maps an [`UpstreamError`] to exactly one [`FailureKind`]. Rules are checked
//! in a fixed priority order and the first match wins, so a message mentioning
//! both "timeout" and "network" is a timeout.

use crate::domain::{FailureKind, UpstreamError};

/// Classify an upstream failure into the recovery taxonomy.
pub fn classify(error: &UpstreamError) -> FailureKind {
    let name = error.name.to_lowercase();
    let text = format!("{} {}", name, error.message.to_lowercase());

    if name == "timeouterror" || text.contains("timeout") {
        return FailureKind::Timeout;
    }
    if text.contains("rate limit") {
        return FailureKind::RateLimit;
    }
    if text.contains("authentication") || text.contains("unauthorized") {
        return FailureKind::Authentication;
    }
    if name == "parseerror" || text.contains("malformed") {
        return FailureKind::MalformedResponse;
    }
    if text.contains("network") || text.contains("connection") {
        return FailureKind::Network;
    }
    if text.contains("token limit") || text.contains("context length") {
        return FailureKind::TokenLimit;
    }

    FailureKind::Unknown
}
