//! Upstream failures and their coarse taxonomy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A failure raised by the AI completion caller.
///
/// Only `name` and `message` are inspected; stack traces and transport
/// details never reach the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{name}: {message}")]
pub struct UpstreamError {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
}

impl UpstreamError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// An error with the generic `Error` name.
    pub fn from_message(message: impl Into<String>) -> Self {
        Self::new("Error", message)
    }
}

/// Failure taxonomy surfaced by the classifier. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    RateLimit,
    Authentication,
    MalformedResponse,
    Network,
    TokenLimit,
    Unknown,
}

impl FailureKind {
    pub const ALL: [FailureKind; 7] = [
        FailureKind::Timeout,
        FailureKind::RateLimit,
        FailureKind::Authentication,
        FailureKind::MalformedResponse,
        FailureKind::Network,
        FailureKind::TokenLimit,
        FailureKind::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::RateLimit => "rate_limit",
            FailureKind::Authentication => "authentication",
            FailureKind::MalformedResponse => "malformed_response",
            FailureKind::Network => "network",
            FailureKind::TokenLimit => "token_limit",
            FailureKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
