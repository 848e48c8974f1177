//! Domain-level error taxonomy for revguard.

use super::failure::UpstreamError;

/// Revguard errors.
///
/// The orchestrator itself never returns these; they come from configuration
/// loading and from callers driving the review loop.
#[derive(Debug, thiserror::Error)]
pub enum RevguardError {
    #[error("invalid fallback config: {0}")]
    Config(String),

    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("upstream review failed without recovery: {0}")]
    Upstream(UpstreamError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for revguard operations.
pub type Result<T> = std::result::Result<T, RevguardError>;
