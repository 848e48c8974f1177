//! Recovery strategies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::RevguardError;

/// Recovery strategy chosen for a failed review attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// No recovery; the caller surfaces the original error.
    None,
    /// Re-invoke the primary path unchanged after a delay.
    Retry,
    /// Re-invoke the primary path with a reduced prompt.
    Simplified,
    /// Substitute a static-analysis review.
    Degraded,
    /// Placeholder requiring a human reviewer.
    Manual,
    /// Operator-forced bypass with an explicit warning.
    Emergency,
}

impl Strategy {
    /// Terminal strategies end the attempt sequence.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Strategy::Retry | Strategy::Simplified)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::None => "none",
            Strategy::Retry => "retry",
            Strategy::Simplified => "simplified",
            Strategy::Degraded => "degraded",
            Strategy::Manual => "manual",
            Strategy::Emergency => "emergency",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = RevguardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Strategy::None),
            "retry" => Ok(Strategy::Retry),
            "simplified" => Ok(Strategy::Simplified),
            "degraded" => Ok(Strategy::Degraded),
            "manual" => Ok(Strategy::Manual),
            "emergency" => Ok(Strategy::Emergency),
            other => Err(RevguardError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Label attached to results produced by a fallback path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackType {
    DegradedReview,
    ManualReview,
    EmergencyBypass,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_partition() {
        assert!(!Strategy::Retry.is_terminal());
        assert!(!Strategy::Simplified.is_terminal());
        for s in [
            Strategy::None,
            Strategy::Degraded,
            Strategy::Manual,
            Strategy::Emergency,
        ] {
            assert!(s.is_terminal(), "{s} should be terminal");
        }
    }

    #[test]
    fn test_parse_round_trips_display() {
        for s in [
            Strategy::None,
            Strategy::Retry,
            Strategy::Simplified,
            Strategy::Degraded,
            Strategy::Manual,
            Strategy::Emergency,
        ] {
            assert_eq!(s.as_str().parse::<Strategy>().unwrap(), s);
        }
        assert_eq!(" Manual ".parse::<Strategy>().unwrap(), Strategy::Manual);
    }

    #[test]
    fn test_parse_unknown_name_fails() {
        let err = "retyr".parse::<Strategy>().unwrap_err();
        assert!(matches!(err, RevguardError::UnknownStrategy(ref n) if n == "retyr"));
    }

    #[test]
    fn test_fallback_type_serde() {
        let json = serde_json::to_string(&FallbackType::EmergencyBypass).unwrap();
        assert_eq!(json, "\"emergency_bypass\"");
    }
}
