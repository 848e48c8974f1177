//! Strategy selection.
//!
//! A pure function of `(FailureKind, attempt, config)`. Every failure kind has
//! a bounded number of non-terminal attempts before it lands on a terminal,
//! human-auditable strategy.

use crate::config::FallbackConfig;
use crate::domain::{FailureKind, Strategy};

/// Order in which a disallowed strategy escalates.
const ESCALATION: [Strategy; 4] = [
    Strategy::Retry,
    Strategy::Simplified,
    Strategy::Degraded,
    Strategy::Manual,
];

/// Table choice before the allow-list is applied.
fn table_strategy(kind: FailureKind, attempt: u32) -> Strategy {
    match kind {
        FailureKind::Timeout if attempt <= 1 => Strategy::Retry,
        FailureKind::Timeout => Strategy::Simplified,
        FailureKind::RateLimit => Strategy::Retry,
        FailureKind::Authentication => Strategy::Manual,
        FailureKind::MalformedResponse => Strategy::Simplified,
        FailureKind::Network if attempt <= 1 => Strategy::Retry,
        FailureKind::Network => Strategy::Manual,
        FailureKind::TokenLimit => Strategy::Simplified,
        FailureKind::Unknown => Strategy::Manual,
    }
}

/// Pick the recovery strategy for a failed attempt.
///
/// Attempt numbers are 1-based; `0` is treated as the first attempt.
pub fn select_strategy(kind: FailureKind, attempt: u32, config: &FallbackConfig) -> Strategy {
    if !config.enabled {
        return Strategy::None;
    }
    let attempt = attempt.max(1);
    if attempt >= config.max_attempts {
        return Strategy::Manual;
    }

    let chosen = table_strategy(kind, attempt);
    if config.allows(chosen) {
        return chosen;
    }

    let start = ESCALATION
        .iter()
        .position(|s| *s == chosen)
        .unwrap_or(ESCALATION.len() - 1);
    ESCALATION[start..]
        .iter()
        .copied()
        .find(|s| config.allows(*s))
        .unwrap_or(Strategy::Manual)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> FallbackConfig {
        FallbackConfig::default()
    }

    #[test]
    fn disabled_short_circuits() {
        let config = FallbackConfig::disabled();
        for kind in FailureKind::ALL {
            assert_eq!(select_strategy(kind, 1, &config), Strategy::None);
            assert_eq!(select_strategy(kind, 10, &config), Strategy::None);
        }
    }

    #[test]
    fn exhaustion_always_escalates_to_manual() {
        let config = defaults();
        for kind in FailureKind::ALL {
            for attempt in config.max_attempts..config.max_attempts + 5 {
                assert_eq!(
                    select_strategy(kind, attempt, &config),
                    Strategy::Manual,
                    "{kind} at attempt {attempt}"
                );
            }
        }
    }

    #[test]
    fn dispatch_table_below_ceiling() {
        let config = defaults();
        assert_eq!(select_strategy(FailureKind::Timeout, 1, &config), Strategy::Retry);
        assert_eq!(
            select_strategy(FailureKind::Timeout, 2, &config),
            Strategy::Simplified
        );
        assert_eq!(select_strategy(FailureKind::RateLimit, 1, &config), Strategy::Retry);
        assert_eq!(select_strategy(FailureKind::RateLimit, 2, &config), Strategy::Retry);
        assert_eq!(
            select_strategy(FailureKind::Authentication, 1, &config),
            Strategy::Manual
        );
        assert_eq!(
            select_strategy(FailureKind::MalformedResponse, 1, &config),
            Strategy::Simplified
        );
        assert_eq!(select_strategy(FailureKind::Network, 1, &config), Strategy::Retry);
        assert_eq!(select_strategy(FailureKind::Network, 2, &config), Strategy::Manual);
        assert_eq!(
            select_strategy(FailureKind::TokenLimit, 1, &config),
            Strategy::Simplified
        );
        assert_eq!(select_strategy(FailureKind::Unknown, 1, &config), Strategy::Manual);
    }

    #[test]
    fn attempt_zero_counts_as_first() {
        let config = defaults();
        assert_eq!(select_strategy(FailureKind::Timeout, 0, &config), Strategy::Retry);
    }

    #[test]
    fn single_attempt_budget_goes_straight_to_manual() {
        let config = FallbackConfig {
            max_attempts: 1,
            ..defaults()
        };
        assert_eq!(select_strategy(FailureKind::RateLimit, 1, &config), Strategy::Manual);
    }

    #[test]
    fn disallowed_strategy_escalates_to_next_allowed() {
        let config = FallbackConfig {
            strategies: vec![Strategy::Degraded],
            ..defaults()
        };
        assert_eq!(
            select_strategy(FailureKind::Timeout, 1, &config),
            Strategy::Degraded
        );
        assert_eq!(
            select_strategy(FailureKind::TokenLimit, 1, &config),
            Strategy::Degraded
        );

        let manual_only = FallbackConfig {
            strategies: Vec::new(),
            ..defaults()
        };
        assert_eq!(
            select_strategy(FailureKind::RateLimit, 1, &manual_only),
            Strategy::Manual
        );
    }

    #[test]
    fn retry_disallowed_falls_to_simplified() {
        let config = FallbackConfig {
            strategies: vec![Strategy::Simplified, Strategy::Manual],
            ..defaults()
        };
        assert_eq!(
            select_strategy(FailureKind::RateLimit, 1, &config),
            Strategy::Simplified
        );
    }
}
