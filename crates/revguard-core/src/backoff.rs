//! Deterministic exponential backoff with a ceiling. No jitter.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const BASE_DELAY_MS: u64 = 1_000;
pub const MAX_DELAY_MS: u64 = 10_000;

/// Backoff parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backoff {
    pub base_ms: u64,
    pub cap_ms: u64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base_ms: BASE_DELAY_MS,
            cap_ms: MAX_DELAY_MS,
        }
    }
}

impl Backoff {
    /// `min(base * 2^(attempt-1), cap)`; attempt `0` is treated as `1`.
    pub fn delay_ms(&self, attempt: u32) -> u64 {
        let exp = attempt.max(1) - 1;
        let factor = 1u64.checked_shl(exp).unwrap_or(u64::MAX);
        self.base_ms.saturating_mul(factor).min(self.cap_ms)
    }

    pub fn delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.delay_ms(attempt))
    }
}

/// Delay before re-invoking the primary path, using the default parameters.
pub fn delay_ms(attempt: u32) -> u64 {
    Backoff::default().delay_ms(attempt)
}
