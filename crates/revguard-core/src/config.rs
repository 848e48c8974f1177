//! Fallback configuration.
//!
//! Read from the `[fallbacks]` table of a TOML file, validated once, then
//! shared read-only (usually behind an `Arc`) for the engine's lifetime.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Result, RevguardError, Strategy};

/// Recovery settings consumed by the selector and executors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Master switch; when off every decision is `Strategy::None`.
    pub enabled: bool,

    /// Attempt number at which recovery escalates to manual review.
    pub max_attempts: u32,

    /// Strategies the selector may choose, in escalation order.
    pub strategies: Vec<Strategy>,

    /// Branches that get the stricter manual-review wording.
    pub production_branches: Vec<String>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            strategies: vec![Strategy::Retry, Strategy::Simplified, Strategy::Manual],
            production_branches: vec![
                "main".to_string(),
                "master".to_string(),
                "production".to_string(),
            ],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    fallbacks: FallbackConfig,
}

impl FallbackConfig {
    /// Configuration with recovery switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Parse a TOML document and validate its `[fallbacks]` table.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(input)?;
        file.fallbacks.validate()?;
        Ok(file.fallbacks)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(
            path = %path.display(),
            enabled = config.enabled,
            max_attempts = config.max_attempts,
            "loaded fallback config"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(RevguardError::Config(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.strategies.contains(&Strategy::None) {
            return Err(RevguardError::Config(
                "`none` is not a selectable strategy; set enabled = false instead".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the selector may pick `strategy`. Manual review is always allowed.
    pub fn allows(&self, strategy: Strategy) -> bool {
        strategy == Strategy::Manual || self.strategies.contains(&strategy)
    }

    pub fn is_production_branch(&self, branch: &str) -> bool {
        self.production_branches.iter().any(|b| b == branch)
    }
}
