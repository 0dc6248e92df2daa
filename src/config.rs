use crate::aggregator::DEFAULT_AVERAGE_DECIMALS;
use crate::error::{RollupError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

const MAX_AVERAGE_DECIMALS: u32 = 10;

/// How ancestors are refreshed after a leaf changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PropagationStrategy {
    #[schemars(
        description = "Recompute every ancestor's months by summing its whole subtree. Simple and self-healing."
    )]
    #[default]
    Resum,

    #[schemars(
        description = "Re-sum only the changed months of each ancestor from its immediate children. O(children x depth) per edit."
    )]
    Delta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RollupConfig {
    #[schemars(description = "Decimal places kept when deriving the average of a flat row")]
    pub average_decimals: u32,

    pub propagation: PropagationStrategy,

    #[schemars(
        description = "Create zero-valued group nodes for path prefixes that have no record of their own instead of rejecting the dataset"
    )]
    pub synthesize_missing_ancestors: bool,
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            average_decimals: DEFAULT_AVERAGE_DECIMALS,
            propagation: PropagationStrategy::Resum,
            synthesize_missing_ancestors: false,
        }
    }
}

impl RollupConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: RollupConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.average_decimals > MAX_AVERAGE_DECIMALS {
            return Err(RollupError::InvalidConfig(format!(
                "average_decimals must be at most {}, got {}",
                MAX_AVERAGE_DECIMALS, self.average_decimals
            )));
        }
        Ok(())
    }

    pub fn with_propagation(mut self, strategy: PropagationStrategy) -> Self {
        self.propagation = strategy;
        self
    }

    pub fn with_synthesized_ancestors(mut self) -> Self {
        self.synthesize_missing_ancestors = true;
        self
    }
}
