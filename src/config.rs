//! Solver configuration, loadable from YAML.
//!
//! Every field has a default, so an empty document is a valid config:
//!
//! ```yaml
//! deal_size: 17
//! node_budget: 100000      # null for an exhaustive search
//! score_ceiling: null
//! wild_resolution: candidates   # or brute_force
//! strategy: expected_value      # win_probability | points
//! table_path: data/win_probability.csv
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, TableError};
use crate::probability::{ScoringStrategy, WinProbabilityModel};
use crate::search::SearchLimits;

pub const DEFAULT_DEAL_SIZE: usize = 17;
pub const DEFAULT_NODE_BUDGET: u64 = 100_000;

/// How wild slots are turned into concrete cards.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WildResolution {
    /// Filtered candidate faces.
    #[default]
    Candidates,
    /// Every face (52, or 1326 pairs).
    BruteForce,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Cards per deal, wild slots included.
    #[serde(default = "default_deal_size")]
    pub deal_size: usize,
    /// Explored-node ceiling per search.
    #[serde(default = "default_node_budget")]
    pub node_budget: Option<u64>,
    /// Stop a search once a legal arrangement reaches this score.
    #[serde(default)]
    pub score_ceiling: Option<f64>,
    #[serde(default)]
    pub wild_resolution: WildResolution,
    #[serde(default)]
    pub strategy: ScoringStrategy,
    /// Probability table; category defaults are used when absent.
    #[serde(default)]
    pub table_path: Option<PathBuf>,
}

fn default_deal_size() -> usize {
    DEFAULT_DEAL_SIZE
}

fn default_node_budget() -> Option<u64> {
    Some(DEFAULT_NODE_BUDGET)
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            deal_size: DEFAULT_DEAL_SIZE,
            node_budget: Some(DEFAULT_NODE_BUDGET),
            score_ceiling: None,
            wild_resolution: WildResolution::default(),
            strategy: ScoringStrategy::default(),
            table_path: None,
        }
    }
}

impl SolverConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // smallest legal arrangement is 5 + 5 + 3
        if !(13..=crate::detector::MAX_CARDS).contains(&self.deal_size) {
            return Err(ConfigError::Invalid(format!(
                "deal_size must be in 13..={}, got {}",
                crate::detector::MAX_CARDS,
                self.deal_size
            )));
        }
        if self.node_budget == Some(0) {
            return Err(ConfigError::Invalid("node_budget must be > 0".into()));
        }
        if let Some(c) = self.score_ceiling {
            if !c.is_finite() || c <= 0.0 {
                return Err(ConfigError::Invalid(format!("score_ceiling must be positive, got {c}")));
            }
        }
        Ok(())
    }

    pub fn limits(&self) -> SearchLimits {
        SearchLimits { node_budget: self.node_budget, score_ceiling: self.score_ceiling }
    }

    /// Build the probability model this config names.
    pub fn load_model(&self) -> Result<WinProbabilityModel, TableError> {
        match &self.table_path {
            Some(path) => WinProbabilityModel::load(path, self.strategy),
            None => Ok(WinProbabilityModel::fallback_only(self.strategy)),
        }
    }
}
