use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::CoachError;
use crate::scoring::RewardWeights;

const DEFAULT_SEARCH_CONFIG_YAML: &str = include_str!("../config/search.default.yaml");

/// Search configuration for lane-coach MCTS runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Outer-loop iteration budget.
    pub iterations: usize,
    /// UCB1 exploration constant.
    pub exploration: f64,
    /// Rollout horizon in 20-second steps.
    pub rollout_depth: usize,
    /// Seed for the search's draw stream.
    pub seed: u64,
    /// Optional wall-clock deadline; the search returns best-so-far when
    /// it expires.
    pub time_budget_ms: Option<u64>,
    pub reward: RewardWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            iterations: 1000,
            exploration: 1.41,
            rollout_depth: 6,
            seed: 0,
            time_budget_ms: None,
            reward: RewardWeights::default(),
        }
    }
}

impl SearchConfig {
    /// Parse a search config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CoachError> {
        let config: SearchConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a search config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, CoachError> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_SEARCH_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, CoachError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    pub fn validate(&self) -> Result<(), CoachError> {
        if self.iterations == 0 {
            return Err(CoachError::InvalidConfig(
                "iterations must be greater than 0".to_string(),
            ));
        }
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(CoachError::InvalidConfig(
                "exploration must be finite and >= 0".to_string(),
            ));
        }
        if self.rollout_depth == 0 {
            return Err(CoachError::InvalidConfig(
                "rollout_depth must be greater than 0".to_string(),
            ));
        }
        if let Some(0) = self.time_budget_ms {
            return Err(CoachError::InvalidConfig(
                "time_budget_ms must be greater than 0 when set".to_string(),
            ));
        }
        self.reward.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_yaml_parses_and_matches_defaults() {
        let from_yaml = SearchConfig::from_default_yaml().unwrap();
        let defaults = SearchConfig::default();
        assert_eq!(from_yaml.iterations, defaults.iterations);
        assert_eq!(from_yaml.exploration, defaults.exploration);
        assert_eq!(from_yaml.rollout_depth, defaults.rollout_depth);
        assert_eq!(from_yaml.reward, defaults.reward);
    }

    #[test]
    fn zero_iterations_is_rejected() {
        let err = SearchConfig::from_yaml_str("iterations: 0").unwrap_err();
        assert!(matches!(err, CoachError::InvalidConfig(_)));
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let config = SearchConfig::from_yaml_str("iterations: 64").unwrap();
        assert_eq!(config.iterations, 64);
        assert_eq!(config.rollout_depth, SearchConfig::default().rollout_depth);
    }

    #[test]
    fn non_finite_reward_weight_is_rejected() {
        let err = SearchConfig::from_yaml_str("reward:\n  gold: .nan").unwrap_err();
        assert!(matches!(err, CoachError::InvalidConfig(_)));
    }
}
