//! Weighting of the three assessment axes in the global score.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const SUM_TOLERANCE: f64 = 1e-9;

/// Relative weight of each assessment axis. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DecisionWeights {
    pub profile: f64,
    pub technical: f64,
    pub soft_skills: f64,
}

/// Production weighting: technical fit counts most.
pub const DEFAULT_WEIGHTS: DecisionWeights = DecisionWeights {
    profile: 0.3,
    technical: 0.4,
    soft_skills: 0.3,
};

impl DecisionWeights {
    pub fn new(profile: f64, technical: f64, soft_skills: f64) -> Result<Self, ConfigError> {
        let weights = Self {
            profile,
            technical,
            soft_skills,
        };
        let sum = weights.sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(ConfigError::WeightsNotNormalized(sum));
        }
        Ok(weights)
    }

    pub fn sum(&self) -> f64 {
        self.profile + self.technical + self.soft_skills
    }
}

impl Default for DecisionWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_are_normalized() {
        assert!((DEFAULT_WEIGHTS.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn custom_weights_must_sum_to_one() {
        assert!(DecisionWeights::new(0.5, 0.25, 0.25).is_ok());

        let err = DecisionWeights::new(0.5, 0.5, 0.5).unwrap_err();
        assert!(err.to_string().contains("1.5"));
    }
}
