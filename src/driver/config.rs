//! Solver configuration.
//!
//! [`SolverConfig`] holds everything the generational loop needs that is
//! not specific to one strategy.

use serde::{Deserialize, Serialize};

use crate::cost::CostConfig;
use crate::error::ConfigError;
use crate::repair::RepairConfig;

/// Smallest population the loop accepts.
pub const MIN_POPULATION: usize = 2;

/// Configuration for a solver run.
///
/// # Defaults
///
/// ```
/// use u_timetable::driver::SolverConfig;
///
/// let config = SolverConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 1000);
/// assert_eq!(config.elite_count, 5);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_timetable::driver::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_population_size(40)
///     .with_max_generations(200)
///     .with_seed(7)
///     .with_parallel(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Number of candidates per generation.
    pub population_size: usize,

    /// Number of generations; the loop always runs all of them unless
    /// cancelled.
    pub max_generations: usize,

    /// Best candidates carried unchanged into the next generation.
    ///
    /// They overwrite the worst `elite_count` candidates after evaluation,
    /// which makes the best cost non-increasing.
    pub elite_count: usize,

    /// Usage at which a place stops being drawn while alternatives remain.
    /// Also the absolute threshold of the overuse cost term.
    pub place_usage_cap: usize,

    /// Whether per-candidate work runs on rayon. Results do not depend on
    /// this flag.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed, reported back in the result.
    pub seed: Option<u64>,

    pub cost: CostConfig,

    pub repair: RepairConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 1000,
            elite_count: 5,
            place_usage_cap: 5,
            parallel: true,
            seed: None,
            cost: CostConfig::default(),
            repair: RepairConfig::default(),
        }
    }
}

impl SolverConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_elite_count(mut self, n: usize) -> Self {
        self.elite_count = n;
        self
    }

    pub fn with_place_usage_cap(mut self, cap: usize) -> Self {
        self.place_usage_cap = cap;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_cost(mut self, cost: CostConfig) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_repair(mut self, repair: RepairConfig) -> Self {
        self.repair = repair;
        self
    }

    /// Preset for quick experiments: 30 candidates, 100 generations.
    pub fn fast() -> Self {
        Self {
            population_size: 30,
            max_generations: 100,
            elite_count: 2,
            ..Self::default()
        }
    }

    /// Validates the configuration, including the nested cost and repair
    /// settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < MIN_POPULATION {
            return Err(ConfigError::PopulationTooSmall {
                min: MIN_POPULATION,
                got: self.population_size,
            });
        }
        if self.max_generations == 0 {
            return Err(ConfigError::ZeroGenerations);
        }
        if self.elite_count >= self.population_size {
            return Err(ConfigError::TooManyElites {
                elite: self.elite_count,
                population: self.population_size,
            });
        }
        if self.place_usage_cap == 0 {
            return Err(ConfigError::ZeroUsageCap);
        }
        self.cost.weights.validate()?;
        self.repair.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{CostWeights, ViolationCategory};

    #[test]
    fn test_default_is_valid() {
        assert!(SolverConfig::default().validate().is_ok());
        assert!(SolverConfig::fast().validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            SolverConfig::default().with_population_size(1).validate(),
            Err(ConfigError::PopulationTooSmall { min: 2, got: 1 })
        );
        assert_eq!(
            SolverConfig::default().with_max_generations(0).validate(),
            Err(ConfigError::ZeroGenerations)
        );
        assert_eq!(
            SolverConfig::default()
                .with_population_size(5)
                .with_elite_count(5)
                .validate(),
            Err(ConfigError::TooManyElites {
                elite: 5,
                population: 5
            })
        );
        assert_eq!(
            SolverConfig::default().with_place_usage_cap(0).validate(),
            Err(ConfigError::ZeroUsageCap)
        );
    }

    #[test]
    fn test_nested_validation() {
        let weights = CostWeights::default().with(ViolationCategory::Capacity, -3.0);
        let config = SolverConfig::default().with_cost(CostConfig::default().with_weights(weights));
        assert!(matches!(config.validate(), Err(ConfigError::Negative { .. })));
    }

    #[test]
    fn test_json_round_trip() {
        let config = SolverConfig::default().with_seed(11).with_elite_count(3);
        let json = serde_json::to_string(&config).unwrap();
        let back: SolverConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);

        let partial: SolverConfig = serde_json::from_str(r#"{"population_size": 20}"#).unwrap();
        assert_eq!(partial.population_size, 20);
        assert_eq!(partial.max_generations, 1000);
    }
}
