use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::genome::GeneBounds;

/// Upper limit on offspring per generation, relative to the population size.
pub const MAX_OFFSPRING_FACTOR: usize = 10;

/// How the crossover probability is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverGranularity {
    /// Every gene position is crossed independently with the crossover probability.
    #[default]
    PerGene,
    /// The pair is crossed with the crossover probability, then each position
    /// with probability one half.
    PerMating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossoverConfig {
    pub prob: f64,
    pub eta: f64,
    pub granularity: CrossoverGranularity,
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self {
            prob: 0.9,
            eta: 15.0,
            granularity: CrossoverGranularity::PerGene,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    pub eta: f64,
    /// Per-gene mutation probability, `1 / n_var` when unset.
    pub prob: Option<f64>,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            eta: 20.0,
            prob: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nsga2Config {
    pub pop_size: usize,
    pub n_offsprings: usize,
    pub n_generations: usize,
    pub n_obj: usize,
    pub bounds: GeneBounds,
    pub crossover: CrossoverConfig,
    pub mutation: MutationConfig,
    pub seed: u64,
    /// Candidate genomes produced per requested individual before giving up
    /// on filling a batch with unique genomes.
    pub duplicate_cap_factor: usize,
}

impl Default for Nsga2Config {
    fn default() -> Self {
        Self {
            pop_size: 200,
            n_offsprings: 20,
            n_generations: 250,
            n_obj: 2,
            bounds: GeneBounds::default(),
            crossover: CrossoverConfig::default(),
            mutation: MutationConfig::default(),
            seed: 19522298,
            duplicate_cap_factor: 10,
        }
    }
}

impl Nsga2Config {
    pub fn n_var(&self) -> usize {
        self.bounds.n_var()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pop_size == 0 {
            return Err(ConfigError::PopulationSize);
        }

        let max_offsprings = self.pop_size.saturating_mul(MAX_OFFSPRING_FACTOR);
        if self.n_offsprings == 0 || self.n_offsprings > max_offsprings {
            return Err(ConfigError::OffspringCount {
                count: self.n_offsprings,
                max: max_offsprings,
            });
        }

        if self.n_generations == 0 {
            return Err(ConfigError::Generations);
        }

        if self.n_obj == 0 {
            return Err(ConfigError::Objectives);
        }

        self.bounds.validate()?;

        check_probability("crossover", self.crossover.prob)?;
        check_eta("crossover", self.crossover.eta)?;
        check_eta("mutation", self.mutation.eta)?;
        if let Some(prob) = self.mutation.prob {
            check_probability("mutation", prob)?;
        }

        if self.duplicate_cap_factor == 0 {
            return Err(ConfigError::DuplicateCap);
        }

        let cardinality = self.bounds.cardinality();
        if cardinality < self.pop_size as u128 {
            return Err(ConfigError::SearchSpaceTooSmall {
                cardinality,
                pop_size: self.pop_size,
            });
        }

        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}

fn check_eta(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDistributionIndex { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = Nsga2Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.n_var(), 6);
    }

    #[test]
    fn test_rejects_non_positive_counts() {
        let config = Nsga2Config {
            pop_size: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::PopulationSize));

        let config = Nsga2Config {
            n_generations: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Generations));

        let config = Nsga2Config {
            n_offsprings: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OffspringCount { count: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_excessive_offspring() {
        let config = Nsga2Config {
            pop_size: 4,
            n_offsprings: 41,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::OffspringCount { count: 41, max: 40 })
        );
    }

    #[test]
    fn test_rejects_bad_operator_parameters() {
        let mut config = Nsga2Config::default();
        config.crossover.prob = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability { name: "crossover", .. })
        ));

        let mut config = Nsga2Config::default();
        config.mutation.eta = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDistributionIndex { name: "mutation", .. })
        ));

        let mut config = Nsga2Config::default();
        config.mutation.prob = Some(-0.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_small_search_space() {
        let config = Nsga2Config {
            pop_size: 10,
            n_offsprings: 2,
            bounds: GeneBounds::uniform(3, 0, 1).unwrap(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::SearchSpaceTooSmall {
                cardinality: 8,
                pop_size: 10
            })
        );
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let config: Nsga2Config = toml::from_str(
            r#"
            pop_size = 50
            seed = 7

            [crossover]
            granularity = "per_mating"

            [bounds]
            lower = [0, 0, 0]
            upper = [4, 4, 4]
            "#,
        )
        .unwrap();

        assert_eq!(config.pop_size, 50);
        assert_eq!(config.seed, 7);
        assert_eq!(config.n_offsprings, 20);
        assert_eq!(config.crossover.granularity, CrossoverGranularity::PerMating);
        assert_eq!(config.crossover.eta, 15.0);
        assert_eq!(config.n_var(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_negative_bounds_rejected() {
        let config: Nsga2Config = toml::from_str(
            r#"
            [bounds]
            lower = [-1, 0, 0]
            upper = [4, 4, 4]
            "#,
        )
        .unwrap();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBounds(_))
        ));
    }
}
