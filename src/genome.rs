//! Integer encoding of candidate architectures.
//!
//! A genome is a fixed-length vector of integers, one per architecture
//! decision (for a cell-based search space: the operation chosen on each
//! edge). Every position is bounded by an inclusive `[lo, hi]` range.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Genome(Vec<i64>);

impl Genome {
    pub fn new(genes: Vec<i64>) -> Self {
        Self(genes)
    }

    pub fn genes(&self) -> &[i64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<i64>> for Genome {
    fn from(genes: Vec<i64>) -> Self {
        Self(genes)
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for gene in &self.0 {
            if !first {
                write!(f, "-")?;
            }
            write!(f, "{}", gene)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for Genome {
    type Err = std::num::ParseIntError;

    /// Parses the `g0-g1-...` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .split('-')
            .map(|gene| gene.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map(Genome)
    }
}

/// Inclusive per-gene bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneBounds {
    lower: Vec<i64>,
    upper: Vec<i64>,
}

impl GeneBounds {
    pub fn new(lower: Vec<i64>, upper: Vec<i64>) -> Result<Self, ConfigError> {
        let bounds = Self { lower, upper };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Same `[lo, hi]` range for all `n_var` genes.
    pub fn uniform(n_var: usize, lo: i64, hi: i64) -> Result<Self, ConfigError> {
        Self::new(vec![lo; n_var], vec![hi; n_var])
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lower.is_empty() {
            return Err(ConfigError::InvalidBounds(
                "genome must have at least one gene".to_string(),
            ));
        }

        if self.lower.len() != self.upper.len() {
            return Err(ConfigError::InvalidBounds(format!(
                "{} lower bounds but {} upper bounds",
                self.lower.len(),
                self.upper.len()
            )));
        }

        for (i, (lo, hi)) in self.lower.iter().zip(self.upper.iter()).enumerate() {
            // genes are operation indices and `-` separates them in the text form
            if *lo < 0 {
                return Err(ConfigError::InvalidBounds(format!(
                    "gene {} has negative lower bound {}",
                    i, lo
                )));
            }
            if lo >= hi {
                return Err(ConfigError::InvalidBounds(format!(
                    "gene {} has lo ({}) >= hi ({})",
                    i, lo, hi
                )));
            }
        }

        Ok(())
    }

    pub fn n_var(&self) -> usize {
        self.lower.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.lower.iter().copied().zip(self.upper.iter().copied())
    }

    pub fn contains(&self, genome: &Genome) -> bool {
        genome.len() == self.n_var()
            && genome
                .genes()
                .iter()
                .zip(self.iter())
                .all(|(&g, (lo, hi))| g >= lo && g <= hi)
    }

    /// Number of distinct genomes inside the bounds, saturating at `u128::MAX`.
    pub fn cardinality(&self) -> u128 {
        self.iter().fold(1u128, |acc, (lo, hi)| {
            let width = (i128::from(hi) - i128::from(lo) + 1).max(0) as u128;
            acc.saturating_mul(width)
        })
    }

    /// Draws every gene uniformly from its range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Genome {
        Genome(self.iter().map(|(lo, hi)| rng.gen_range(lo..=hi)).collect())
    }
}

impl Default for GeneBounds {
    /// Six operation slots, five candidate operations each.
    fn default() -> Self {
        Self {
            lower: vec![0; 6],
            upper: vec![4; 6],
        }
    }
}
