//! Variation operators for integer genomes.
//!
//! Both operators run in the continuous domain over the gene range widened by
//! half a unit on each side, then round to the nearest integer and clamp back
//! into `[lo, hi]`. The widening gives the boundary values the same unit-width
//! share of the continuous interval as interior values.

use rand::Rng;

use crate::config::{CrossoverConfig, CrossoverGranularity, MutationConfig};
use crate::genome::{GeneBounds, Genome};

/// Parent genes closer than this are treated as identical.
const SAME_GENE_EPS: f64 = 1.0e-14;

fn widened(lo: i64, hi: i64) -> (f64, f64) {
    (lo as f64 - 0.5, hi as f64 + 0.5)
}

fn round_and_clamp(value: f64, lo: i64, hi: i64) -> i64 {
    (value.round() as i64).clamp(lo, hi)
}

/// Simulated binary crossover.
#[derive(Debug, Clone)]
pub struct SimulatedBinaryCrossover {
    pub prob: f64,
    pub eta: f64,
    pub granularity: CrossoverGranularity,
}

impl From<&CrossoverConfig> for SimulatedBinaryCrossover {
    fn from(config: &CrossoverConfig) -> Self {
        Self {
            prob: config.prob,
            eta: config.eta,
            granularity: config.granularity,
        }
    }
}

impl SimulatedBinaryCrossover {
    /// Produces two children from two parents of equal length.
    pub fn crossover<R: Rng + ?Sized>(
        &self,
        parent_1: &Genome,
        parent_2: &Genome,
        bounds: &GeneBounds,
        rng: &mut R,
    ) -> (Genome, Genome) {
        debug_assert_eq!(parent_1.len(), bounds.n_var());
        debug_assert_eq!(parent_2.len(), bounds.n_var());

        let mut genes_1 = parent_1.genes().to_vec();
        let mut genes_2 = parent_2.genes().to_vec();

        let gene_prob = match self.granularity {
            CrossoverGranularity::PerGene => self.prob,
            CrossoverGranularity::PerMating => {
                if !rng.gen_bool(self.prob) {
                    return (Genome::new(genes_1), Genome::new(genes_2));
                }
                0.5
            }
        };

        for (i, (lo, hi)) in bounds.iter().enumerate() {
            if !rng.gen_bool(gene_prob) {
                continue;
            }

            let (x1, x2) = (genes_1[i] as f64, genes_2[i] as f64);
            if (x1 - x2).abs() <= SAME_GENE_EPS {
                continue;
            }

            let (xl, xu) = widened(lo, hi);
            let (c1, c2) = sbx_pair(rng, x1, x2, xl, xu, self.eta);

            genes_1[i] = round_and_clamp(c1, lo, hi);
            genes_2[i] = round_and_clamp(c2, lo, hi);
        }

        (Genome::new(genes_1), Genome::new(genes_2))
    }
}

/// Bounded SBX on a single pair of distinct values.
fn sbx_pair<R: Rng + ?Sized>(
    rng: &mut R,
    x1: f64,
    x2: f64,
    xl: f64,
    xu: f64,
    eta: f64,
) -> (f64, f64) {
    let (y1, y2) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    let delta = y2 - y1;
    let u: f64 = rng.gen();
    let exponent = 1.0 / (eta + 1.0);

    let spread = |beta: f64| {
        let alpha = 2.0 - beta.powf(-(eta + 1.0));
        if u <= 1.0 / alpha {
            (u * alpha).powf(exponent)
        } else {
            (1.0 / (2.0 - u * alpha)).powf(exponent)
        }
    };

    let c1 = 0.5 * ((y1 + y2) - spread(1.0 + 2.0 * (y1 - xl) / delta) * delta);
    let c2 = 0.5 * ((y1 + y2) + spread(1.0 + 2.0 * (xu - y2) / delta) * delta);

    let (c1, c2) = if rng.gen_bool(0.5) { (c2, c1) } else { (c1, c2) };

    (c1.clamp(xl, xu), c2.clamp(xl, xu))
}

/// Polynomial mutation.
#[derive(Debug, Clone)]
pub struct PolynomialMutation {
    pub eta: f64,
    /// Per-gene mutation probability.
    pub prob: f64,
}

impl PolynomialMutation {
    pub fn from_config(config: &MutationConfig, n_var: usize) -> Self {
        Self {
            eta: config.eta,
            prob: config.prob.unwrap_or_else(|| 1.0 / n_var.max(1) as f64),
        }
    }

    /// Returns a mutated copy of `genome`.
    pub fn mutate<R: Rng + ?Sized>(
        &self,
        genome: &Genome,
        bounds: &GeneBounds,
        rng: &mut R,
    ) -> Genome {
        debug_assert_eq!(genome.len(), bounds.n_var());

        let genes = genome
            .genes()
            .iter()
            .zip(bounds.iter())
            .map(|(&gene, (lo, hi))| {
                if !rng.gen_bool(self.prob) {
                    return gene;
                }

                let (xl, xu) = widened(lo, hi);
                let mutated = polynomial_perturbation(rng, gene as f64, xl, xu, self.eta);
                round_and_clamp(mutated, lo, hi)
            })
            .collect();

        Genome::new(genes)
    }
}

fn polynomial_perturbation<R: Rng + ?Sized>(
    rng: &mut R,
    x: f64,
    xl: f64,
    xu: f64,
    eta: f64,
) -> f64 {
    let range = xu - xl;
    let delta_1 = (x - xl) / range;
    let delta_2 = (xu - x) / range;
    let exponent = 1.0 / (eta + 1.0);
    let u: f64 = rng.gen();

    let delta_q = if u <= 0.5 {
        let xy = 1.0 - delta_1;
        let val = 2.0 * u + (1.0 - 2.0 * u) * xy.powf(eta + 1.0);
        val.powf(exponent) - 1.0
    } else {
        let xy = 1.0 - delta_2;
        let val = 2.0 * (1.0 - u) + 2.0 * (u - 0.5) * xy.powf(eta + 1.0);
        1.0 - val.powf(exponent)
    };

    (x + delta_q * range).clamp(xl, xu)
}
