//! Synthetic benchmark tables for demos and tests.

use itertools::Itertools;
use rand::prelude::*;
use rand_distr::StandardNormal;

use crate::benchmark::BenchmarkRecord;
use crate::error::BenchmarkError;
use crate::genome::{GeneBounds, Genome};

/// Largest space `synthetic_benchmark` will enumerate.
pub const MAX_SYNTHETIC_ARCHITECTURES: u128 = 1_000_000;

// none, skip_connect, conv_1x1, conv_3x3, avg_pool_3x3
const OPERATION_MFLOPS: [f64; 5] = [0.0, 0.0, 12.6, 37.6, 1.2];
const BASE_MFLOPS: f64 = 7.8;
const NOISE_STD: f64 = 0.8;

fn operation(gene: i64) -> usize {
    gene.rem_euclid(OPERATION_MFLOPS.len() as i64) as usize
}

pub fn flops(genome: &Genome) -> f64 {
    BASE_MFLOPS
        + genome
            .genes()
            .iter()
            .map(|&g| OPERATION_MFLOPS[operation(g)])
            .sum::<f64>()
}

fn expected_error(genome: &Genome) -> f64 {
    // a cell made only of "none" edges cannot learn anything
    if genome.genes().iter().all(|&g| operation(g) == 0) {
        return 90.0;
    }

    let capacity = flops(genome) - BASE_MFLOPS;
    let pooling = genome.genes().iter().filter(|&&g| operation(g) == 4).count() as f64;
    6.0 + 50.0 * (-capacity / 40.0).exp() + 0.5 * pooling
}

/// Scores every architecture inside `bounds`. Errors are noisy but
/// reproducible for a given `seed`.
pub fn synthetic_benchmark(
    bounds: &GeneBounds,
    seed: u64,
) -> Result<Vec<BenchmarkRecord>, BenchmarkError> {
    let cardinality = bounds.cardinality();
    if cardinality > MAX_SYNTHETIC_ARCHITECTURES {
        return Err(BenchmarkError::TooLarge(cardinality));
    }

    let mut rng = StdRng::seed_from_u64(seed);

    let records = bounds
        .iter()
        .map(|(lo, hi)| lo..=hi)
        .multi_cartesian_product()
        .map(|genes| {
            let genome = Genome::new(genes);
            let noise: f64 = rng.sample(StandardNormal);
            let error = (expected_error(&genome) + NOISE_STD * noise).clamp(0.0, 100.0);

            BenchmarkRecord {
                architecture: genome.to_string(),
                error,
                flops: flops(&genome),
            }
        })
        .collect();

    Ok(records)
}
