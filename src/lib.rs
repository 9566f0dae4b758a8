//! NSGA-II search over integer-encoded neural architectures.
//!
//! The engine ranks a population by Pareto dominance and crowding distance,
//! breeds offspring with integer SBX and polynomial mutation, drops duplicate
//! genomes and keeps the best `pop_size` individuals every generation.
//! Objective evaluation is injected through the [`Evaluator`] trait, usually a
//! [`LookupEvaluator`] over a precomputed architecture benchmark.
//!
//! ```rust,no_run
//! use nsga2_nas::{FnEvaluator, Genome, Nsga2Config, Nsga2Optimizer};
//!
//! let evaluator = FnEvaluator::new(|genome: &Genome| {
//!     let genes = genome.genes();
//!     Ok(vec![genes.iter().sum::<i64>() as f64, genes[0] as f64])
//! });
//!
//! let mut optimizer = Nsga2Optimizer::new(Nsga2Config::default(), evaluator)?;
//! let result = optimizer.run(|generation: usize, objectives: &[Vec<f64>]| {
//!     println!("generation {}: {} individuals", generation, objectives.len());
//! })?;
//! println!("front size: {}", result.front.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod benchmark;
pub mod config;
pub mod demo_data;
pub mod dominance_ord;
pub mod duplicates;
pub mod error;
pub mod fast_nondominating_sort;
pub mod genetic_algorithm;
pub mod genome;
pub mod indicators;
pub mod nsga2_optimizer;
pub mod objective;
pub mod report;
pub mod selection;
pub mod variation;
pub mod visualization;

pub use benchmark::{BenchmarkRecord, LookupEvaluator};
pub use config::{CrossoverConfig, CrossoverGranularity, MutationConfig, Nsga2Config};
pub use error::{BenchmarkError, ConfigError, EvaluationError, OptimizerError, ReportError};
pub use genetic_algorithm::{
    Evaluator, FnEvaluator, GenerationCallback, MaxGenerations, ParallelEvaluator, Termination,
};
pub use genome::{GeneBounds, Genome};
pub use nsga2_optimizer::{GenerationRecord, Nsga2Optimizer, OptimizationResult};
pub use objective::Individual;
