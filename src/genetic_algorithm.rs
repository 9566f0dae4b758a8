use rayon::prelude::*;

use crate::error::EvaluationError;
use crate::genome::Genome;
use crate::objective::Individual;

pub type Objectives = Result<Vec<f64>, EvaluationError>;

// This trait maps a genome to its objective vector. Every objective is
// minimized.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, genome: &Genome) -> Objectives;

    /// Scores a batch. Results are returned in input order.
    fn evaluate_batch(&self, genomes: &[Genome]) -> Vec<Objectives> {
        genomes.iter().map(|genome| self.evaluate(genome)).collect()
    }
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn evaluate(&self, genome: &Genome) -> Objectives {
        (**self).evaluate(genome)
    }

    fn evaluate_batch(&self, genomes: &[Genome]) -> Vec<Objectives> {
        (**self).evaluate_batch(genomes)
    }
}

/// Adapts a closure into an `Evaluator`.
pub struct FnEvaluator<F> {
    f: F,
}

impl<F> FnEvaluator<F>
where
    F: Fn(&Genome) -> Objectives + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Evaluator for FnEvaluator<F>
where
    F: Fn(&Genome) -> Objectives + Send + Sync,
{
    fn evaluate(&self, genome: &Genome) -> Objectives {
        (self.f)(genome)
    }
}

/// Scores batches on the rayon thread pool.
pub struct ParallelEvaluator<E> {
    inner: E,
}

impl<E: Evaluator> ParallelEvaluator<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }
}

impl<E: Evaluator> Evaluator for ParallelEvaluator<E> {
    fn evaluate(&self, genome: &Genome) -> Objectives {
        self.inner.evaluate(genome)
    }

    fn evaluate_batch(&self, genomes: &[Genome]) -> Vec<Objectives> {
        genomes
            .par_iter()
            .map(|genome| self.inner.evaluate(genome))
            .collect()
    }
}

// This trait represents the stopping condition of the algorithm. It is asked
// once after every completed generation, counted from 1.
pub trait Termination {
    fn can_terminate(&mut self, population: &[Individual], generation: usize) -> bool;
}

/// Stops after a fixed number of generations.
#[derive(Debug, Clone, Copy)]
pub struct MaxGenerations(pub usize);

impl Termination for MaxGenerations {
    fn can_terminate(&mut self, _population: &[Individual], generation: usize) -> bool {
        generation >= self.0
    }
}

// Observer invoked with the objective matrix of every generation.
pub trait GenerationCallback {
    fn on_generation(&mut self, generation: usize, objectives: &[Vec<f64>]);
}

impl<F> GenerationCallback for F
where
    F: FnMut(usize, &[Vec<f64>]),
{
    fn on_generation(&mut self, generation: usize, objectives: &[Vec<f64>]) {
        self(generation, objectives)
    }
}
