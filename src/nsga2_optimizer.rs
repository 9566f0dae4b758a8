use std::cmp::Ordering;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::Nsga2Config;
use crate::duplicates::DuplicateEliminator;
use crate::error::{ConfigError, EvaluationError, OptimizerError};
use crate::fast_nondominating_sort::{
    assign_crowding_distance, non_dominated_sort, AssignedCrowdingDistance,
};
use crate::genetic_algorithm::{
    Evaluator, GenerationCallback, MaxGenerations, Objectives, Termination,
};
use crate::genome::{GeneBounds, Genome};
use crate::objective::{with_axes, Individual, MultiObjective};
use crate::selection::{crowded_comparison, select_parents};
use crate::variation::{PolynomialMutation, SimulatedBinaryCrossover};

/// Objective vectors of one generation's population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: usize,
    pub objectives: Vec<Vec<f64>>,
}

impl GenerationRecord {
    fn snapshot(generation: usize, population: &[Individual]) -> Self {
        Self {
            generation,
            objectives: population.iter().map(|i| i.objectives.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Non-dominated members of the final population.
    pub front: Vec<Individual>,
    pub population: Vec<Individual>,
    pub history: Vec<GenerationRecord>,
    pub generations: usize,
    /// Genomes handed to the evaluator, failures included.
    pub evaluations: usize,
}

pub fn select_and_rank<'a, S: 'a>(
    solutions: &'a [S],
    n: usize,
    multi_objective: &MultiObjective<S, f64>,
) -> Vec<AssignedCrowdingDistance<'a, S>> {
    // Cannot select more solutions than we actually have
    let n = solutions.len().min(n);

    let mut result = Vec::with_capacity(n);
    let mut missing_solutions = n;
    let mut front = non_dominated_sort(solutions, multi_objective);

    while missing_solutions > 0 && !front.is_empty() {
        let mut assigned_crowding = assign_crowding_distance(&front, multi_objective);

        if assigned_crowding.len() > missing_solutions {
            // the front does not fit in total. sort its solutions
            // according to the crowding distance and take the best
            // solutions until we have "n" solutions in the result.
            assigned_crowding.sort_by(|a, b| {
                debug_assert_eq!(a.rank, b.rank);
                b.crowding_distance
                    .partial_cmp(&a.crowding_distance)
                    .unwrap_or(Ordering::Equal)
            });
        }

        // Take no more than `missing_solutions`
        let take = assigned_crowding.len().min(missing_solutions);

        result.extend(assigned_crowding.into_iter().take(take));

        missing_solutions -= take;
        front = front.next_front();
    }

    debug_assert_eq!(n, result.len());

    result
}

/// Ranks `solutions` and keeps the best `n`, best first.
pub fn survivors(solutions: &[Individual], n: usize, n_obj: usize) -> Vec<Individual> {
    with_axes(n_obj, |mo| {
        let mut ranked: Vec<Individual> = select_and_rank(solutions, n, mo)
            .into_iter()
            .map(|assigned| Individual {
                rank: assigned.rank,
                crowding_distance: assigned.crowding_distance,
                ..assigned.solution.clone()
            })
            .collect();
        ranked.sort_by(crowded_comparison);
        ranked
    })
}

/// First front of `population`, crowding distances computed inside it.
pub fn pareto_front(population: &[Individual], n_obj: usize) -> Vec<Individual> {
    with_axes(n_obj, |mo| {
        let front = non_dominated_sort(population, mo);
        let mut members: Vec<Individual> = assign_crowding_distance(&front, mo)
            .into_iter()
            .map(|assigned| Individual {
                rank: 0,
                crowding_distance: assigned.crowding_distance,
                ..assigned.solution.clone()
            })
            .collect();
        members.sort_by(|a, b| {
            a.objectives
                .partial_cmp(&b.objectives)
                .unwrap_or(Ordering::Equal)
        });
        members
    })
}

fn checked_objectives(
    genome: &Genome,
    result: Objectives,
    n_obj: usize,
) -> Result<Vec<f64>, EvaluationError> {
    let objectives = result?;

    if objectives.len() != n_obj {
        return Err(EvaluationError::WrongLength {
            genome: genome.clone(),
            expected: n_obj,
            actual: objectives.len(),
        });
    }

    if let Some(index) = objectives.iter().position(|v| !v.is_finite()) {
        return Err(EvaluationError::NotFinite {
            genome: genome.clone(),
            index,
        });
    }

    Ok(objectives)
}

/// Produces, de-duplicates and evaluates candidates until `target` individuals
/// are accepted or `cap` candidates were produced. Genomes that fail
/// evaluation stay in `eliminator`, so they are not proposed again.
fn fill_batch<E, R, P>(
    target: usize,
    cap: usize,
    n_obj: usize,
    evaluator: &E,
    rng: &mut R,
    eliminator: &mut DuplicateEliminator,
    mut produce: P,
) -> (Vec<Individual>, usize)
where
    E: Evaluator + ?Sized,
    R: Rng + ?Sized,
    P: FnMut(&mut R, usize) -> Vec<Genome>,
{
    let mut accepted = Vec::with_capacity(target);
    let mut produced = 0;
    let mut evaluations = 0;

    while accepted.len() < target && produced < cap {
        let request = (target - accepted.len()).min(cap - produced);
        let candidates = produce(&mut *rng, request);
        produced += request;

        let unique = eliminator.filter(candidates);
        if unique.is_empty() {
            continue;
        }

        let results = evaluator.evaluate_batch(&unique);
        evaluations += unique.len();

        for (genome, result) in unique.into_iter().zip(results) {
            match checked_objectives(&genome, result, n_obj) {
                Ok(objectives) => accepted.push(Individual::new(genome, objectives)),
                Err(err) => warn!("Dropping {}: {}", genome, err),
            }
        }
    }

    debug!(
        "Produced {} candidates, accepted {} of {} requested",
        produced,
        accepted.len(),
        target
    );

    (accepted, evaluations)
}

/// Tournament, crossover and mutation until `n` children exist.
fn mate<R: Rng + ?Sized>(
    population: &[Individual],
    n: usize,
    crossover: &SimulatedBinaryCrossover,
    mutation: &PolynomialMutation,
    bounds: &GeneBounds,
    rng: &mut R,
) -> Vec<Genome> {
    let mut children = Vec::with_capacity(n + 1);

    while children.len() < n {
        let parents = select_parents(population, 2, rng);
        let (c1, c2) = crossover.crossover(&parents[0].genome, &parents[1].genome, bounds, rng);
        children.push(mutation.mutate(&c1, bounds, rng));
        children.push(mutation.mutate(&c2, bounds, rng));
    }

    children.truncate(n);
    children
}

pub struct Nsga2Optimizer<E, R = StdRng> {
    config: Nsga2Config,
    evaluator: E,
    rng: R,
    crossover: SimulatedBinaryCrossover,
    mutation: PolynomialMutation,
}

impl<E: Evaluator> Nsga2Optimizer<E, StdRng> {
    /// Optimizer seeded from `config.seed`.
    pub fn new(config: Nsga2Config, evaluator: E) -> Result<Self, ConfigError> {
        let rng = StdRng::seed_from_u64(config.seed);
        Self::with_rng(config, evaluator, rng)
    }
}

impl<E: Evaluator, R: Rng> Nsga2Optimizer<E, R> {
    /// All randomness of the run is drawn from `rng`.
    pub fn with_rng(config: Nsga2Config, evaluator: E, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let crossover = SimulatedBinaryCrossover::from(&config.crossover);
        let mutation = PolynomialMutation::from_config(&config.mutation, config.n_var());

        Ok(Self {
            config,
            evaluator,
            rng,
            crossover,
            mutation,
        })
    }

    pub fn config(&self) -> &Nsga2Config {
        &self.config
    }

    /// Runs for `config.n_generations` generations.
    pub fn run<C: GenerationCallback>(
        &mut self,
        callback: C,
    ) -> Result<OptimizationResult, OptimizerError> {
        let termination = MaxGenerations(self.config.n_generations);
        self.run_until(termination, callback)
    }

    /// Runs until `termination` is satisfied. The initial population is
    /// generation 1.
    pub fn run_until<T: Termination, C: GenerationCallback>(
        &mut self,
        mut termination: T,
        mut callback: C,
    ) -> Result<OptimizationResult, OptimizerError> {
        let mut evaluations = 0;
        let mut history = Vec::new();
        let mut generation = 1;

        let mut population = self.initialize(&mut evaluations)?;

        loop {
            let record = GenerationRecord::snapshot(generation, &population);
            let front_size = population.iter().filter(|i| i.rank == 0).count();
            info!(
                "Generation {:3} - population: {}, front 0: {}, evaluations: {}",
                generation,
                population.len(),
                front_size,
                evaluations
            );

            callback.on_generation(generation, &record.objectives);
            history.push(record);

            if termination.can_terminate(&population, generation) {
                break;
            }

            let offspring = self.offspring(&population, &mut evaluations);

            let mut merged = population;
            merged.extend(offspring);
            population = survivors(&merged, self.config.pop_size, self.config.n_obj);
            debug_assert_eq!(population.len(), self.config.pop_size);

            generation += 1;
        }

        let front = pareto_front(&population, self.config.n_obj);

        Ok(OptimizationResult {
            front,
            population,
            history,
            generations: generation,
            evaluations,
        })
    }

    fn initialize(&mut self, evaluations: &mut usize) -> Result<Vec<Individual>, OptimizerError> {
        let pop_size = self.config.pop_size;
        let bounds = &self.config.bounds;
        let mut eliminator = DuplicateEliminator::new();

        let (population, spent) = fill_batch(
            pop_size,
            pop_size.saturating_mul(self.config.duplicate_cap_factor),
            self.config.n_obj,
            &self.evaluator,
            &mut self.rng,
            &mut eliminator,
            |rng: &mut R, n| (0..n).map(|_| bounds.sample(&mut *rng)).collect(),
        );
        *evaluations += spent;

        if population.len() < pop_size {
            return Err(OptimizerError::InitialPopulation {
                requested: pop_size,
                obtained: population.len(),
            });
        }

        Ok(survivors(&population, pop_size, self.config.n_obj))
    }

    fn offspring(&mut self, population: &[Individual], evaluations: &mut usize) -> Vec<Individual> {
        let n_offsprings = self.config.n_offsprings;
        let bounds = &self.config.bounds;
        let crossover = &self.crossover;
        let mutation = &self.mutation;
        let mut eliminator = DuplicateEliminator::from_population(population);

        let (offspring, spent) = fill_batch(
            n_offsprings,
            n_offsprings.saturating_mul(self.config.duplicate_cap_factor),
            self.config.n_obj,
            &self.evaluator,
            &mut self.rng,
            &mut eliminator,
            |rng: &mut R, n| mate(population, n, crossover, mutation, bounds, rng),
        );
        *evaluations += spent;

        if offspring.len() < n_offsprings {
            warn!(
                "Duplicate elimination cap reached: {} of {} offspring produced",
                offspring.len(),
                n_offsprings
            );
        }

        offspring
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetic_algorithm::FnEvaluator;

    fn individual(genes: &[i64], objectives: &[f64]) -> Individual {
        Individual::new(Genome::new(genes.to_vec()), objectives.to_vec())
    }

    fn sum_and_spread(genome: &Genome) -> Objectives {
        let genes = genome.genes();
        let max = genes.iter().max().copied().unwrap_or(0);
        let min = genes.iter().min().copied().unwrap_or(0);
        Ok(vec![genes.iter().sum::<i64>() as f64, (max - min) as f64])
    }

    fn small_config() -> Nsga2Config {
        Nsga2Config {
            pop_size: 8,
            n_offsprings: 4,
            n_generations: 5,
            bounds: GeneBounds::uniform(3, 0, 4).unwrap(),
            seed: 2024,
            ..Default::default()
        }
    }

    #[test]
    fn test_select_and_rank_splits_last_front_by_crowding() {
        // one front on a line plus a dominated point
        let population = vec![
            individual(&[0], &[0.0, 4.0]),
            individual(&[1], &[1.0, 3.0]),
            individual(&[2], &[1.5, 2.5]),
            individual(&[3], &[3.0, 1.0]),
            individual(&[4], &[4.0, 0.0]),
            individual(&[5], &[5.0, 5.0]),
        ];

        let kept = survivors(&population, 3, 2);
        let mut ids: Vec<i64> = kept.iter().map(|i| i.genome.genes()[0]).collect();
        ids.sort_unstable();

        // extremes first, then the sparsest interior point
        assert_eq!(ids, vec![0, 3, 4]);
        assert!(kept.iter().all(|i| i.rank == 0));
    }

    #[test]
    fn test_survivors_fill_from_later_fronts() {
        let population = vec![
            individual(&[0], &[0.0, 1.0]),
            individual(&[1], &[1.0, 0.0]),
            individual(&[2], &[1.0, 1.0]),
            individual(&[3], &[2.0, 2.0]),
            individual(&[4], &[3.0, 3.0]),
        ];

        let kept = survivors(&population, 4, 2);
        assert_eq!(kept.len(), 4);
        assert_eq!(
            kept.iter().map(|i| i.rank).collect::<Vec<_>>(),
            vec![0, 0, 1, 2]
        );
    }

    #[test]
    fn test_run_keeps_population_size_and_uniqueness() {
        let mut optimizer =
            Nsga2Optimizer::new(small_config(), FnEvaluator::new(sum_and_spread)).unwrap();
        let result = optimizer.run(|_: usize, _: &[Vec<f64>]| {}).unwrap();

        assert_eq!(result.population.len(), 8);
        let unique = DuplicateEliminator::from_population(&result.population);
        assert_eq!(unique.len(), 8);
        assert!(result
            .population
            .iter()
            .all(|i| optimizer.config().bounds.contains(&i.genome)));
    }

    #[test]
    fn test_callback_sees_every_generation() {
        let mut seen = Vec::new();
        let mut optimizer =
            Nsga2Optimizer::new(small_config(), FnEvaluator::new(sum_and_spread)).unwrap();
        let result = optimizer
            .run(|generation: usize, objectives: &[Vec<f64>]| {
                seen.push((generation, objectives.len()))
            })
            .unwrap();

        assert_eq!(seen, (1..=5).map(|g| (g, 8)).collect::<Vec<_>>());
        assert_eq!(result.generations, 5);
        assert_eq!(result.history.len(), 5);
    }

    #[test]
    fn test_failing_genomes_are_dropped() {
        let evaluator = FnEvaluator::new(|genome: &Genome| {
            if genome.genes()[0] == 0 {
                Err(EvaluationError::Failed {
                    genome: genome.clone(),
                    reason: "lookup failed".to_string(),
                })
            } else if genome.genes()[0] == 1 {
                Ok(vec![f64::NAN, 0.0])
            } else if genome.genes()[0] == 2 {
                Ok(vec![1.0])
            } else {
                sum_and_spread(genome)
            }
        });

        let mut optimizer = Nsga2Optimizer::new(small_config(), evaluator).unwrap();
        let result = optimizer.run(|_: usize, _: &[Vec<f64>]| {}).unwrap();

        assert_eq!(result.population.len(), 8);
        assert!(result.population.iter().all(|i| i.genome.genes()[0] >= 3));
        assert!(result
            .history
            .iter()
            .flat_map(|r| r.objectives.iter())
            .all(|o| o.len() == 2 && o.iter().all(|v| v.is_finite())));
    }

    #[test]
    fn test_initial_population_failure() {
        let evaluator = FnEvaluator::new(|genome: &Genome| {
            Err(EvaluationError::UnknownArchitecture(genome.clone()))
        });

        let mut optimizer = Nsga2Optimizer::new(small_config(), evaluator).unwrap();
        let result = optimizer.run(|_: usize, _: &[Vec<f64>]| {});
        assert!(matches!(
            result,
            Err(OptimizerError::InitialPopulation {
                requested: 8,
                obtained: 0
            })
        ));
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = Nsga2Config {
            pop_size: 0,
            ..small_config()
        };
        let result = Nsga2Optimizer::new(config, FnEvaluator::new(sum_and_spread));
        assert!(matches!(result, Err(ConfigError::PopulationSize)));
    }

    struct StopWhenFrontCovers(usize);

    impl Termination for StopWhenFrontCovers {
        fn can_terminate(&mut self, population: &[Individual], generation: usize) -> bool {
            population.iter().filter(|i| i.rank == 0).count() >= self.0 || generation >= 50
        }
    }

    #[test]
    fn test_custom_termination() {
        let mut optimizer =
            Nsga2Optimizer::new(small_config(), FnEvaluator::new(sum_and_spread)).unwrap();
        let result = optimizer
            .run_until(StopWhenFrontCovers(2), |_: usize, _: &[Vec<f64>]| {})
            .unwrap();

        assert!(result.generations <= 50);
        assert_eq!(result.history.len(), result.generations);
        assert!(!result.front.is_empty());
    }

    #[test]
    fn test_pareto_front_of_final_population() {
        let population = vec![
            individual(&[0], &[2.0, 1.0]),
            individual(&[1], &[1.0, 2.0]),
            individual(&[2], &[2.0, 2.0]),
        ];

        let front = pareto_front(&population, 2);
        assert_eq!(front.len(), 2);
        assert_eq!(front[0].genome.genes(), &[1]);
        assert!(front.iter().all(|i| i.crowding_distance.is_infinite()));
    }
}
