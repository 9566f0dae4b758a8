use std::cmp::Ordering;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::genome::Genome;

pub trait Objective {
    type Solution;

    type Distance: Sized;

    fn total_order(&self, a: &Self::Solution, b: &Self::Solution) -> Ordering;

    fn distance(&self, a: &Self::Solution, b: &Self::Solution) -> Self::Distance;
}

pub struct MultiObjective<'a, S, D>
where
    S: 'a,
    D: 'a,
{
    pub objectives: &'a [&'a dyn Objective<Solution = S, Distance = D>],
    _solution: PhantomData<S>,
    _distance: PhantomData<D>,
}

impl<'a, S, D> MultiObjective<'a, S, D>
where
    S: 'a,
    D: 'a,
{
    pub fn new(objectives: &'a [&'a dyn Objective<Solution = S, Distance = D>]) -> Self {
        Self {
            objectives,
            _solution: PhantomData,
            _distance: PhantomData,
        }
    }
}

/// An evaluated genome together with the metadata assigned by ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub genome: Genome,
    pub objectives: Vec<f64>,
    /// Pareto rank, 0 is the non-dominated front.
    pub rank: usize,
    /// Crowding distance within the individual's front.
    pub crowding_distance: f64,
}

impl Individual {
    pub fn new(genome: Genome, objectives: Vec<f64>) -> Self {
        Self {
            genome,
            objectives,
            rank: 0,
            crowding_distance: 0.0,
        }
    }
}

/// One minimized component of the objective vector.
#[derive(Debug, Clone, Copy)]
pub struct ObjectiveAxis(pub usize);

impl Objective for ObjectiveAxis {
    type Solution = Individual;
    type Distance = f64;

    fn total_order(&self, a: &Self::Solution, b: &Self::Solution) -> Ordering {
        a.objectives[self.0]
            .partial_cmp(&b.objectives[self.0])
            .unwrap_or(Ordering::Equal)
    }

    fn distance(&self, a: &Self::Solution, b: &Self::Solution) -> Self::Distance {
        a.objectives[self.0] - b.objectives[self.0]
    }
}

/// Builds one axis per objective.
pub fn objective_axes(n_obj: usize) -> Vec<ObjectiveAxis> {
    (0..n_obj).map(ObjectiveAxis).collect()
}

/// Runs `f` with a `MultiObjective` over the first `n_obj` objective axes.
pub fn with_axes<T>(n_obj: usize, f: impl FnOnce(&MultiObjective<Individual, f64>) -> T) -> T {
    let axes = objective_axes(n_obj);
    let refs: Vec<&dyn Objective<Solution = Individual, Distance = f64>> = axes
        .iter()
        .map(|axis| axis as &dyn Objective<Solution = Individual, Distance = f64>)
        .collect();
    let mo = MultiObjective::new(&refs);
    f(&mo)
}
