use std::collections::HashSet;

use crate::genome::Genome;
use crate::objective::Individual;

/// Exact-match duplicate filter over genomes already present in a population.
#[derive(Debug, Default, Clone)]
pub struct DuplicateEliminator {
    seen: HashSet<Genome>,
}

impl DuplicateEliminator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_population(population: &[Individual]) -> Self {
        Self {
            seen: population.iter().map(|i| i.genome.clone()).collect(),
        }
    }

    pub fn contains(&self, genome: &Genome) -> bool {
        self.seen.contains(genome)
    }

    /// Marks `genome` as present. Returns false if it already was.
    pub fn insert(&mut self, genome: Genome) -> bool {
        self.seen.insert(genome)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Keeps the candidates not seen so far, in their original order, and
    /// records them. Repeats inside `candidates` are dropped after the first.
    pub fn filter(&mut self, candidates: Vec<Genome>) -> Vec<Genome> {
        candidates
            .into_iter()
            .filter(|genome| self.seen.insert(genome.clone()))
            .collect()
    }
}
