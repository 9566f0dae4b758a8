use crate::genome::Genome;

/// Configuration validation errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Population size must be at least 1")]
    PopulationSize,
    #[error("Offspring count {count} must be between 1 and {max}")]
    OffspringCount { count: usize, max: usize },
    #[error("Number of generations must be at least 1")]
    Generations,
    #[error("Number of objectives must be at least 1")]
    Objectives,
    #[error("Invalid gene bounds: {0}")]
    InvalidBounds(String),
    #[error("Invalid probability for {name}: {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("Distribution index for {name} must be positive and finite, got {value}")]
    InvalidDistributionIndex { name: &'static str, value: f64 },
    #[error("Duplicate elimination cap factor must be at least 1")]
    DuplicateCap,
    #[error("Search space holds {cardinality} genomes, fewer than the population size {pop_size}")]
    SearchSpaceTooSmall { cardinality: u128, pop_size: usize },
}

/// Failure to score a single genome.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum EvaluationError {
    #[error("Evaluation of {genome} failed: {reason}")]
    Failed { genome: Genome, reason: String },
    #[error("Architecture {0} is not present in the benchmark")]
    UnknownArchitecture(Genome),
    #[error("Evaluation of {genome} returned {actual} objectives, expected {expected}")]
    WrongLength {
        genome: Genome,
        expected: usize,
        actual: usize,
    },
    #[error("Objective {index} of {genome} is not finite")]
    NotFinite { genome: Genome, index: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum OptimizerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Could only produce {obtained} of {requested} unique, evaluable initial individuals")]
    InitialPopulation { requested: usize, obtained: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum BenchmarkError {
    #[error("Failed to read benchmark table: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid architecture encoding '{0}'")]
    Architecture(String),
    #[error("Benchmark table is empty")]
    Empty,
    #[error("Search space of {0} architectures is too large to enumerate")]
    TooLarge(u128),
    #[error("Architecture {architecture} has {actual} genes, expected {expected}")]
    GenomeLength {
        architecture: String,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("CSV output failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Plotting failed: {0}")]
    Plot(String),
}
