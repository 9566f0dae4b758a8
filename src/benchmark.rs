//! Precomputed architecture benchmark used as the objective function.
//!
//! The table is a CSV file with one row per architecture:
//!
//! ```text
//! architecture,error,flops
//! 0-3-1-4-2-0,8.91,78.56
//! ```
//!
//! Both objectives are minimized.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::dominance_ord::Pareto;
use crate::error::{BenchmarkError, EvaluationError};
use crate::fast_nondominating_sort::non_dominated_sort;
use crate::genetic_algorithm::{Evaluator, Objectives};
use crate::genome::Genome;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub architecture: String,
    /// Test error in percent.
    pub error: f64,
    /// Cost in MFLOPs.
    pub flops: f64,
}

#[derive(Debug, Clone)]
pub struct LookupEvaluator {
    table: HashMap<Genome, [f64; 2]>,
    n_var: usize,
}

impl LookupEvaluator {
    pub fn from_records<I>(records: I) -> Result<Self, BenchmarkError>
    where
        I: IntoIterator<Item = BenchmarkRecord>,
    {
        let mut table = HashMap::new();
        let mut n_var = None;

        for record in records {
            let genome: Genome = record
                .architecture
                .parse()
                .map_err(|_| BenchmarkError::Architecture(record.architecture.clone()))?;

            let expected = *n_var.get_or_insert(genome.len());
            if genome.len() != expected {
                return Err(BenchmarkError::GenomeLength {
                    architecture: record.architecture,
                    expected,
                    actual: genome.len(),
                });
            }

            if table.contains_key(&genome) {
                warn!("Duplicate benchmark entry for {}, keeping the first", genome);
                continue;
            }
            table.insert(genome, [record.error, record.flops]);
        }

        match n_var {
            Some(n_var) => Ok(Self { table, n_var }),
            None => Err(BenchmarkError::Empty),
        }
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, BenchmarkError> {
        let mut reader = csv::Reader::from_reader(reader);
        let records = reader
            .deserialize()
            .collect::<Result<Vec<BenchmarkRecord>, csv::Error>>()?;
        Self::from_records(records)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, BenchmarkError> {
        let mut reader = csv::Reader::from_path(path.as_ref())?;
        let records = reader
            .deserialize()
            .collect::<Result<Vec<BenchmarkRecord>, csv::Error>>()?;
        let evaluator = Self::from_records(records)?;
        info!(
            "Loaded {} architectures from {}",
            evaluator.len(),
            path.as_ref().display()
        );
        Ok(evaluator)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Genes per architecture.
    pub fn n_var(&self) -> usize {
        self.n_var
    }

    /// True Pareto front of the whole table, sorted by error.
    pub fn reference_front(&self) -> Vec<Vec<f64>> {
        let points: Vec<Vec<f64>> = self.table.values().map(|o| o.to_vec()).collect();
        let front = non_dominated_sort(&points, &Pareto);

        let mut result: Vec<Vec<f64>> = front.iter().map(|(p, _)| p.clone()).collect();
        result.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        result.dedup();
        result
    }
}

impl Evaluator for LookupEvaluator {
    fn evaluate(&self, genome: &Genome) -> Objectives {
        self.table
            .get(genome)
            .map(|objectives| objectives.to_vec())
            .ok_or_else(|| EvaluationError::UnknownArchitecture(genome.clone()))
    }
}

/// Writes `records` as a benchmark table.
pub fn write_records<W: io::Write>(
    records: &[BenchmarkRecord],
    writer: W,
) -> Result<(), BenchmarkError> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
architecture,error,flops
0-0-0,40.0,1.0
1-0-0,30.0,5.0
2-0-0,30.0,9.0
3-0-0,10.0,20.0
4-0-0,12.0,25.0
";

    #[test]
    fn test_lookup() {
        let evaluator = LookupEvaluator::from_reader(TABLE.as_bytes()).unwrap();
        assert_eq!(evaluator.len(), 5);
        assert_eq!(evaluator.n_var(), 3);
        assert_eq!(
            evaluator.evaluate(&Genome::new(vec![3, 0, 0])),
            Ok(vec![10.0, 20.0])
        );
    }

    #[test]
    fn test_unknown_architecture() {
        let evaluator = LookupEvaluator::from_reader(TABLE.as_bytes()).unwrap();
        let genome = Genome::new(vec![0, 1, 0]);
        assert_eq!(
            evaluator.evaluate(&genome),
            Err(EvaluationError::UnknownArchitecture(genome))
        );
    }

    #[test]
    fn test_reference_front() {
        let evaluator = LookupEvaluator::from_reader(TABLE.as_bytes()).unwrap();
        assert_eq!(
            evaluator.reference_front(),
            vec![vec![10.0, 20.0], vec![30.0, 5.0], vec![40.0, 1.0]]
        );
    }

    #[test]
    fn test_rejects_malformed_tables() {
        let bad_gene = "architecture,error,flops\n0-a-0,1.0,1.0\n";
        assert!(matches!(
            LookupEvaluator::from_reader(bad_gene.as_bytes()),
            Err(BenchmarkError::Architecture(_))
        ));

        let mixed = "architecture,error,flops\n0-0-0,1.0,1.0\n0-0,1.0,1.0\n";
        assert!(matches!(
            LookupEvaluator::from_reader(mixed.as_bytes()),
            Err(BenchmarkError::GenomeLength { expected: 3, actual: 2, .. })
        ));

        let empty = "architecture,error,flops\n";
        assert!(matches!(
            LookupEvaluator::from_reader(empty.as_bytes()),
            Err(BenchmarkError::Empty)
        ));
    }

    #[test]
    fn test_write_then_load() {
        let records = vec![
            BenchmarkRecord {
                architecture: "0-1".to_string(),
                error: 5.5,
                flops: 2.0,
            },
            BenchmarkRecord {
                architecture: "1-1".to_string(),
                error: 4.5,
                flops: 3.0,
            },
        ];

        let mut buffer = Vec::new();
        write_records(&records, &mut buffer).unwrap();
        let evaluator = LookupEvaluator::from_reader(buffer.as_slice()).unwrap();
        assert_eq!(evaluator.evaluate(&Genome::new(vec![1, 1])), Ok(vec![4.5, 3.0]));
    }
}
