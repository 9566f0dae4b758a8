//! CSV persistence of search results.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use chrono::Local;
use csv::Writer;
use serde::Serialize;

use crate::error::ReportError;
use crate::nsga2_optimizer::GenerationRecord;
use crate::objective::Individual;

/// One line of the run summary table.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub timestamp: String,
    pub dataset: String,
    pub seed: u64,
    pub pop_size: usize,
    pub n_offsprings: usize,
    pub generations: usize,
    pub evaluations: usize,
    pub front_size: usize,
    pub igd: f64,
    pub runtime_secs: f64,
}

fn objective_headers(n_obj: usize) -> impl Iterator<Item = String> {
    (0..n_obj).map(|i| format!("f{}", i))
}

/// `name_<timestamp>.<extension>` using local time.
pub fn timestamped_name(name: &str, extension: &str) -> String {
    let date_str = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    format!("{}_{}.{}", name, date_str, extension)
}

/// Writes every generation's objective vectors, one row per individual.
pub fn write_history<W: io::Write>(
    history: &[GenerationRecord],
    writer: W,
) -> Result<(), ReportError> {
    let n_obj = history
        .iter()
        .flat_map(|record| record.objectives.first())
        .map(Vec::len)
        .next()
        .unwrap_or(0);

    let mut writer = Writer::from_writer(writer);
    let mut header = vec!["generation".to_string(), "index".to_string()];
    header.extend(objective_headers(n_obj));
    writer.write_record(&header)?;

    for record in history {
        for (index, objectives) in record.objectives.iter().enumerate() {
            let mut row = vec![record.generation.to_string(), index.to_string()];
            row.extend(objectives.iter().map(f64::to_string));
            writer.write_record(&row)?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Writes the final front with each member's encoded architecture.
pub fn write_front<W: io::Write>(front: &[Individual], writer: W) -> Result<(), ReportError> {
    let n_obj = front.first().map_or(0, |individual| individual.objectives.len());

    let mut writer = Writer::from_writer(writer);
    let mut header = vec!["architecture".to_string()];
    header.extend(objective_headers(n_obj));
    writer.write_record(&header)?;

    for individual in front {
        let mut row = vec![individual.genome.to_string()];
        row.extend(individual.objectives.iter().map(f64::to_string));
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Appends `summary` to the CSV at `path`, writing the header only when the
/// file does not exist yet or is empty.
pub fn append_summary(summary: &RunSummary, path: &Path) -> Result<(), ReportError> {
    let is_new = std::fs::metadata(path).map_or(true, |meta| meta.len() == 0);

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(is_new)
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;
    Ok(())
}
