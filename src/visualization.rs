use std::path::Path;

use log::{info, warn};
use plotters::prelude::*;
use plotters::prelude::{Color, Palette99, BLACK, RED, WHITE};

use crate::error::ReportError;
use crate::nsga2_optimizer::GenerationRecord;
use crate::objective::Individual;

fn padded(min: f64, max: f64) -> (f64, f64) {
    let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
    (min - pad, max + pad)
}

fn plot_error<E: std::fmt::Display>(error: E) -> ReportError {
    ReportError::Plot(error.to_string())
}

/// Scatter plot of every generation's objectives with the final front on top.
///
/// Only two-objective searches can be drawn; anything else is skipped with a
/// warning and `Ok(false)` is returned.
pub fn plot_search_progress(
    history: &[GenerationRecord],
    front: &[Individual],
    output_path: &Path,
) -> Result<bool, ReportError> {
    let points = history
        .iter()
        .flat_map(|record| record.objectives.iter())
        .chain(front.iter().map(|individual| &individual.objectives));

    let mut x_range = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y_range = (f64::INFINITY, f64::NEG_INFINITY);
    let mut count = 0;
    for objectives in points {
        if objectives.len() != 2 {
            warn!(
                "Skipping plot, {} objectives cannot be drawn in two dimensions",
                objectives.len()
            );
            return Ok(false);
        }
        x_range = (x_range.0.min(objectives[0]), x_range.1.max(objectives[0]));
        y_range = (y_range.0.min(objectives[1]), y_range.1.max(objectives[1]));
        count += 1;
    }

    if count == 0 {
        warn!("Skipping plot, nothing to draw");
        return Ok(false);
    }

    let (x_min, x_max) = padded(x_range.0, x_range.1);
    let (y_min, y_max) = padded(y_range.0, y_range.1);

    let root = BitMapBackend::new(output_path, (1200, 900)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Search progress", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("Error (%)")
        .y_desc("FLOPs (M)")
        .draw()
        .map_err(plot_error)?;

    for record in history {
        let color = Palette99::pick(record.generation).mix(0.4);
        chart
            .draw_series(
                record
                    .objectives
                    .iter()
                    .map(|o| Circle::new((o[0], o[1]), 2, color.filled())),
            )
            .map_err(plot_error)?;
    }

    chart
        .draw_series(
            front
                .iter()
                .map(|i| Circle::new((i.objectives[0], i.objectives[1]), 4, RED.filled())),
        )
        .map_err(plot_error)?
        .label("Final front")
        .legend(|(x, y)| Circle::new((x, y), 4, RED.filled()));

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .draw()
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    info!("Chart saved to {}", output_path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_non_bi_objective() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.png");
        let history = vec![GenerationRecord {
            generation: 1,
            objectives: vec![vec![1.0, 2.0, 3.0]],
        }];

        assert!(!plot_search_progress(&history, &[], &path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_skips_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.png");
        assert!(!plot_search_progress(&[], &[], &path).unwrap());
    }

    #[test]
    fn test_padding() {
        assert_eq!(padded(0.0, 10.0), (-0.5, 10.5));
        assert_eq!(padded(3.0, 3.0), (2.0, 4.0));
    }
}
