//! Quality indicators for approximated Pareto fronts.

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Inverted generational distance: mean distance from every reference point
/// to its nearest point in `front`.
///
/// An empty reference yields `0.0`; an empty front against a non-empty
/// reference yields `f64::INFINITY`.
pub fn igd(front: &[Vec<f64>], reference: &[Vec<f64>]) -> f64 {
    if reference.is_empty() {
        return 0.0;
    }
    if front.is_empty() {
        return f64::INFINITY;
    }

    let total: f64 = reference
        .iter()
        .map(|r| {
            front
                .iter()
                .map(|p| euclidean(r, p))
                .fold(f64::INFINITY, f64::min)
        })
        .sum();

    total / reference.len() as f64
}
