use std::cmp::Ordering;

use rand::Rng;

use crate::objective::Individual;

/// Orders two ranked individuals: lower rank first, then larger crowding distance.
pub fn crowded_comparison(a: &Individual, b: &Individual) -> Ordering {
    a.rank.cmp(&b.rank).then_with(|| {
        b.crowding_distance
            .partial_cmp(&a.crowding_distance)
            .unwrap_or(Ordering::Equal)
    })
}

/// Binary tournament between two distinct, uniformly drawn members.
/// A full tie is settled by a coin flip. A single-member population always
/// returns that member.
pub fn binary_tournament<'a, R: Rng + ?Sized>(
    population: &'a [Individual],
    rng: &mut R,
) -> &'a Individual {
    debug_assert!(!population.is_empty());

    if population.len() == 1 {
        return &population[0];
    }

    let a = rng.gen_range(0..population.len());
    let mut b = rng.gen_range(0..population.len() - 1);
    if b >= a {
        b += 1;
    }

    let (a, b) = (&population[a], &population[b]);
    match crowded_comparison(a, b) {
        Ordering::Less => a,
        Ordering::Greater => b,
        Ordering::Equal => {
            if rng.gen_bool(0.5) {
                a
            } else {
                b
            }
        }
    }
}

/// Draws `n` tournament winners.
pub fn select_parents<'a, R: Rng + ?Sized>(
    population: &'a [Individual],
    n: usize,
    rng: &mut R,
) -> Vec<&'a Individual> {
    (0..n).map(|_| binary_tournament(population, rng)).collect()
}
