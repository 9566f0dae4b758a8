//! Benchmarks for Pareto ranking and survival selection.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;

use nsga2_nas::dominance_ord::Pareto;
use nsga2_nas::fast_nondominating_sort::fronts;
use nsga2_nas::nsga2_optimizer::survivors;
use nsga2_nas::{Genome, Individual};

fn random_points(n: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    (0..n)
        .map(|_| vec![rng.gen_range(0.0..100.0), rng.gen_range(0.0..500.0)])
        .collect()
}

fn bench_fronts(c: &mut Criterion) {
    let mut group = c.benchmark_group("fronts");
    let mut rng = StdRng::seed_from_u64(19522298);

    for size in [100, 220, 500, 1000] {
        let points = random_points(size, &mut rng);
        group.bench_with_input(BenchmarkId::from_parameter(size), &points, |b, points| {
            b.iter(|| fronts(black_box(points), &Pareto))
        });
    }

    group.finish();
}

fn bench_survivors(c: &mut Criterion) {
    let mut group = c.benchmark_group("survivors");
    let mut rng = StdRng::seed_from_u64(19522298);

    for size in [220, 1000] {
        let population: Vec<Individual> = random_points(size, &mut rng)
            .into_iter()
            .enumerate()
            .map(|(i, objectives)| Individual::new(Genome::new(vec![i as i64]), objectives))
            .collect();
        let keep = size * 10 / 11;

        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &population,
            |b, population| b.iter(|| survivors(black_box(population), keep, 2)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_fronts, bench_survivors);
criterion_main!(benches);
