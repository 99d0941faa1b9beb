//! Criterion benchmarks for u-swarm algorithms.
//!
//! Runs every variant on the Sphere function to measure algorithm
//! overhead independent of any objective cost.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_swarm::engine::{Direction, Evolve, Optimizer, OptimizerConfig, Problem};
use u_swarm::srsr::Srsr;
use u_swarm::sspider::SocialSpider;
use u_swarm::tlo::{ImprovedTlo, Tlo, TloConfig, TloVariant};

fn sphere(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum()
}

const CASES: [(usize, usize, usize); 3] = [(10, 30, 50), (30, 50, 30), (100, 50, 20)];

fn bench_variant<A, F>(c: &mut Criterion, name: &str, make: F)
where
    A: Evolve,
    F: Fn() -> A,
{
    let mut group = c.benchmark_group(name);
    group.sample_size(10);

    for (dim, pop, epochs) in CASES {
        let problem = Problem::new(vec![-5.0; dim], vec![5.0; dim], Direction::Minimize).unwrap();
        let config = OptimizerConfig::default()
            .with_epochs(epochs)
            .with_pop_size(pop)
            .with_seed(42);
        let optimizer = Optimizer::new(problem, make(), config).unwrap();
        group.bench_with_input(
            BenchmarkId::new(format!("d{}_p{}_e{}", dim, pop, epochs), dim),
            &optimizer,
            |b, opt| {
                b.iter(|| {
                    let result = opt.run(&sphere).unwrap();
                    black_box(result.best_fitness)
                })
            },
        );
    }
    group.finish();
}

fn bench_tlo(c: &mut Criterion) {
    bench_variant(c, "tlo_sphere", Tlo::default);
    bench_variant(c, "original_tlo_sphere", || {
        Tlo::new(TloConfig::default().with_variant(TloVariant::Original))
    });
}

fn bench_itlo(c: &mut Criterion) {
    bench_variant(c, "itlo_sphere", ImprovedTlo::default);
}

fn bench_srsr(c: &mut Criterion) {
    bench_variant(c, "srsr_sphere", Srsr::default);
}

fn bench_sspider(c: &mut Criterion) {
    bench_variant(c, "sspider_sphere", SocialSpider::default);
}

fn bench_parallel_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("tlo_parallel");
    group.sample_size(10);

    for parallel in [false, true] {
        let problem = Problem::new(vec![-5.0; 50], vec![5.0; 50], Direction::Minimize).unwrap();
        let config = OptimizerConfig::default()
            .with_epochs(20)
            .with_pop_size(200)
            .with_seed(42)
            .with_parallel(parallel);
        let optimizer = Optimizer::new(problem, Tlo::default(), config).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(parallel), &optimizer, |b, opt| {
            b.iter(|| black_box(opt.run(&sphere).unwrap().best_fitness))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_tlo,
    bench_itlo,
    bench_srsr,
    bench_sspider,
    bench_parallel_evaluation
);
criterion_main!(benches);
