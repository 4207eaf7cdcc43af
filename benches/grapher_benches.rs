use RustedGrapher::grapher::domain::Domain;
use RustedGrapher::grapher::grapher_api::Grapher;
use RustedGrapher::grapher::pipeline::{GrapherSettings, compile_formula};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const FORMULAS: [&str; 8] = [
    "sinx",
    "cosx^2 + sinx^2",
    "x^3 - 2*x + 1",
    "1 - x^2/factorial(2) + x^4/factorial(4)",
    "log(x^2 + 1, 2)",
    "e^(-x^2/2)",
    "tan(x/7) % 3",
    "cbrt(x^2) * pi",
];

fn bench_compile(c: &mut Criterion) {
    let settings = GrapherSettings::default();
    c.bench_function("compile taylor cosine", |b| {
        b.iter(|| compile_formula(black_box(FORMULAS[3]), &settings))
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let settings = GrapherSettings::default();
    // [-50, 50] with step 0.01
    let domain = Domain::default();
    let compiled = compile_formula(FORMULAS[1], &settings).unwrap();
    c.bench_function("evaluate over default domain", |b| {
        b.iter(|| compiled.evaluate(black_box(&domain), &settings))
    });
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch of formulas");
    for parallel in [false, true] {
        let mut grapher = Grapher::new();
        grapher.set_formulas(FORMULAS.to_vec());
        grapher.set_parallel(parallel);
        group.bench_with_input(BenchmarkId::new("parallel", parallel), &parallel, |b, _| {
            b.iter(|| grapher.graph().map(|output| output.len()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compile, bench_evaluate, bench_batch);
criterion_main!(benches);
