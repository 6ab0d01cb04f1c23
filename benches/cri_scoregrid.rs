use criterion::{black_box, criterion_group, criterion_main, Criterion};

use scoreline::expectation::FixtureExpectation;
use scoreline::market;
use scoreline::scoregrid::Scoregrid;

fn criterion_benchmark(c: &mut Criterion) {
    let expectation = FixtureExpectation::try_new(1.6, 1.1).unwrap();

    // sanity check
    let scoregrid = Scoregrid::dixon_coles(&expectation, 8, -0.13).unwrap();
    assert!((scoregrid.sum() - 1.0).abs() < 1e-9);

    fn bench(c: &mut Criterion, expectation: &FixtureExpectation, cap: usize) {
        c.bench_function(&format!("cri_scoregrid_dixon_coles_{cap}"), |b| {
            b.iter(|| Scoregrid::dixon_coles(black_box(expectation), cap, -0.13));
        });
        let scoregrid = Scoregrid::dixon_coles(expectation, cap, -0.13).unwrap();
        c.bench_function(&format!("cri_scoregrid_markets_{cap}"), |b| {
            b.iter(|| market::aggregate(black_box(&scoregrid), &[1.5, 2.5, 3.5], 5));
        });
    }
    bench(c, &expectation, 8);
    bench(c, &expectation, 12);
    bench(c, &expectation, 30);
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
