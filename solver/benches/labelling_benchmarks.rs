use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use solution::test_utilities::init_test_data;
use solver::{
    heuristics::FastHeuristic, labelling::LabelSetting, network_view::NetworkView,
    reduction::smart_reduced,
};

pub fn labelling_benchmarks(c: &mut Criterion) {
    let d = init_test_data();
    let view = NetworkView::new(d.network.graph(d.small));

    c.bench_function("exact_labelling", |b| {
        b.iter(|| LabelSetting::new(&view, 10).run())
    });

    c.bench_function("elementary_labelling", |b| {
        b.iter(|| LabelSetting::elementary(&view, 10).run())
    });

    c.bench_function("fast_heuristic", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        b.iter(|| FastHeuristic::new(&view, 5, 10).run(&mut rng))
    });

    c.bench_function("smart_reduced_labelling", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        b.iter(|| {
            let reduced = smart_reduced(&view, 0.1, 0.9, &mut rng);
            LabelSetting::new(&reduced, 10).run()
        })
    });
}

criterion_group!(benches, labelling_benchmarks);
criterion_main!(benches);
