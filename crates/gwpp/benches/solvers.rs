use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use gwpp::generate::{RandomNetworkOptions, paper_network, random_network_seeded};
use gwpp::{Gwpp, Network, best_values};
use std::hint::black_box;
use std::time::Duration;

fn instances() -> Vec<(String, Network)> {
    let mut out = vec![("paper".to_string(), paper_network().unwrap())];
    for (nodes, probability) in [(200, 0.05), (500, 0.02), (1000, 0.01)] {
        let options = RandomNetworkOptions {
            nodes,
            probability,
            paths: 10,
        };
        out.push((
            format!("n{nodes}_p{probability}"),
            random_network_seeded(&options, 42).unwrap(),
        ));
    }
    out
}

fn bench_solvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("solvers");
    group.measurement_time(Duration::from_secs(5));

    let solver = Gwpp::new();
    for (name, network) in instances() {
        group.bench_with_input(
            BenchmarkId::new("contraction", &name),
            &network,
            |b, network| {
                b.iter_batched(
                    || network.clone(),
                    |mut network| black_box(solver.solve(&mut network).unwrap()),
                    BatchSize::LargeInput,
                )
            },
        );
        group.bench_with_input(
            BenchmarkId::new("label_correcting", &name),
            &network,
            |b, network| b.iter(|| black_box(best_values(black_box(network)).unwrap())),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_solvers);
criterion_main!(benches);
