use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use veris_directory::{NodeDirectory, VerifierDirectory};
use veris_rewards::RewardEngine;
use veris_types::{Address, Height, NodeId, ProtocolParams};

fn populated(n_nodes: usize) -> (RewardEngine, NodeDirectory, VerifierDirectory, ProtocolParams) {
    let params = ProtocolParams::defaults();
    let mut nodes = NodeDirectory::new();
    let mut verifiers = VerifierDirectory::new();
    let mut engine = RewardEngine::new();

    let watcher = Address::new("vrs_watcher");
    verifiers.register(watcher.clone(), Height::GENESIS, &params);

    let owner = Address::new("vrs_operator");
    for i in 0..n_nodes {
        let id = NodeId::new(format!("node-{i}"));
        nodes.register(id.clone(), owner.clone(), Height::GENESIS).unwrap();
        engine
            .submit_node_performance(
                &nodes,
                &mut verifiers,
                &watcher,
                &id,
                80,
                100,
                Height::new(10),
                &params,
            )
            .unwrap();
        engine
            .verify_node_performance(&id, 0, true, Height::new(10), &params)
            .unwrap();
    }
    engine.set_epoch_rewards(0, 1_000_000, 1_000_000);
    engine.advance_epoch();
    (engine, nodes, verifiers, params)
}

fn bench_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("reward_estimate");
    let owner = Address::new("vrs_operator");

    for n_nodes in [1, 10, 100, 1000] {
        let (engine, nodes, verifiers, params) = populated(n_nodes);
        group.bench_with_input(BenchmarkId::new("estimate_rewards", n_nodes), &n_nodes, |b, _| {
            b.iter(|| {
                black_box(engine.estimate_rewards(
                    black_box(&nodes),
                    black_box(&verifiers),
                    black_box(&owner),
                    0,
                    black_box(&params),
                ))
            });
        });
    }

    group.finish();
}

fn bench_claim(c: &mut Criterion) {
    let mut group = c.benchmark_group("reward_claim");
    let owner = Address::new("vrs_operator");

    for n_nodes in [1, 10, 100] {
        group.bench_with_input(BenchmarkId::new("claim_rewards", n_nodes), &n_nodes, |b, &n| {
            b.iter_batched(
                || populated(n),
                |(mut engine, nodes, verifiers, params)| {
                    black_box(engine.claim_rewards(&nodes, &verifiers, &owner, 0, &params))
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_estimate, bench_claim);
criterion_main!(benches);
