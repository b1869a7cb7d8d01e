use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tessera_core::retention::{evaluate, RetentionConfig};
use tessera_core::strategy::random_nonoverlap;
use tessera_core::{Dataset, EdgePartitionMap, GraphIndex};

fn bench_retention(c: &mut Criterion) {
    // Ring of 2000 nodes, plus chords that close triangles and squares
    let mut b = Dataset::builder();
    for i in 0..2000 {
        let s = format!("node_{}", i);
        b.add(&s, "next", &format!("node_{}", (i + 1) % 2000));
        if i % 3 == 0 {
            b.add(&format!("node_{}", (i + 2) % 2000), "back", &s);
        }
        if i % 5 == 0 {
            b.add(&format!("node_{}", (i + 3) % 2000), "loop", &s);
        }
    }
    let ds = b.build().0;
    let index = GraphIndex::build(ds.triples());
    let parts = random_nonoverlap(ds.triples(), 500, 42);
    let map = EdgePartitionMap::build(&parts);

    let config = RetentionConfig {
        pt_sample_ratio: 1.0,
        c3_sample_ratio: 1.0,
        c4_sample_ratio: 1.0,
        ..Default::default()
    };

    c.bench_function("retention_ring_2000_nodes", |b| {
        b.iter(|| evaluate(black_box(&index), black_box(&map), black_box(&config)))
    });
}

criterion_group!(benches, bench_retention);
criterion_main!(benches);
