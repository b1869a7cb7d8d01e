//! End-to-end behavior on small hand-built graphs.

use tessera_core::retention::{cycle3, cycle4, evaluate, RetentionConfig};
use tessera_core::strategy::{edge_cut, hub_replication, next_threshold, random_nonoverlap};
use tessera_core::{
    Dataset, EdgePartitionMap, GraphIndex, PartitionConfig, Runner, Strategy, StrategyMetrics,
};

fn no_sampling() -> RetentionConfig {
    RetentionConfig {
        pt_sample_ratio: 1.0,
        c3_sample_ratio: 1.0,
        c4_sample_ratio: 1.0,
        ..Default::default()
    }
}

#[test]
fn test_single_triangle_is_kept_whole() {
    let ds = Dataset::from_names([("n1", "r", "n2"), ("n2", "r", "n3"), ("n3", "r", "n1")]);

    let parts = random_nonoverlap(ds.triples(), 10, 2025);
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].len(), 3);

    let index = GraphIndex::build(ds.triples());
    let map = EdgePartitionMap::build(&parts);
    let c3 = cycle3(&index, &map, &no_sampling());
    assert_eq!((c3.kept, c3.total), (1, 1));
    assert_eq!(c3.ratio(), 1.0);
}

#[test]
fn test_disjoint_triangles_under_edge_cut() {
    let ds = Dataset::from_names([
        ("a", "r", "b"),
        ("b", "r", "c"),
        ("c", "r", "a"),
        ("x", "r", "y"),
        ("y", "r", "z"),
        ("z", "r", "x"),
    ]);
    let cfg = PartitionConfig {
        max_edges_per_part: 3,
        ..Default::default()
    };

    let parts = edge_cut(ds.triples(), &cfg);
    assert_eq!(parts.len(), 2);
    assert!(parts.iter().all(|p| p.len() == 3));

    let index = GraphIndex::build(ds.triples());
    let map = EdgePartitionMap::build(&parts);
    let report = evaluate(&index, &map, &no_sampling());
    assert_eq!((report.c3.count.kept, report.c3.count.total), (2, 2));
    assert_eq!(report.c2.count.total, 0);
    assert_eq!(report.c4.count.total, 0);
}

#[test]
fn test_square_counts_one_four_cycle() {
    let ds = Dataset::from_names([("a", "r", "b"), ("b", "r", "c"), ("c", "r", "d"), ("d", "r", "a")]);

    let parts = random_nonoverlap(ds.triples(), 4, 7);
    assert_eq!(parts.len(), 1);

    let index = GraphIndex::build(ds.triples());
    let map = EdgePartitionMap::build(&parts);
    let c4 = cycle4(&index, &map, &no_sampling());
    assert_eq!((c4.count.kept, c4.count.total), (1, 1));
    assert!(!c4.truncated);
}

#[test]
fn test_low_hub_threshold_is_raised() {
    // "hub" has degree 8; chain interiors have degree 2
    let mut b = Dataset::builder();
    for i in 0..8 {
        b.add("hub", "r", &format!("leaf{i}"));
    }
    for i in 0..10 {
        b.add(&format!("c{i}"), "s", &format!("c{}", i + 1));
    }
    let ds = b.build().0;

    let out = hub_replication(ds.triples(), 5, 1, 2025);
    let report = &out.report;
    assert!(report.converged);

    let mut t = report.initial_threshold;
    for _ in 1..report.rounds {
        t = next_threshold(t);
    }
    assert_eq!(report.final_threshold, t);
    // 1, 2, 3, 4, 5, 7, 9
    assert_eq!(report.rounds, 7);
    assert_eq!(report.final_threshold, 9);
    assert_eq!(report.hub_edges, 0);
    assert_eq!(out.partitions.len(), 4);
}

#[test]
fn test_unreachable_hub_threshold_falls_back() {
    let mut b = Dataset::builder();
    for i in 0..200 {
        b.add("hub", "r", &format!("leaf{i}"));
    }
    let ds = b.build().0;
    let cfg = PartitionConfig {
        max_edges_per_part: 10,
        hub_threshold: 1,
        ..Default::default()
    };

    let result = Strategy::HubReplication { threshold: 1 }.run(ds.triples(), &cfg);
    assert!(result.fallback);
    assert_eq!(result.partitions.len(), 20);
    assert!(result.partitions.iter().all(|p| p.len() == 10));
}

#[test]
fn test_runner_outputs_are_reproducible() {
    let ds = || {
        Dataset::from_names([
            ("a", "r", "b"),
            ("b", "r", "c"),
            ("c", "r", "a"),
            ("a", "s", "d"),
            ("d", "s", "a"),
            ("d", "r", "e"),
            ("e", "r", "f"),
            ("f", "r", "d"),
        ])
    };
    let cfg = PartitionConfig {
        max_edges_per_part: 3,
        ..Default::default()
    };
    let strategies = Strategy::all(&cfg);

    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let a = Runner::new(ds(), cfg, no_sampling(), first.path())
        .unwrap()
        .run(&strategies, 1)
        .unwrap();
    let b = Runner::new(ds(), cfg, no_sampling(), second.path())
        .unwrap()
        .run(&strategies, 1)
        .unwrap();

    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(without_timings(x), without_timings(y));

        let rel = std::path::Path::new(&x.strategy).join("partitions");
        let files = part_files(&first.path().join(&rel));
        assert_eq!(files.len(), x.partitions, "{}", x.strategy);
        assert_eq!(files, part_files(&second.path().join(&rel)), "{}", x.strategy);
        for name in &files {
            assert_eq!(
                std::fs::read(first.path().join(&rel).join(name)).unwrap(),
                std::fs::read(second.path().join(&rel).join(name)).unwrap(),
                "{}/{}",
                x.strategy,
                name
            );
        }
    }
}

fn without_timings(m: &StrategyMetrics) -> StrategyMetrics {
    let mut m = m.clone();
    for family in [&mut m.details.pt, &mut m.details.c2, &mut m.details.c3, &mut m.details.c4] {
        family.time_sec = 0.0;
    }
    m
}

fn part_files(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
