//! Short directed cycles: lengths 2, 3 and 4.
//!
//! A 3- or 4-cycle is found once from every node on it. It is counted only
//! from its canonical rotation: the smallest, as a sequence of triples, of
//! the rotations whose non-anchor nodes all pass the degree cap. Whether a
//! cycle counts therefore depends on the triple set and the cap, never on
//! how entity ids were assigned.

use super::{Count, Progress, RetentionConfig, Sampler};
use crate::edge_map::{shares_partition, EdgePartitionMap};
use crate::{EntityId, GraphIndex, RelationId, Triple};
use smallvec::SmallVec;
use std::collections::HashMap;
use tracing::info;

const C3_STREAM: u64 = 2;
const C4_STREAM: u64 = 3;
const C2_PROGRESS_EVERY: usize = 10_000;
const C3_PROGRESS_EVERY: usize = 5000;

/// Count pairs `(h, r, t)`, `(t, r2, h)`.
///
/// Every edge is paired with every reverse edge, so a reciprocal pair is
/// counted once from each side and a self-loop pairs with each self-loop on
/// its node, itself included.
pub fn cycle2(index: &GraphIndex, map: &EdgePartitionMap, cfg: &RetentionConfig) -> Count {
    let mut relations: HashMap<(EntityId, EntityId), SmallVec<[RelationId; 2]>> = HashMap::new();
    for t in index.edges() {
        relations.entry((t.head, t.tail)).or_default().push(t.relation);
    }

    let progress = Progress::new("C2", C2_PROGRESS_EVERY, cfg.verbose, index.edge_count());
    let mut count = Count::default();

    for (processed, e1) in index.edges().enumerate() {
        progress.tick(processed + 1, count);
        let Some(back) = relations.get(&e1.reversed_endpoints()) else {
            continue;
        };
        let first = map.partitions_of(&e1);
        for &r2 in back {
            let second = map.partitions_of(&Triple::new(e1.tail, r2, e1.head));
            count.record(shares_partition(&[first, second]));
        }
    }

    progress.finish(count);
    count
}

/// True when no other rotation of `walk` that passes the degree cap sorts
/// before it. `walk[0].head` is the anchor; the cap applies to the rest.
fn is_canonical(walk: &[Triple], index: &GraphIndex, cap: usize) -> bool {
    let n = walk.len();
    (1..n).all(|shift| {
        let passes = (0..n)
            .filter(|&j| j != shift)
            .all(|j| index.out_degree(walk[j].head) <= cap);
        !passes || (0..n).map(|j| walk[(j + shift) % n]).ge(walk.iter().copied())
    })
}

/// Count triangles `a -> b -> c -> a` over sampled anchors `a`.
///
/// `b` and `c` are skipped when their out-degree exceeds `c3_degree_cap`.
/// A first edge that no partition holds is skipped without being counted.
/// Each triangle is counted from its canonical rotation only.
pub fn cycle3(index: &GraphIndex, map: &EdgePartitionMap, cfg: &RetentionConfig) -> Count {
    let cap = cfg.c3_degree_cap;
    let mut sampler = Sampler::new(cfg.seed, C3_STREAM, cfg.c3_sample_ratio);
    let progress = Progress::new("C3", C3_PROGRESS_EVERY, cfg.verbose, index.heads().count());
    let mut count = Count::default();
    let mut processed = 0usize;

    for a in index.heads() {
        if !sampler.keep() {
            continue;
        }
        processed += 1;
        progress.tick(processed, count);

        for &(r1, b) in index.out_edges(a) {
            let out_b = index.out_edges(b);
            if out_b.len() > cap {
                continue;
            }
            let p1 = map.partitions_of(&Triple::new(a, r1, b));
            if p1.is_empty() {
                continue;
            }
            for &(r2, c) in out_b {
                let out_c = index.out_edges(c);
                if out_c.len() > cap {
                    continue;
                }
                let p2 = map.partitions_of(&Triple::new(b, r2, c));
                for &(r3, back) in out_c {
                    if back != a {
                        continue;
                    }
                    let walk = [Triple::new(a, r1, b), Triple::new(b, r2, c), Triple::new(c, r3, a)];
                    if !is_canonical(&walk, index, cap) {
                        continue;
                    }
                    let p3 = map.partitions_of(&walk[2]);
                    count.record(shares_partition(&[p1, p2, p3]));
                }
            }
        }
    }

    progress.finish(count);
    count
}

/// A C4 count and whether it hit `c4_max_cycles`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct C4Outcome {
    /// Kept / total.
    pub count: Count,
    /// Enumeration stopped early at the ceiling.
    pub truncated: bool,
}

/// Count 4-cycles `a -> b -> c -> d -> a` over sampled anchors `a`.
///
/// `b`, `c` and `d` are skipped when their out-degree exceeds
/// `c4_degree_cap`, and each cycle is counted from its canonical rotation.
/// Enumeration returns as soon as `total` reaches `c4_max_cycles`; a
/// ceiling of 0 therefore stops after the first instance.
pub fn cycle4(index: &GraphIndex, map: &EdgePartitionMap, cfg: &RetentionConfig) -> C4Outcome {
    let cap = cfg.c4_degree_cap;
    let mut sampler = Sampler::new(cfg.seed, C4_STREAM, cfg.c4_sample_ratio);
    let progress = Progress::new(
        "C4",
        cfg.c4_progress_interval,
        cfg.verbose,
        index.heads().count(),
    );
    let mut count = Count::default();
    let mut processed = 0usize;

    for a in index.heads() {
        if !sampler.keep() {
            continue;
        }
        processed += 1;
        progress.tick(processed, count);

        for &(r1, b) in index.out_edges(a) {
            let out_b = index.out_edges(b);
            if out_b.len() > cap {
                continue;
            }
            let p1 = map.partitions_of(&Triple::new(a, r1, b));
            if p1.is_empty() {
                continue;
            }
            for &(r2, c) in out_b {
                let out_c = index.out_edges(c);
                if out_c.len() > cap {
                    continue;
                }
                let p2 = map.partitions_of(&Triple::new(b, r2, c));
                for &(r3, d) in out_c {
                    let out_d = index.out_edges(d);
                    if out_d.len() > cap {
                        continue;
                    }
                    let p3 = map.partitions_of(&Triple::new(c, r3, d));
                    for &(r4, back) in out_d {
                        if back != a {
                            continue;
                        }
                        let walk = [
                            Triple::new(a, r1, b),
                            Triple::new(b, r2, c),
                            Triple::new(c, r3, d),
                            Triple::new(d, r4, a),
                        ];
                        if !is_canonical(&walk, index, cap) {
                            continue;
                        }
                        let p4 = map.partitions_of(&walk[3]);
                        count.record(shares_partition(&[p1, p2, p3, p4]));
                        if count.total >= cfg.c4_max_cycles {
                            if cfg.verbose {
                                info!(
                                    max_cycles = cfg.c4_max_cycles,
                                    kept = count.kept,
                                    total = count.total,
                                    "C4 reached its instance ceiling, stopping early"
                                );
                            }
                            return C4Outcome {
                                count,
                                truncated: true,
                            };
                        }
                    }
                }
            }
        }
    }

    progress.finish(count);
    C4Outcome {
        count,
        truncated: false,
    }
}
