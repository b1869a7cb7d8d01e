//! Greedy balanced k-way edge-cut.

use super::neighbors::{first_max, Neighbors};
use super::{into_partitions, Partition, PartitionConfig};
use crate::Triple;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Weight of partition load against neighbor affinity.
const BALANCE_WEIGHT: f64 = 0.1;

/// Assign vertices to `k = ceil(n / max_edges_per_part)` partitions, then
/// place each edge with its head.
///
/// Vertices are visited in shuffled order. Each goes to the partition
/// maximizing `neighbors_already_there - 0.1 * load`, where a partition's
/// load grows by the distinct neighbor count of every vertex it receives. Ties go
/// to the lowest index. The result always has exactly `k` partitions, some
/// of which may be empty.
pub fn edge_cut(triples: &[Triple], cfg: &PartitionConfig) -> Vec<Partition> {
    let k = cfg.target_parts(triples.len());
    let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);

    let graph = Neighbors::build(triples);
    let mut order = graph.nodes().to_vec();
    order.shuffle(&mut rng);

    let mut owner: Vec<Option<usize>> = vec![None; graph.bound()];
    let mut load = vec![0usize; k];
    let mut affinity = vec![0usize; k];

    for node in order {
        affinity.fill(0);
        let neighbors = graph.of(node);
        for &(n, _) in neighbors {
            if let Some(p) = owner[n.index()] {
                affinity[p] += 1;
            }
        }
        let chosen = first_max(k, |i| affinity[i] as f64 - BALANCE_WEIGHT * load[i] as f64);
        owner[node.index()] = Some(chosen);
        load[chosen] += neighbors.len();
    }

    let mut parts = vec![Vec::new(); k];
    for t in triples {
        let pid = owner[t.head.index()]
            .or(owner[t.tail.index()])
            .unwrap_or_else(|| rng.gen_range(0..k));
        parts[pid].push(*t);
    }

    debug!(k, loads = ?load, "edge_cut assigned vertices");
    into_partitions(parts)
}
