//! Greedy PowerGraph-style vertex-cut.

use super::neighbors::first_min;
use super::{into_partitions, Partition, PartitionConfig};
use crate::{EntityId, Triple};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use tracing::debug;

const IMBALANCE_WEIGHT: f64 = 0.01;

/// Place every edge in exactly one of `k = ceil(n / max_edges_per_part)`
/// partitions, letting vertices replicate.
///
/// Edges are visited in shuffled order. The cost of a partition is the
/// number of endpoints not yet replicated there, plus
/// `0.01 * |load - mean load|`. The cheapest partition wins, lowest index
/// on ties, and both endpoints become replicated into it.
pub fn vertex_cut(triples: &[Triple], cfg: &PartitionConfig) -> Vec<Partition> {
    let k = cfg.target_parts(triples.len());
    let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);

    let mut edges = triples.to_vec();
    edges.shuffle(&mut rng);

    let mut replicas: HashSet<(EntityId, usize)> = HashSet::new();
    let mut parts: Vec<Vec<Triple>> = vec![Vec::new(); k];
    let mut placed = 0usize;

    for t in edges {
        let mean = placed as f64 / k as f64;
        let chosen = first_min(k, |i| {
            let missing = usize::from(!replicas.contains(&(t.head, i)))
                + usize::from(!replicas.contains(&(t.tail, i)));
            missing as f64 + IMBALANCE_WEIGHT * (parts[i].len() as f64 - mean).abs()
        });
        parts[chosen].push(t);
        replicas.insert((t.head, chosen));
        replicas.insert((t.tail, chosen));
        placed += 1;
    }

    debug!(k, replicas = replicas.len(), "vertex_cut placed edges");
    into_partitions(parts)
}
