//! Greedy community detection.
//!
//! A simplified, single-level Louvain: nodes repeatedly move to the
//! neighboring community they share the most edge weight with. There is no
//! modularity-gain computation and no graph coarsening.

use super::neighbors::Neighbors;
use super::pack::{largest_first, pack_groups};
use super::{into_partitions, Partition};
use crate::Triple;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

/// Upper bound on node-moving passes.
pub const MAX_PASSES: usize = 5;

/// Detect communities, assign each edge to its head's community, then pack
/// communities into partitions of at most `max_edges_per_part` triples.
pub fn louvain(triples: &[Triple], max_edges_per_part: usize, seed: u64) -> Vec<Partition> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let graph = Neighbors::build(triples);

    let community = detect(&graph, &mut rng);

    // community id -> edges, in order of first appearance
    let mut slot_of: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<Vec<Triple>> = Vec::new();
    for t in triples {
        let c = community[t.head.index()];
        let slot = *slot_of.entry(c).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(*t);
    }

    debug!(communities = groups.len(), "louvain grouped edges");
    largest_first(&mut groups);
    into_partitions(pack_groups(groups, max_edges_per_part, None))
}

/// Community label per dense node index.
fn detect(graph: &Neighbors, rng: &mut ChaCha8Rng) -> Vec<usize> {
    let mut community: Vec<usize> = (0..graph.bound()).collect();
    let mut order = graph.nodes().to_vec();
    let mut weight_to: Vec<(usize, usize)> = Vec::new();
    let mut slot: HashMap<usize, usize> = HashMap::new();

    for pass in 1..=MAX_PASSES {
        order.shuffle(rng);
        let mut moved = 0usize;

        for &node in &order {
            // aggregate weight per neighboring community, first reached first
            weight_to.clear();
            slot.clear();
            for &(n, w) in graph.of(node) {
                let c = community[n.index()];
                match slot.entry(c) {
                    Entry::Occupied(e) => weight_to[*e.get()].1 += w,
                    Entry::Vacant(e) => {
                        e.insert(weight_to.len());
                        weight_to.push((c, w));
                    }
                }
            }

            let mut best: Option<(usize, usize)> = None;
            for &(c, w) in &weight_to {
                if best.map_or(true, |(_, bw)| w > bw) {
                    best = Some((c, w));
                }
            }
            let Some((best, _)) = best else { continue };

            if best != community[node.index()] {
                community[node.index()] = best;
                moved += 1;
            }
        }

        debug!(pass, moved, "louvain pass");
        if moved == 0 {
            break;
        }
    }
    community
}
