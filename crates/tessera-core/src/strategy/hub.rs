//! Adaptive hub replication.
//!
//! A node is a hub when its total degree reaches the threshold. Every edge
//! touching a hub is copied into every partition, and the remaining edges
//! are shuffled and sliced evenly across partitions. When the hub edges
//! alone would fill a partition, or the slicing would need more partitions
//! than the budget allows, the threshold is raised and the split retried.

use super::random::shuffled_chunks;
use super::{into_partitions, Partition};
use crate::Triple;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Threshold adjustments tried before falling back to a random split.
pub const MAX_THRESHOLD_ROUNDS: usize = 20;

/// Raise a hub threshold by 20%, plus one: `floor(t * 1.2) + 1`.
///
/// ```rust
/// use tessera_core::strategy::next_threshold;
///
/// assert_eq!(next_threshold(1), 2);
/// assert_eq!(next_threshold(5), 7);
/// assert_eq!(next_threshold(50), 61);
/// ```
pub const fn next_threshold(threshold: usize) -> usize {
    threshold * 6 / 5 + 1
}

/// How the threshold search went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubReport {
    /// Threshold the search started from.
    pub initial_threshold: usize,
    /// Threshold in effect when the search ended.
    pub final_threshold: usize,
    /// Rounds evaluated.
    pub rounds: usize,
    /// False when the split fell back to random chunks.
    pub converged: bool,
    /// Hub nodes at the final threshold.
    pub hubs: usize,
    /// Edges replicated into every partition.
    pub hub_edges: usize,
    /// Edges sliced across partitions.
    pub regular_edges: usize,
}

/// Partitions plus the search report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubReplication {
    /// Resulting partitions.
    pub partitions: Vec<Partition>,
    /// Threshold search outcome.
    pub report: HubReport,
}

/// Split `triples` with hub edges replicated into every partition.
///
/// On success each partition holds a slice of the regular edges followed by
/// the full hub edge list, in the same order everywhere. If no threshold
/// within [`MAX_THRESHOLD_ROUNDS`] rounds satisfies both constraints, a
/// warning is logged and the result is a plain random split.
pub fn hub_replication(
    triples: &[Triple],
    max_edges_per_part: usize,
    threshold: usize,
    seed: u64,
) -> HubReplication {
    let max = max_edges_per_part.max(1);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let bound = triples
        .iter()
        .map(|t| t.head.index().max(t.tail.index()) + 1)
        .max()
        .unwrap_or(0);
    let mut degree = vec![0usize; bound];
    for t in triples {
        degree[t.head.index()] += 1;
        degree[t.tail.index()] += 1;
    }
    let max_total_parts = (3 * triples.len() / max).max(1);

    let mut report = HubReport {
        initial_threshold: threshold,
        final_threshold: threshold,
        rounds: 0,
        converged: false,
        hubs: 0,
        hub_edges: 0,
        regular_edges: 0,
    };
    let mut current = threshold;

    while report.rounds < MAX_THRESHOLD_ROUNDS {
        report.rounds += 1;
        report.final_threshold = current;

        let is_hub = |i: usize| degree[i] >= current;
        let (hub_edges, mut regular): (Vec<Triple>, Vec<Triple>) = triples
            .iter()
            .partition(|t| is_hub(t.head.index()) || is_hub(t.tail.index()));
        report.hubs = (0..bound).filter(|&i| degree[i] > 0 && is_hub(i)).count();
        report.hub_edges = hub_edges.len();
        report.regular_edges = regular.len();

        if hub_edges.len() >= max {
            debug!(
                round = report.rounds,
                threshold = current,
                hub_edges = hub_edges.len(),
                max,
                "hub edges fill a partition, raising threshold"
            );
            current = next_threshold(current);
            continue;
        }

        let slice = max - hub_edges.len();
        let n_parts = regular.len().div_ceil(slice).max(1);
        if n_parts > max_total_parts {
            debug!(
                round = report.rounds,
                threshold = current,
                n_parts,
                max_total_parts,
                "too many partitions, raising threshold"
            );
            current = next_threshold(current);
            continue;
        }

        report.converged = true;
        debug!(
            from = threshold,
            to = current,
            hubs = report.hubs,
            hub_edges = report.hub_edges,
            regular_edges = report.regular_edges,
            n_parts,
            "hub threshold converged"
        );

        regular.shuffle(&mut rng);
        let chunks = (0..n_parts)
            .map(|i| {
                let start = (i * slice).min(regular.len());
                let end = (start + slice).min(regular.len());
                let mut part = regular[start..end].to_vec();
                part.extend_from_slice(&hub_edges);
                part
            })
            .collect();
        return HubReplication {
            partitions: into_partitions(chunks),
            report,
        };
    }

    warn!(
        rounds = MAX_THRESHOLD_ROUNDS,
        initial = threshold,
        last = current,
        "hub replication did not converge, falling back to random partitioning"
    );
    HubReplication {
        partitions: into_partitions(shuffled_chunks(triples, max, &mut rng)),
        report,
    }
}
