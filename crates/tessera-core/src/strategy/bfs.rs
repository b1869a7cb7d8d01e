//! Radius-bounded BFS neighborhoods.

use super::{into_partitions, Partition};
use crate::{EntityId, Triple};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, warn};

/// Fraction of nodes that, once covered, ends seed expansion.
const COVERAGE_STOP: f64 = 0.95;

/// Grow a neighborhood around each uncovered seed node and pack the
/// neighborhoods into partitions.
///
/// Every edge incident to a node reached within `radius` hops is collected,
/// so an edge may reach one hop past the radius; at least one endpoint of
/// each collected edge is within `radius` of the seed. Neighborhoods merge
/// into an open buffer while it stays within `max_edges_per_part`.
/// Neighborhoods overlap, so a triple may appear in several partitions (and
/// twice in one merged buffer).
///
/// Expansion stops once 95% of nodes are covered, or when the partition
/// count reaches `max(1, 3 * n / max_edges_per_part)`; in the latter case
/// the open buffer is merged into the last partition. Triples no
/// neighborhood reached are appended to the last partition when they fit,
/// otherwise they form one final partition.
pub fn bfs_expansion(
    triples: &[Triple],
    max_edges_per_part: usize,
    radius: usize,
    seed: u64,
) -> Vec<Partition> {
    let max = max_edges_per_part.max(1);
    let budget = (3 * triples.len() / max).max(1);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let graph = Incidence::build(triples);
    let mut order = graph.nodes.clone();
    order.shuffle(&mut rng);

    let mut coverage = Coverage::new(graph.incident.len());
    let stop_at = COVERAGE_STOP * graph.nodes.len() as f64;
    let mut parts: Vec<Vec<Triple>> = Vec::new();
    let mut current: Vec<Triple> = Vec::new();

    for start in order {
        if coverage.contains(start) {
            continue;
        }
        let hood = graph.neighborhood(start, radius, &mut coverage);

        if current.len() + hood.len() <= max {
            current.extend(hood);
        } else {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            if hood.len() > max {
                parts.extend(hood.chunks(max).map(<[Triple]>::to_vec));
            } else {
                current = hood;
            }
        }

        if parts.len() >= budget {
            warn!(budget, "bfs_expansion reached its partition budget, stopping early");
            if !current.is_empty() {
                match parts.last_mut() {
                    Some(last) => last.append(&mut current),
                    None => parts.push(std::mem::take(&mut current)),
                }
            }
            break;
        }
        if coverage.count as f64 >= stop_at {
            break;
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }

    let placed: HashSet<Triple> = parts.iter().flatten().copied().collect();
    let mut remaining: Vec<Triple> = triples
        .iter()
        .filter(|t| !placed.contains(t))
        .copied()
        .collect();
    debug!(
        partitions = parts.len(),
        covered_nodes = coverage.count,
        remaining = remaining.len(),
        "bfs_expansion packed neighborhoods"
    );
    if !remaining.is_empty() {
        match parts.last_mut() {
            Some(last) if last.len() + remaining.len() <= max => last.append(&mut remaining),
            _ => parts.push(remaining),
        }
    }

    into_partitions(parts)
}

/// Nodes reached by any expansion so far.
struct Coverage {
    seen: Vec<bool>,
    count: usize,
}

impl Coverage {
    fn new(bound: usize) -> Self {
        Self {
            seen: vec![false; bound],
            count: 0,
        }
    }

    fn contains(&self, node: EntityId) -> bool {
        self.seen[node.index()]
    }

    fn insert(&mut self, node: EntityId) {
        if !self.seen[node.index()] {
            self.seen[node.index()] = true;
            self.count += 1;
        }
    }
}

/// Incident edges per node, both directions.
struct Incidence {
    nodes: Vec<EntityId>,
    incident: Vec<Vec<Triple>>,
}

impl Incidence {
    fn build(triples: &[Triple]) -> Self {
        let bound = triples
            .iter()
            .map(|t| t.head.index().max(t.tail.index()) + 1)
            .max()
            .unwrap_or(0);
        let mut incident = vec![Vec::new(); bound];
        let mut nodes = Vec::new();
        for t in triples {
            for node in [t.head, t.tail] {
                let row: &mut Vec<Triple> = &mut incident[node.index()];
                if row.is_empty() {
                    nodes.push(node);
                }
                row.push(*t);
            }
        }
        Self { nodes, incident }
    }

    /// Edges around `start`, in discovery order without repeats.
    fn neighborhood(&self, start: EntityId, radius: usize, coverage: &mut Coverage) -> Vec<Triple> {
        let mut edges = Vec::new();
        let mut seen_edges = HashSet::new();
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0usize)]);

        while let Some((node, dist)) = queue.pop_front() {
            coverage.insert(node);
            let around = &self.incident[node.index()];
            edges.extend(around.iter().filter(|t| seen_edges.insert(**t)).copied());

            if dist < radius {
                for t in around {
                    for next in [t.head, t.tail] {
                        if visited.insert(next) {
                            queue.push_back((next, dist + 1));
                        }
                    }
                }
            }
        }
        edges
    }
}
