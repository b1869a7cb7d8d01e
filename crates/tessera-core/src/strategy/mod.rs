//! Partitioning strategies.
//!
//! Every strategy is a pure function of `(triples, config, seed)` that
//! returns a list of partitions covering every input triple at least once.
//! Partitions may overlap. Randomness always flows through a
//! [`ChaCha8Rng`](rand_chacha::ChaCha8Rng) seeded by the caller, so a fixed
//! seed and input reproduce the same partitions.
//!
//! | Strategy | Overlap | Idea |
//! |----------|---------|------|
//! | [`random_nonoverlap`] | none | shuffle, then fixed-size chunks |
//! | [`random_multi`] | k-fold | k independent random splits |
//! | [`edge_cut`] | none | greedy vertex assignment, edge follows head |
//! | [`vertex_cut`] | none (vertices replicate) | greedy edge placement minimizing new replicas |
//! | [`louvain`] | none | greedy community moves, then bin-packing |
//! | [`hub_replication`] | hub edges everywhere | split regular edges, copy hub edges into every partition |
//! | [`bfs_expansion`] | neighborhoods overlap | radius-bounded neighborhoods packed into partitions |
//! | [`relation_centric`] | none | group by relation, then bin-packing |

mod bfs;
mod edge_cut;
mod hub;
mod louvain;
mod neighbors;
mod pack;
mod random;
mod relation;
mod vertex_cut;

pub use bfs::bfs_expansion;
pub use edge_cut::edge_cut;
pub use hub::{hub_replication, next_threshold, HubReplication, HubReport, MAX_THRESHOLD_ROUNDS};
pub use louvain::{louvain, MAX_PASSES};
pub use random::{random_multi, random_nonoverlap};
pub use relation::relation_centric;
pub use vertex_cut::vertex_cut;

use crate::{EntityId, Error, Result, Triple};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Knobs shared by all strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionConfig {
    /// Size cap: drives `k` for the cut strategies and the flush threshold
    /// for the packing strategies.
    pub max_edges_per_part: usize,
    /// Seed for every strategy's generator.
    pub seed: u64,
    /// Initial hub degree cutoff (raised adaptively).
    pub hub_threshold: usize,
    /// Hop bound for BFS expansion.
    pub bfs_radius: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            max_edges_per_part: 100_000,
            seed: 2025,
            hub_threshold: 50,
            bfs_radius: 2,
        }
    }
}

impl PartitionConfig {
    /// Reject values no strategy can work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_edges_per_part == 0 {
            return Err(Error::InvalidConfig(
                "max_edges_per_part must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// `ceil(n / max_edges_per_part)`, never less than 1.
    pub fn target_parts(&self, n: usize) -> usize {
        n.div_ceil(self.max_edges_per_part.max(1)).max(1)
    }

    /// Upper bound on partitions for the overlapping strategies:
    /// `floor(3 * n / max_edges_per_part)`, never less than 1.
    pub fn partition_budget(&self, n: usize) -> usize {
        (3 * n / self.max_edges_per_part.max(1)).max(1)
    }
}

/// One sub-graph produced by a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Position in the strategy's result list.
    pub id: usize,
    /// Triples in placement order.
    pub triples: Vec<Triple>,
}

impl Partition {
    /// Create a partition.
    pub fn new(id: usize, triples: Vec<Triple>) -> Self {
        Self { id, triples }
    }

    /// Number of triples (counting repeats).
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// True when the partition holds no triples.
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Distinct entities touched by this partition's edges.
    pub fn nodes(&self) -> HashSet<EntityId> {
        self.triples
            .iter()
            .flat_map(|t| [t.head, t.tail])
            .collect()
    }
}

/// Number a list of triple chunks as partitions `0..n`.
pub(crate) fn into_partitions(chunks: Vec<Vec<Triple>>) -> Vec<Partition> {
    chunks
        .into_iter()
        .enumerate()
        .map(|(id, triples)| Partition::new(id, triples))
        .collect()
}

/// Triples of `triples` that appear in none of `partitions`.
pub fn uncovered(triples: &[Triple], partitions: &[Partition]) -> Vec<Triple> {
    let placed: HashSet<&Triple> = partitions.iter().flat_map(|p| &p.triples).collect();
    triples
        .iter()
        .filter(|t| !placed.contains(t))
        .copied()
        .collect()
}

/// A strategy's output, labeled for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partitioning {
    /// Run label, also the output directory name.
    pub name: String,
    /// The partitions.
    pub partitions: Vec<Partition>,
    /// True when the strategy gave up on its own heuristic and fell back
    /// to a random split.
    pub fallback: bool,
}

/// The closed set of partitioning strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Shuffle and chunk.
    RandomNonOverlap,
    /// `repeats` random splits concatenated.
    RandomMulti {
        /// Number of independent splits.
        repeats: usize,
    },
    /// Greedy balanced k-way edge-cut.
    EdgeCut,
    /// Greedy PowerGraph-style vertex-cut.
    VertexCut,
    /// Greedy community detection plus bin-packing.
    Louvain,
    /// Adaptive hub replication.
    HubReplication {
        /// Initial hub degree cutoff.
        threshold: usize,
    },
    /// Radius-bounded BFS neighborhoods.
    BfsExpansion {
        /// Hop bound.
        radius: usize,
    },
    /// Group by relation plus bin-packing.
    RelationCentric,
}

impl Strategy {
    /// The full comparison suite, in reporting order.
    pub fn all(cfg: &PartitionConfig) -> Vec<Self> {
        vec![
            Self::RandomNonOverlap,
            Self::RandomMulti { repeats: 2 },
            Self::RandomMulti { repeats: 3 },
            Self::EdgeCut,
            Self::VertexCut,
            Self::Louvain,
            Self::HubReplication {
                threshold: cfg.hub_threshold,
            },
            Self::BfsExpansion {
                radius: cfg.bfs_radius,
            },
            Self::RelationCentric,
        ]
    }

    /// Run label, e.g. `random_multi_k2` or `bfs_expansion_r2`.
    pub fn name(&self) -> String {
        match self {
            Self::RandomNonOverlap => "random_nonoverlap".into(),
            Self::RandomMulti { repeats } => format!("random_multi_k{repeats}"),
            Self::EdgeCut => "edge_cut".into(),
            Self::VertexCut => "vertex_cut".into(),
            Self::Louvain => "louvain".into(),
            Self::HubReplication { threshold } => format!("hub_replication_t{threshold}"),
            Self::BfsExpansion { radius } => format!("bfs_expansion_r{radius}"),
            Self::RelationCentric => "relation_centric".into(),
        }
    }

    /// Reject parameter values the strategy cannot run with.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::RandomMulti { repeats: 0 } => Err(Error::InvalidConfig(
                "random_multi needs at least one repeat".into(),
            )),
            _ => Ok(()),
        }
    }

    /// Partition `triples`.
    pub fn run(&self, triples: &[Triple], cfg: &PartitionConfig) -> Partitioning {
        let max = cfg.max_edges_per_part;
        let mut fallback = false;
        let partitions = match *self {
            Self::RandomNonOverlap => random_nonoverlap(triples, max, cfg.seed),
            Self::RandomMulti { repeats } => random_multi(triples, max, repeats, cfg.seed),
            Self::EdgeCut => edge_cut(triples, cfg),
            Self::VertexCut => vertex_cut(triples, cfg),
            Self::Louvain => louvain(triples, max, cfg.seed),
            Self::HubReplication { threshold } => {
                let outcome = hub_replication(triples, max, threshold, cfg.seed);
                fallback = !outcome.report.converged;
                outcome.partitions
            }
            Self::BfsExpansion { radius } => bfs_expansion(triples, max, radius, cfg.seed),
            Self::RelationCentric => relation_centric(triples, max, cfg.seed),
        };
        Partitioning {
            name: self.name(),
            partitions,
            fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dataset;

    #[test]
    fn test_target_parts_and_budget() {
        let cfg = PartitionConfig {
            max_edges_per_part: 10,
            ..Default::default()
        };
        assert_eq!(cfg.target_parts(0), 1);
        assert_eq!(cfg.target_parts(10), 1);
        assert_eq!(cfg.target_parts(11), 2);
        assert_eq!(cfg.partition_budget(3), 1);
        assert_eq!(cfg.partition_budget(25), 7);
    }

    #[test]
    fn test_validate_rejects_zero_cap() {
        let cfg = PartitionConfig {
            max_edges_per_part: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));
        assert!(PartitionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_repeats_rejected() {
        assert!(Strategy::RandomMulti { repeats: 0 }.validate().is_err());
        assert!(Strategy::RandomMulti { repeats: 2 }.validate().is_ok());
        assert!(Strategy::Louvain.validate().is_ok());
    }

    #[test]
    fn test_names() {
        let cfg = PartitionConfig::default();
        let names: Vec<String> = Strategy::all(&cfg).iter().map(Strategy::name).collect();
        assert_eq!(
            names,
            vec![
                "random_nonoverlap",
                "random_multi_k2",
                "random_multi_k3",
                "edge_cut",
                "vertex_cut",
                "louvain",
                "hub_replication_t50",
                "bfs_expansion_r2",
                "relation_centric",
            ]
        );
    }

    #[test]
    fn test_every_strategy_covers_small_graph() {
        let ds = Dataset::from_names([
            ("a", "r", "b"),
            ("b", "r", "c"),
            ("c", "s", "a"),
            ("c", "s", "d"),
            ("d", "t", "e"),
            ("e", "t", "a"),
            ("f", "r", "f"),
        ]);
        let cfg = PartitionConfig {
            max_edges_per_part: 3,
            hub_threshold: 2,
            bfs_radius: 1,
            seed: 7,
        };
        for strategy in Strategy::all(&cfg) {
            let result = strategy.run(ds.triples(), &cfg);
            assert!(
                uncovered(ds.triples(), &result.partitions).is_empty(),
                "{} dropped triples",
                result.name
            );
            for (i, p) in result.partitions.iter().enumerate() {
                assert_eq!(p.id, i);
            }
        }
    }

    #[test]
    fn test_partition_nodes() {
        let ds = Dataset::from_names([("a", "r", "b"), ("b", "r", "a"), ("b", "r", "c")]);
        let p = Partition::new(0, ds.triples().to_vec());
        assert_eq!(p.nodes().len(), 3);
        assert_eq!(p.len(), 3);
    }
}
