use crate::{EntityId, RelationId, Triple};
use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Read-only adjacency view over the full triple set.
///
/// Built once per input graph and shared by every retention evaluation.
/// Adjacency lists are dense tables indexed by [`EntityId`]; lookups on an
/// entity the index has never seen return an empty slice.
///
/// # Example
///
/// ```rust
/// use tessera_core::{Dataset, GraphIndex};
///
/// let ds = Dataset::from_names([("a", "r", "b"), ("b", "r", "c")]);
/// let index = GraphIndex::build(ds.triples());
/// let b = ds.vocab().entity_id("b").unwrap();
///
/// assert_eq!(index.in_edges(b).len(), 1);
/// assert_eq!(index.out_edges(b).len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphIndex {
    /// head -> [(relation, tail)]
    edges_out: Vec<Vec<(RelationId, EntityId)>>,
    /// tail -> [(relation, head)]
    edges_in: Vec<Vec<(RelationId, EntityId)>>,
    edge_count: usize,
}

impl GraphIndex {
    /// Build both adjacency tables in one pass.
    pub fn build(triples: &[Triple]) -> Self {
        let bound = triples
            .iter()
            .map(|t| t.head.index().max(t.tail.index()) + 1)
            .max()
            .unwrap_or(0);

        let mut edges_out = vec![Vec::new(); bound];
        let mut edges_in = vec![Vec::new(); bound];

        for t in triples {
            edges_out[t.head.index()].push((t.relation, t.tail));
            edges_in[t.tail.index()].push((t.relation, t.head));
        }

        Self {
            edges_out,
            edges_in,
            edge_count: triples.len(),
        }
    }

    /// Outgoing `(relation, tail)` pairs of `node`.
    pub fn out_edges(&self, node: EntityId) -> &[(RelationId, EntityId)] {
        self.edges_out.get(node.index()).map(Vec::as_slice).unwrap_or_default()
    }

    /// Incoming `(relation, head)` pairs of `node`.
    pub fn in_edges(&self, node: EntityId) -> &[(RelationId, EntityId)] {
        self.edges_in.get(node.index()).map(Vec::as_slice).unwrap_or_default()
    }

    /// Out-degree of `node`.
    pub fn out_degree(&self, node: EntityId) -> usize {
        self.out_edges(node).len()
    }

    /// In-degree of `node`.
    pub fn in_degree(&self, node: EntityId) -> usize {
        self.in_edges(node).len()
    }

    /// Number of indexed edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Entities with at least one outgoing edge, ascending.
    pub fn heads(&self) -> impl Iterator<Item = EntityId> + '_ {
        non_empty_ids(&self.edges_out)
    }

    /// Entities with at least one incoming edge, ascending.
    pub fn tails(&self) -> impl Iterator<Item = EntityId> + '_ {
        non_empty_ids(&self.edges_in)
    }

    /// Every edge, grouped by head in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = Triple> + '_ {
        self.edges_out.iter().enumerate().flat_map(|(h, outs)| {
            let head = to_id(h);
            outs.iter().map(move |&(r, t)| Triple::new(head, r, t))
        })
    }

    /// Summary statistics over the indexed graph.
    pub fn stats(&self) -> GraphStats {
        let bound = self.edges_out.len();
        let mut uf = UnionFind::<usize>::new(bound);
        let mut relations = HashSet::new();
        for t in self.edges() {
            uf.union(t.head.index(), t.tail.index());
            relations.insert(t.relation);
        }

        let degree = |i: usize| self.edges_out[i].len() + self.edges_in[i].len();
        let touched: Vec<usize> = (0..bound).filter(|&i| degree(i) > 0).collect();
        let max_degree = touched.iter().map(|&i| degree(i)).max().unwrap_or(0);

        let labels = uf.into_labeling();
        let components: HashSet<usize> = touched.iter().map(|&i| labels[i]).collect();

        let entity_count = touched.len();
        let triple_count = self.edge_count();
        GraphStats {
            entity_count,
            triple_count,
            relation_count: relations.len(),
            avg_degree: if entity_count > 0 {
                2.0 * triple_count as f64 / entity_count as f64
            } else {
                0.0
            },
            max_degree,
            weak_components: components.len(),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_id(i: usize) -> EntityId {
    EntityId(i as u32)
}

fn non_empty_ids(table: &[Vec<(RelationId, EntityId)>]) -> impl Iterator<Item = EntityId> + '_ {
    table
        .iter()
        .enumerate()
        .filter(|(_, adj)| !adj.is_empty())
        .map(|(i, _)| to_id(i))
}

/// Statistics about an indexed graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Entities touched by at least one edge.
    pub entity_count: usize,
    /// Distinct edges.
    pub triple_count: usize,
    /// Distinct relation types.
    pub relation_count: usize,
    /// Mean total (in + out) degree.
    pub avg_degree: f64,
    /// Largest total degree.
    pub max_degree: usize,
    /// Weakly connected components.
    pub weak_components: usize,
}
