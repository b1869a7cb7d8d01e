use crate::{EntityId, Triple};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Undirected, weighted view of a triple list used by the structural
/// strategies.
///
/// Nodes and each node's neighbors are kept in order of first appearance so
/// that everything derived from them is reproducible. A self-loop links a
/// node to itself with weight 2.
#[derive(Debug, Clone, Default)]
pub(crate) struct Neighbors {
    nodes: Vec<EntityId>,
    adj: Vec<Vec<(EntityId, usize)>>,
}

impl Neighbors {
    pub(crate) fn build(triples: &[Triple]) -> Self {
        let bound = triples
            .iter()
            .map(|t| t.head.index().max(t.tail.index()) + 1)
            .max()
            .unwrap_or(0);

        let mut this = Self {
            nodes: Vec::new(),
            adj: vec![Vec::new(); bound],
        };
        let mut seen = vec![false; bound];
        let mut slots: HashMap<(EntityId, EntityId), usize> = HashMap::new();

        for t in triples {
            for node in [t.head, t.tail] {
                if !seen[node.index()] {
                    seen[node.index()] = true;
                    this.nodes.push(node);
                }
            }
            this.link(&mut slots, t.head, t.tail);
            this.link(&mut slots, t.tail, t.head);
        }
        this
    }

    fn link(&mut self, slots: &mut HashMap<(EntityId, EntityId), usize>, from: EntityId, to: EntityId) {
        let row = &mut self.adj[from.index()];
        match slots.entry((from, to)) {
            Entry::Occupied(slot) => row[*slot.get()].1 += 1,
            Entry::Vacant(slot) => {
                slot.insert(row.len());
                row.push((to, 1));
            }
        }
    }

    /// Every node touched by an edge, first-appearance order.
    pub(crate) fn nodes(&self) -> &[EntityId] {
        &self.nodes
    }

    /// Size of dense per-node tables.
    pub(crate) fn bound(&self) -> usize {
        self.adj.len()
    }

    /// Distinct neighbors of `node` with their edge multiplicity.
    pub(crate) fn of(&self, node: EntityId) -> &[(EntityId, usize)] {
        self.adj.get(node.index()).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Index of the first maximum of `score` over `0..k`.
pub(crate) fn first_max(k: usize, mut score: impl FnMut(usize) -> f64) -> usize {
    let mut best = 0;
    let mut best_score = f64::NEG_INFINITY;
    for i in 0..k {
        let s = score(i);
        if s > best_score {
            best = i;
            best_score = s;
        }
    }
    best
}

/// Index of the first minimum of `cost` over `0..k`.
pub(crate) fn first_min(k: usize, mut cost: impl FnMut(usize) -> f64) -> usize {
    first_max(k, |i| -cost(i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RelationId;

    fn t(h: u32, r: u32, tl: u32) -> Triple {
        Triple::new(EntityId(h), RelationId(r), EntityId(tl))
    }

    #[test]
    fn test_first_appearance_order() {
        let n = Neighbors::build(&[t(4, 0, 2), t(2, 0, 7), t(7, 1, 4)]);
        assert_eq!(n.nodes(), &[EntityId(4), EntityId(2), EntityId(7)]);
        assert_eq!(n.of(EntityId(2)), &[(EntityId(4), 1), (EntityId(7), 1)]);
        assert_eq!(n.bound(), 8);
    }

    #[test]
    fn test_parallel_edges_add_weight() {
        let n = Neighbors::build(&[t(0, 0, 1), t(0, 1, 1), t(1, 0, 0)]);
        assert_eq!(n.of(EntityId(0)), &[(EntityId(1), 3)]);
        assert_eq!(n.of(EntityId(1)), &[(EntityId(0), 3)]);
    }

    #[test]
    fn test_self_loop_weighs_two() {
        let n = Neighbors::build(&[t(3, 0, 3)]);
        assert_eq!(n.nodes(), &[EntityId(3)]);
        assert_eq!(n.of(EntityId(3)), &[(EntityId(3), 2)]);
        assert!(n.of(EntityId(0)).is_empty());
    }

    #[test]
    fn test_first_max_and_min_break_ties_low() {
        let scores = [1.0, 3.0, 3.0, 0.5];
        assert_eq!(first_max(4, |i| scores[i]), 1);
        assert_eq!(first_min(4, |i| scores[i]), 3);
        assert_eq!(first_min(3, |i| scores[i]), 0);
    }
}
