//! Relation-centric packing.

use super::pack::{largest_first, pack_groups};
use super::{into_partitions, Partition};
use crate::Triple;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Group triples by relation, largest group first, and pack the groups
/// into partitions of at most `max_edges_per_part` triples.
///
/// Groups too large for one partition are shuffled, then cut into chunks.
/// Equal-size groups keep the order in which their relation first appears.
pub fn relation_centric(triples: &[Triple], max_edges_per_part: usize, seed: u64) -> Vec<Partition> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut slot_of: Vec<Option<usize>> = Vec::new();
    let mut groups: Vec<Vec<Triple>> = Vec::new();
    for t in triples {
        let r = t.relation.index();
        if r >= slot_of.len() {
            slot_of.resize(r + 1, None);
        }
        let slot = *slot_of[r].get_or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(*t);
    }

    debug!(relations = groups.len(), "relation_centric grouped edges");
    largest_first(&mut groups);
    into_partitions(pack_groups(groups, max_edges_per_part, Some(&mut rng)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dataset;
    use std::collections::HashSet;

    #[test]
    fn test_small_relations_share_partitions() {
        let ds = Dataset::from_names([
            ("a", "likes", "b"),
            ("b", "likes", "c"),
            ("c", "likes", "d"),
            ("a", "knows", "c"),
            ("b", "knows", "d"),
            ("a", "owns", "x"),
        ]);
        let parts = relation_centric(ds.triples(), 5, 0);
        let sizes: Vec<usize> = parts.iter().map(Partition::len).collect();
        assert_eq!(sizes, vec![5, 1]);

        let likes = ds.vocab().relation_id("likes").unwrap();
        assert!(parts[0].triples[..3].iter().all(|t| t.relation == likes));
    }

    #[test]
    fn test_big_relation_split_alone() {
        let mut b = Dataset::builder();
        for i in 0..7 {
            b.add(&format!("n{i}"), "big", &format!("n{}", i + 1));
        }
        b.add("x", "small", "y");
        let ds = b.build().0;

        let parts = relation_centric(ds.triples(), 3, 2);
        let sizes: Vec<usize> = parts.iter().map(Partition::len).collect();
        assert_eq!(sizes, vec![3, 3, 1, 1]);

        let big = ds.vocab().relation_id("big").unwrap();
        for p in &parts[..3] {
            assert!(p.triples.iter().all(|t| t.relation == big));
        }
        let distinct: HashSet<Triple> = parts.iter().flat_map(|p| p.triples.clone()).collect();
        assert_eq!(distinct.len(), ds.len());
    }
}
