//! Random baselines.

use super::{into_partitions, Partition};
use crate::Triple;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Shuffle a copy of `triples` and cut it into consecutive chunks.
pub(crate) fn shuffled_chunks<R: Rng + ?Sized>(
    triples: &[Triple],
    max_edges_per_part: usize,
    rng: &mut R,
) -> Vec<Vec<Triple>> {
    let mut edges = triples.to_vec();
    edges.shuffle(rng);
    edges
        .chunks(max_edges_per_part.max(1))
        .map(<[Triple]>::to_vec)
        .collect()
}

/// Disjoint random split: shuffle, then slice into chunks of
/// `max_edges_per_part`.
///
/// The concatenation of the result is a permutation of `triples`.
///
/// # Example
///
/// ```rust
/// use tessera_core::Dataset;
/// use tessera_core::strategy::random_nonoverlap;
///
/// let ds = Dataset::from_names([("a", "r", "b"), ("b", "r", "c"), ("c", "r", "a")]);
/// let parts = random_nonoverlap(ds.triples(), 2, 42);
/// assert_eq!(parts.len(), 2);
/// assert_eq!(parts[0].len() + parts[1].len(), 3);
/// ```
#[must_use]
pub fn random_nonoverlap(triples: &[Triple], max_edges_per_part: usize, seed: u64) -> Vec<Partition> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    into_partitions(shuffled_chunks(triples, max_edges_per_part, &mut rng))
}

/// `repeats` independent random splits (seeds `seed..seed+repeats`),
/// concatenated. Every triple ends up in exactly `repeats` partitions.
#[must_use]
pub fn random_multi(
    triples: &[Triple],
    max_edges_per_part: usize,
    repeats: usize,
    seed: u64,
) -> Vec<Partition> {
    let chunks = (0..repeats as u64)
        .flat_map(|i| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(i));
            shuffled_chunks(triples, max_edges_per_part, &mut rng)
        })
        .collect();
    into_partitions(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge_map::EdgePartitionMap;
    use crate::{EntityId, RelationId};

    fn chain(n: u32) -> Vec<Triple> {
        (0..n)
            .map(|i| Triple::new(EntityId(i), RelationId(0), EntityId(i + 1)))
            .collect()
    }

    #[test]
    fn test_nonoverlap_is_permutation() {
        let triples = chain(23);
        let parts = random_nonoverlap(&triples, 5, 1);
        assert_eq!(parts.len(), 5);
        assert!(parts[..4].iter().all(|p| p.len() == 5));
        assert_eq!(parts[4].len(), 3);

        let mut all: Vec<Triple> = parts.into_iter().flat_map(|p| p.triples).collect();
        all.sort();
        let mut expected = triples.clone();
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_nonoverlap_is_seeded() {
        let triples = chain(50);
        assert_eq!(random_nonoverlap(&triples, 7, 9), random_nonoverlap(&triples, 7, 9));
        assert_ne!(random_nonoverlap(&triples, 7, 9), random_nonoverlap(&triples, 7, 10));
    }

    #[test]
    fn test_multi_replicates_each_triple() {
        let triples = chain(10);
        let parts = random_multi(&triples, 4, 3, 5);
        assert_eq!(parts.len(), 9);
        let map = EdgePartitionMap::build(&parts);
        assert!(triples.iter().all(|t| map.partitions_of(t).len() == 3));
    }

    #[test]
    fn test_multi_first_split_matches_nonoverlap() {
        let triples = chain(12);
        let multi = random_multi(&triples, 5, 2, 3);
        let single = random_nonoverlap(&triples, 5, 3);
        for (a, b) in multi.iter().zip(&single) {
            assert_eq!(a.triples, b.triples);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(random_nonoverlap(&[], 5, 0).is_empty());
    }
}
