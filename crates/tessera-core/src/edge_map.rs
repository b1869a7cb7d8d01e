//! Triple -> partition membership.

use crate::strategy::Partition;
use crate::Triple;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Index of a partition in a strategy's result list.
pub type PartitionId = u32;

/// Maps every placed triple to the ascending, de-duplicated list of
/// partitions that contain it. Built fresh for each strategy result.
#[derive(Debug, Clone, Default)]
pub struct EdgePartitionMap {
    map: HashMap<Triple, SmallVec<[PartitionId; 4]>>,
}

impl EdgePartitionMap {
    /// Build from a partition list; ids are list positions.
    #[allow(clippy::cast_possible_truncation)]
    pub fn build(partitions: &[Partition]) -> Self {
        let mut map: HashMap<Triple, SmallVec<[PartitionId; 4]>> = HashMap::new();
        for (pid, part) in partitions.iter().enumerate() {
            let pid = pid as PartitionId;
            for triple in &part.triples {
                let ids = map.entry(*triple).or_default();
                // ids only ever grow in pid order, so checking the tail dedups
                if ids.last() != Some(&pid) {
                    ids.push(pid);
                }
            }
        }
        Self { map }
    }

    /// Partitions containing `triple`; empty if it was never placed.
    pub fn partitions_of(&self, triple: &Triple) -> &[PartitionId] {
        self.map.get(triple).map(SmallVec::as_slice).unwrap_or_default()
    }

    /// Number of distinct triples placed in at least one partition.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when no triple was placed.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// True when every list shares at least one partition id.
///
/// Lists must be sorted ascending, as produced by [`EdgePartitionMap`].
/// An empty list (or no lists at all) never shares anything.
pub fn shares_partition(lists: &[&[PartitionId]]) -> bool {
    let Some((first, rest)) = lists.split_first() else {
        return false;
    };
    first
        .iter()
        .any(|id| rest.iter().all(|other| other.binary_search(id).is_ok()))
}
