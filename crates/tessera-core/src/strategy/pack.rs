//! Bin-packing of edge groups into size-capped partitions.

use crate::Triple;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Stable sort, largest group first; equal sizes keep their order.
pub(crate) fn largest_first(groups: &mut [Vec<Triple>]) {
    groups.sort_by(|a, b| b.len().cmp(&a.len()));
}

/// Pack groups (already sorted largest first) into chunks of at most
/// `max` triples.
///
/// - A group larger than `max` flushes the running batch and is split
///   into consecutive chunks of `max` (shuffled first when `rng` is given).
/// - A smaller group joins the running batch if it fits, otherwise the
///   batch is flushed and the group starts a new one.
pub(crate) fn pack_groups(
    groups: Vec<Vec<Triple>>,
    max: usize,
    mut rng: Option<&mut ChaCha8Rng>,
) -> Vec<Vec<Triple>> {
    let max = max.max(1);
    let mut out = Vec::new();
    let mut batch: Vec<Triple> = Vec::new();

    for mut group in groups {
        if group.len() > max {
            if !batch.is_empty() {
                out.push(std::mem::take(&mut batch));
            }
            if let Some(rng) = rng.as_deref_mut() {
                group.shuffle(rng);
            }
            out.extend(group.chunks(max).map(<[Triple]>::to_vec));
        } else if batch.len() + group.len() <= max {
            batch.extend(group);
        } else {
            if !batch.is_empty() {
                out.push(std::mem::take(&mut batch));
            }
            batch = group;
        }
    }

    if !batch.is_empty() {
        out.push(batch);
    }
    out
}
