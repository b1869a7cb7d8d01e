use super::{Count, Progress, RetentionConfig, Sampler};
use crate::edge_map::{shares_partition, EdgePartitionMap};
use crate::{GraphIndex, Triple};

const STREAM: u64 = 1;
const PROGRESS_EVERY: usize = 5000;

/// Count 2-hop paths `(h, r1, y) -> (y, r2, z)` through sampled middle
/// nodes `y`.
///
/// Middle nodes are visited in ascending id order among nodes with an
/// incoming edge, each kept with probability `pt_sample_ratio`. A first
/// edge that no partition holds is skipped without being counted.
pub fn path_through(index: &GraphIndex, map: &EdgePartitionMap, cfg: &RetentionConfig) -> Count {
    let mut sampler = Sampler::new(cfg.seed, STREAM, cfg.pt_sample_ratio);
    let progress = Progress::new("PT", PROGRESS_EVERY, cfg.verbose, index.tails().count());
    let mut count = Count::default();
    let mut processed = 0usize;

    for y in index.tails() {
        if !sampler.keep() {
            continue;
        }
        processed += 1;
        progress.tick(processed, count);

        let outs = index.out_edges(y);
        if outs.is_empty() {
            continue;
        }
        for &(r1, h) in index.in_edges(y) {
            let first = map.partitions_of(&Triple::new(h, r1, y));
            if first.is_empty() {
                continue;
            }
            for &(r2, z) in outs {
                let second = map.partitions_of(&Triple::new(y, r2, z));
                count.record(shares_partition(&[first, second]));
            }
        }
    }

    progress.finish(count);
    count
}
