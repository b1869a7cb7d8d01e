//! End-to-end runs: partition, write, evaluate, report.

use crate::edge_map::EdgePartitionMap;
use crate::metrics::StrategyMetrics;
use crate::report::{strategy_dir, write_metrics, write_partitions};
use crate::retention::{evaluate, RetentionConfig};
use crate::strategy::{uncovered, PartitionConfig, Strategy};
use crate::{Dataset, Error, GraphIndex, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};

/// Owns one dataset and its shared index, and runs strategies against it.
///
/// The index is built once in [`Runner::new`] and only read afterwards,
/// so strategies may run concurrently.
#[derive(Debug)]
pub struct Runner {
    dataset: Dataset,
    index: GraphIndex,
    partition: PartitionConfig,
    retention: RetentionConfig,
    out_dir: PathBuf,
}

impl Runner {
    /// Validate both configs, index the dataset, and clamp the PT sample
    /// ratio to `1 / ceil(n / max_edges_per_part)`.
    ///
    /// Fails with [`Error::EmptyDataset`] when there is nothing to partition.
    pub fn new(
        dataset: Dataset,
        partition: PartitionConfig,
        retention: RetentionConfig,
        out_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        partition.validate()?;
        retention.validate()?;
        if dataset.is_empty() {
            return Err(Error::EmptyDataset("dataset".into()));
        }
        let index = GraphIndex::build(dataset.triples());
        let retention = retention.clamped_for(partition.target_parts(dataset.len()));
        debug!(
            triples = dataset.len(),
            pt_sample_ratio = retention.pt_sample_ratio,
            "runner ready"
        );
        Ok(Self {
            dataset,
            index,
            partition,
            retention,
            out_dir: out_dir.into(),
        })
    }

    /// The input triples.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The shared adjacency index.
    pub fn index(&self) -> &GraphIndex {
        &self.index
    }

    /// Retention bounds in effect, after clamping.
    pub fn retention_config(&self) -> &RetentionConfig {
        &self.retention
    }

    /// Root under which each strategy gets its own directory.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Partition with one strategy, write its files, and evaluate it.
    pub fn run_one(&self, strategy: &Strategy) -> Result<StrategyMetrics> {
        let name = strategy.name();
        info!(strategy = %name, triples = self.dataset.len(), "starting strategy");

        let start = Instant::now();
        let result = strategy.run(self.dataset.triples(), &self.partition);
        info!(
            strategy = %name,
            partitions = result.partitions.len(),
            elapsed_sec = start.elapsed().as_secs_f64(),
            "partitioned"
        );

        let missing = uncovered(self.dataset.triples(), &result.partitions);
        if !missing.is_empty() {
            error!(strategy = %name, missing = missing.len(), "strategy dropped triples");
        }

        let dir = strategy_dir(&self.out_dir, &result.name);
        write_partitions(&dir, &result.partitions, self.dataset.vocab())?;

        let map = EdgePartitionMap::build(&result.partitions);
        let report = evaluate(&self.index, &map, &self.retention);

        let mut metrics = StrategyMetrics::aggregate(
            &result.name,
            self.dataset.len(),
            &result.partitions,
            &report,
            &self.retention,
        );
        metrics.fallback = result.fallback;
        let path = write_metrics(&dir, &metrics)?;

        for line in metrics.summary_lines() {
            info!("[{name}] {line}");
        }
        debug!(path = %path.display(), "wrote metrics");
        Ok(metrics)
    }

    /// Run `strategies` in order. With `jobs > 1` they run on a dedicated
    /// pool of that many threads; results keep the input order either way.
    pub fn run(&self, strategies: &[Strategy], jobs: usize) -> Result<Vec<StrategyMetrics>> {
        for strategy in strategies {
            strategy.validate()?;
        }
        if jobs <= 1 || strategies.len() <= 1 {
            return strategies.iter().map(|s| self.run_one(s)).collect();
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .thread_name(|i| format!("tessera-{i}"))
            .build()
            .map_err(|e| Error::InvalidConfig(format!("cannot start {jobs} worker threads: {e}")))?;
        pool.install(|| strategies.par_iter().map(|s| self.run_one(s)).collect())
    }
}
