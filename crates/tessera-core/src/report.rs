//! Output layout: `<out>/<strategy>/partitions/part_<id>.tsv` plus
//! `<out>/<strategy>/metrics.json`.

use crate::formats::tsv::{Tsv, PARTITIONS_DIR};
use crate::metrics::StrategyMetrics;
use crate::strategy::Partition;
use crate::{Error, Result, Vocab};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Metrics file name inside a strategy directory.
pub const METRICS_FILE: &str = "metrics.json";

/// Output directory for one strategy run.
pub fn strategy_dir(out_root: &Path, strategy: &str) -> PathBuf {
    out_root.join(strategy)
}

/// Replace `dir/partitions/` with one TSV file per partition.
pub fn write_partitions(dir: &Path, partitions: &[Partition], vocab: &Vocab) -> Result<Vec<PathBuf>> {
    let parts_dir = dir.join(PARTITIONS_DIR);
    if parts_dir.exists() {
        fs::remove_dir_all(&parts_dir).map_err(|e| Error::io(&parts_dir, e))?;
    }
    let paths = partitions
        .iter()
        .map(|p| Tsv::write_partition(dir, p, vocab))
        .collect::<Result<Vec<_>>>()?;
    debug!(dir = %parts_dir.display(), files = paths.len(), "wrote partition files");
    Ok(paths)
}

/// Write `dir/metrics.json`, pretty-printed.
pub fn write_metrics(dir: &Path, metrics: &StrategyMetrics) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    let path = dir.join(METRICS_FILE);
    let json = serde_json::to_string_pretty(metrics).map_err(|e| Error::json(&path, e))?;
    fs::write(&path, json).map_err(|e| Error::io(&path, e))?;
    Ok(path)
}

/// Load a previously written `metrics.json`.
pub fn read_metrics(path: &Path) -> Result<StrategyMetrics> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| Error::json(path, e))
}
