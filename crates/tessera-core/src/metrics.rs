//! Per-strategy metrics record.
//!
//! One [`StrategyMetrics`] is produced for every strategy run and written as
//! `metrics.json`. Field names are part of the output format.
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `partitions` | number of partitions |
//! | `edges_original` | input triples |
//! | `edges_total` | triples summed over partitions (with replication) |
//! | `nodes_total` | distinct entities per partition, summed |
//! | `nodes_unique` | distinct entities over all partitions |
//! | `replication_factor` | `edges_total / edges_original`, 3 decimals |
//! | `retention_overall` | pooled kept / total over the four families |

use crate::retention::{Count, FamilyOutcome, RetentionConfig, RetentionReport};
use crate::strategy::Partition;
use crate::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Metrics for one strategy run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyMetrics {
    /// Run label.
    pub strategy: String,
    /// Partition count.
    pub partitions: usize,
    /// Input triple count.
    pub edges_original: usize,
    /// Triples summed over partitions.
    pub edges_total: usize,
    /// Triples per partition.
    pub edges_per_partition: Vec<usize>,
    /// Distinct entities per partition, summed.
    pub nodes_total: usize,
    /// Distinct entities over all partitions.
    pub nodes_unique: usize,
    /// Distinct entities per partition.
    pub nodes_per_partition: Vec<usize>,
    /// `edges_total / edges_original`, 0 for an empty input.
    pub replication_factor: f64,
    /// Pooled retention, 1.0 when nothing was examined.
    pub retention_overall: f64,
    /// True when the strategy fell back to a random split.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
    /// Per-family breakdown.
    pub details: Details,
}

/// Per-family breakdown, keyed as in `metrics.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Details {
    /// Path-through.
    #[serde(rename = "PT")]
    pub pt: FamilyDetail,
    /// 2-cycles.
    #[serde(rename = "CP_len2")]
    pub c2: FamilyDetail,
    /// 3-cycles.
    #[serde(rename = "CP_len3")]
    pub c3: FamilyDetail,
    /// 4-cycles.
    #[serde(rename = "CP_len4")]
    pub c4: FamilyDetail,
}

/// One family's count, timing, and the bounds it ran under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyDetail {
    /// Instances kept.
    pub kept: usize,
    /// Instances examined.
    pub total: usize,
    /// Wall time in seconds, 3 decimals.
    pub time_sec: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree_cap: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cycles: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
}

impl FamilyDetail {
    fn from_outcome(outcome: &FamilyOutcome) -> Self {
        Self {
            kept: outcome.count.kept,
            total: outcome.count.total,
            time_sec: round3(outcome.elapsed.as_secs_f64()),
            sample_ratio: None,
            degree_cap: None,
            max_cycles: None,
            truncated: None,
        }
    }

    /// The count part.
    pub fn count(&self) -> Count {
        Count {
            kept: self.kept,
            total: self.total,
        }
    }
}

/// Round to 3 decimal places.
pub fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

impl StrategyMetrics {
    /// Combine partition bookkeeping with a retention report.
    pub fn aggregate(
        strategy: &str,
        edges_original: usize,
        partitions: &[Partition],
        report: &RetentionReport,
        cfg: &RetentionConfig,
    ) -> Self {
        let mut edges_per_partition = Vec::with_capacity(partitions.len());
        let mut nodes_per_partition = Vec::with_capacity(partitions.len());
        let mut unique: HashSet<EntityId> = HashSet::new();
        for part in partitions {
            let nodes = part.nodes();
            edges_per_partition.push(part.len());
            nodes_per_partition.push(nodes.len());
            unique.extend(nodes);
        }
        let edges_total: usize = edges_per_partition.iter().sum();

        let replication_factor = if edges_original > 0 {
            round3(edges_total as f64 / edges_original as f64)
        } else {
            0.0
        };

        let details = Details {
            pt: FamilyDetail {
                sample_ratio: Some(cfg.pt_sample_ratio),
                ..FamilyDetail::from_outcome(&report.pt)
            },
            c2: FamilyDetail::from_outcome(&report.c2),
            c3: FamilyDetail {
                sample_ratio: Some(cfg.c3_sample_ratio),
                degree_cap: Some(cfg.c3_degree_cap),
                ..FamilyDetail::from_outcome(&report.c3)
            },
            c4: FamilyDetail {
                sample_ratio: Some(cfg.c4_sample_ratio),
                degree_cap: Some(cfg.c4_degree_cap),
                max_cycles: Some(cfg.c4_max_cycles),
                truncated: Some(report.c4.truncated),
                ..FamilyDetail::from_outcome(&report.c4)
            },
        };

        Self {
            strategy: strategy.to_string(),
            partitions: partitions.len(),
            edges_original,
            edges_total,
            edges_per_partition,
            nodes_total: nodes_per_partition.iter().sum(),
            nodes_unique: unique.len(),
            nodes_per_partition,
            replication_factor,
            retention_overall: report.overall(),
            fallback: false,
            details,
        }
    }

    /// Human-readable summary block, one line per entry.
    pub fn summary_lines(&self) -> Vec<String> {
        let spread = |xs: &[usize]| {
            let min = xs.iter().min().copied().unwrap_or(0);
            let max = xs.iter().max().copied().unwrap_or(0);
            let avg = if xs.is_empty() {
                0.0
            } else {
                xs.iter().sum::<usize>() as f64 / xs.len() as f64
            };
            format!("min={min}, max={max}, avg={avg:.1}")
        };
        let family = |label: &str, d: &FamilyDetail| {
            let c = d.count();
            format!("{label:<4} {}/{} = {:.4}", c.kept, c.total, c.ratio())
        };

        let mut lines = vec![
            format!("Strategy: {}", self.strategy),
            format!("Partitions: {}", self.partitions),
            format!("Original edges: {}", self.edges_original),
            format!("Total edges (with replication): {}", self.edges_total),
            format!("Replication factor: {:.2}x", self.replication_factor),
            format!("Edges per partition: {}", spread(&self.edges_per_partition)),
            format!("Nodes (total/unique): {}/{}", self.nodes_total, self.nodes_unique),
            format!("Nodes per partition: {}", spread(&self.nodes_per_partition)),
            format!("Overall retention: {:.4}", self.retention_overall),
            family("PT:", &self.details.pt),
            family("C2:", &self.details.c2),
            family("C3:", &self.details.c3),
            family("C4:", &self.details.c4),
        ];
        if self.details.c4.truncated == Some(true) {
            lines.push("C4 enumeration stopped at its instance ceiling".to_string());
        }
        if self.fallback {
            lines.push("Strategy fell back to random partitioning".to_string());
        }
        lines
    }
}
