//! Structural-retention evaluation.
//!
//! Given the read-only [`GraphIndex`] of the full graph and the
//! [`EdgePartitionMap`] of one strategy's output, estimate how many small
//! structural patterns survive partitioning. A pattern instance is *kept*
//! when all of its edges share at least one partition.
//!
//! Four pattern families are counted:
//!
//! - **PT** (path-through): `(h, r1, y)` followed by `(y, r2, z)`.
//! - **C2**: an edge and a reverse edge, `(h, r, t)` and `(t, r2, h)`.
//! - **C3**: directed triangles `a -> b -> c -> a`.
//! - **C4**: directed 4-cycles `a -> b -> c -> d -> a`.
//!
//! Every cycle is counted once, from the rotation that starts at its
//! smallest entity id (smallest `(entity, relation)` for C2).
//!
//! PT, C3 and C4 sample their anchor nodes and C3/C4 skip hub nodes above a
//! degree cap, so their counts are estimates whenever a ratio is below 1 or
//! a cap is hit. C4 additionally stops at a hard instance ceiling.
//!
//! # Example
//!
//! ```rust
//! use tessera_core::retention::{evaluate, RetentionConfig};
//! use tessera_core::strategy::random_nonoverlap;
//! use tessera_core::{Dataset, EdgePartitionMap, GraphIndex};
//!
//! let ds = Dataset::from_names([("a", "r", "b"), ("b", "r", "c"), ("c", "r", "a")]);
//! let index = GraphIndex::build(ds.triples());
//! let parts = random_nonoverlap(ds.triples(), 10, 1);
//! let map = EdgePartitionMap::build(&parts);
//!
//! let cfg = RetentionConfig {
//!     c3_sample_ratio: 1.0,
//!     ..RetentionConfig::default()
//! };
//! let report = evaluate(&index, &map, &cfg);
//! assert_eq!(report.c3.count.total, 1);
//! assert_eq!(report.overall(), 1.0);
//! ```

mod cycles;
mod path_through;

pub use cycles::{cycle2, cycle3, cycle4, C4Outcome};
pub use path_through::path_through;

use crate::edge_map::EdgePartitionMap;
use crate::{Error, GraphIndex, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::info;

/// Sampling and cost bounds for the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Fraction of middle nodes enumerated for PT.
    pub pt_sample_ratio: f64,
    /// Fraction of anchor nodes enumerated for C3.
    pub c3_sample_ratio: f64,
    /// C3 skips `b` or `c` when its out-degree exceeds this.
    pub c3_degree_cap: usize,
    /// Fraction of anchor nodes enumerated for C4.
    pub c4_sample_ratio: f64,
    /// C4 skips `b`, `c` or `d` when its out-degree exceeds this.
    pub c4_degree_cap: usize,
    /// Anchors between C4 progress lines.
    pub c4_progress_interval: usize,
    /// C4 stops once this many instances were counted.
    pub c4_max_cycles: usize,
    /// Seed for the samplers.
    pub seed: u64,
    /// Log progress lines at `info`.
    pub verbose: bool,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            pt_sample_ratio: 0.5,
            c3_sample_ratio: 0.1,
            c3_degree_cap: 100,
            c4_sample_ratio: 0.05,
            c4_degree_cap: 100,
            c4_progress_interval: 2000,
            c4_max_cycles: 100_000,
            seed: 2025,
            verbose: false,
        }
    }
}

impl RetentionConfig {
    /// Check ratios and intervals.
    pub fn validate(&self) -> Result<()> {
        for (name, ratio) in [
            ("pt_sample_ratio", self.pt_sample_ratio),
            ("c3_sample_ratio", self.c3_sample_ratio),
            ("c4_sample_ratio", self.c4_sample_ratio),
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {ratio}"
                )));
            }
        }
        if self.c4_progress_interval == 0 {
            return Err(Error::InvalidConfig(
                "c4_progress_interval must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Lower `pt_sample_ratio` to at most `1 / partition_count`.
    #[must_use]
    pub fn clamped_for(mut self, partition_count: usize) -> Self {
        if partition_count > 0 {
            self.pt_sample_ratio = self.pt_sample_ratio.min(1.0 / partition_count as f64);
        }
        self
    }
}

/// Kept and examined instances of one pattern family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Count {
    /// Instances whose edges share a partition.
    pub kept: usize,
    /// Instances examined.
    pub total: usize,
}

impl Count {
    pub(crate) fn record(&mut self, kept: bool) {
        self.total += 1;
        if kept {
            self.kept += 1;
        }
    }

    /// `kept / total`, or 0 when nothing was examined.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.kept as f64 / self.total as f64
        }
    }
}

impl std::ops::Add for Count {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            kept: self.kept + rhs.kept,
            total: self.total + rhs.total,
        }
    }
}

/// One family's count plus how long it took.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FamilyOutcome {
    /// Kept / total.
    pub count: Count,
    /// Wall time.
    pub elapsed: Duration,
    /// The enumeration stopped at its instance ceiling.
    pub truncated: bool,
}

/// Results for all four families.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionReport {
    /// Path-through.
    pub pt: FamilyOutcome,
    /// 2-cycles.
    pub c2: FamilyOutcome,
    /// 3-cycles.
    pub c3: FamilyOutcome,
    /// 4-cycles.
    pub c4: FamilyOutcome,
}

impl RetentionReport {
    /// All families pooled into one count.
    pub fn pooled(&self) -> Count {
        self.pt.count + self.c2.count + self.c3.count + self.c4.count
    }

    /// Pooled `kept / total`; `1.0` when no instance was examined.
    pub fn overall(&self) -> f64 {
        let pooled = self.pooled();
        if pooled.total == 0 {
            1.0
        } else {
            pooled.kept as f64 / pooled.total as f64
        }
    }
}

/// Run all four families in order: PT, C2, C3, C4.
pub fn evaluate(index: &GraphIndex, map: &EdgePartitionMap, cfg: &RetentionConfig) -> RetentionReport {
    let pt = timed(|| (path_through(index, map, cfg), false));
    let c2 = timed(|| (cycle2(index, map, cfg), false));
    let c3 = timed(|| (cycle3(index, map, cfg), false));
    let c4 = timed(|| {
        let outcome = cycle4(index, map, cfg);
        (outcome.count, outcome.truncated)
    });
    RetentionReport { pt, c2, c3, c4 }
}

fn timed(f: impl FnOnce() -> (Count, bool)) -> FamilyOutcome {
    let start = Instant::now();
    let (count, truncated) = f();
    FamilyOutcome {
        count,
        elapsed: start.elapsed(),
        truncated,
    }
}

/// Per-node Bernoulli sampler on its own generator stream.
pub(crate) struct Sampler {
    rng: ChaCha8Rng,
    ratio: f64,
}

impl Sampler {
    pub(crate) fn new(seed: u64, stream: u64, ratio: f64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self { rng, ratio }
    }

    /// Draws only when the ratio is below 1.
    pub(crate) fn keep(&mut self) -> bool {
        self.ratio >= 1.0 || self.rng.gen::<f64>() <= self.ratio
    }
}

/// Periodic `info` progress lines for one family.
pub(crate) struct Progress {
    family: &'static str,
    every: usize,
    enabled: bool,
    start: Instant,
}

impl Progress {
    pub(crate) fn new(family: &'static str, every: usize, enabled: bool, of: usize) -> Self {
        if enabled {
            info!(family, of, "retention enumeration started");
        }
        Self {
            family,
            every: every.max(1),
            enabled,
            start: Instant::now(),
        }
    }

    pub(crate) fn tick(&self, processed: usize, count: Count) {
        if self.enabled && processed % self.every == 0 {
            info!(
                family = self.family,
                processed,
                total = count.total,
                kept = count.kept,
                elapsed_sec = self.start.elapsed().as_secs_f64(),
                "retention progress"
            );
        }
    }

    pub(crate) fn finish(&self, count: Count) {
        if self.enabled {
            info!(
                family = self.family,
                kept = count.kept,
                total = count.total,
                ratio = count.ratio(),
                elapsed_sec = self.start.elapsed().as_secs_f64(),
                "retention enumeration finished"
            );
        }
    }
}
