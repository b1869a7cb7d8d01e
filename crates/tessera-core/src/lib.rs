// Allow minor clippy style warnings at crate level
// These are mostly style preferences, not bugs
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]

//! Partitioning strategies for relational graphs, and how well each one
//! keeps small structures intact.
//!
//! A knowledge graph is a list of `(head, relation, tail)` triples. This
//! crate splits such a list into size-capped partitions with one of several
//! strategies, then measures the fraction of short paths and cycles whose
//! edges still co-occur in some partition.
//!
//! - [`Dataset`] / [`Vocab`] - interned triples loaded from `train.txt`
//! - [`GraphIndex`] - read-only adjacency built once per input graph
//! - [`strategy`] - the partitioners, behind the [`Strategy`] enum
//! - [`EdgePartitionMap`] - which partitions hold each triple
//! - [`retention`] - PT / C2 / C3 / C4 retention counting
//! - [`metrics`] and [`report`] - `metrics.json` and partition files
//! - [`Runner`] - the whole pipeline for a list of strategies
//!
//! # Example
//!
//! ```rust
//! use tessera_core::retention::{evaluate, RetentionConfig};
//! use tessera_core::{Dataset, EdgePartitionMap, GraphIndex, PartitionConfig, Strategy};
//!
//! let ds = Dataset::from_names([
//!     ("alice", "knows", "bob"),
//!     ("bob", "knows", "carol"),
//!     ("carol", "knows", "alice"),
//!     ("carol", "works_at", "acme"),
//! ]);
//! let cfg = PartitionConfig { max_edges_per_part: 2, ..Default::default() };
//!
//! let result = Strategy::RelationCentric.run(ds.triples(), &cfg);
//! assert_eq!(result.partitions.len(), 3);
//!
//! let index = GraphIndex::build(ds.triples());
//! let map = EdgePartitionMap::build(&result.partitions);
//! let report = evaluate(&index, &map, &RetentionConfig::default());
//! assert!(report.overall() <= 1.0);
//! ```

mod dataset;
pub mod edge_map;
mod error;
pub mod formats;
mod index;
pub mod metrics;
pub mod report;
pub mod retention;
mod runner;
pub mod strategy;
mod triple;
mod vocab;

pub use dataset::{Dataset, DatasetBuilder, LoadReport};
pub use edge_map::{EdgePartitionMap, PartitionId};
pub use error::{Error, Result};
pub use index::{GraphIndex, GraphStats};
pub use metrics::StrategyMetrics;
pub use runner::Runner;
pub use strategy::{Partition, PartitionConfig, Partitioning, Strategy};
pub use triple::{EntityId, RelationId, Triple};
pub use vocab::Vocab;
