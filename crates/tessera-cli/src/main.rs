//! Tessera CLI - partition a knowledge graph and score structural retention.
//!
//! # Usage
//!
//! ```bash
//! # Run every strategy on data/FB15k-237/train.txt, writing to out/FB15k-237/
//! tessera partition --dataset FB15k-237
//!
//! # One strategy, smaller partitions, more sampling
//! tessera partition --dataset WN18RR --strategy louvain \
//!     --max-edges-per-part 20000 --c3-sample-ratio 0.5
//!
//! # Four strategies at a time
//! tessera partition --dataset FB15k-237 --jobs 4
//!
//! # Dataset statistics
//! tessera stats --dataset FB15k-237
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tessera_core::formats::tsv::Tsv;
use tessera_core::retention::RetentionConfig;
use tessera_core::{Dataset, GraphIndex, LoadReport, PartitionConfig, Runner, Strategy, StrategyMetrics};
use tracing::Level;

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Knowledge graph partitioning and retention analysis", long_about = None)]
struct Cli {
    /// Debug-level logging and progress lines during retention counting
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Partition a dataset and evaluate every partitioning
    Partition {
        #[command(flatten)]
        input: InputArgs,

        /// Root directory for outputs; results go to <out-root>/<dataset>
        #[arg(long, default_value = "out")]
        out_root: PathBuf,

        /// Which strategy to run
        #[arg(long, default_value = "all")]
        strategy: StrategyArg,

        /// Size cap per partition
        #[arg(long, default_value = "100000")]
        max_edges_per_part: usize,

        /// Seed for partitioning and sampling
        #[arg(long, default_value = "2025")]
        seed: u64,

        /// Fraction of middle nodes kept for path-through counting
        #[arg(long, default_value = "0.5")]
        pt_sample_ratio: f64,

        /// Fraction of anchors kept for 3-cycle counting
        #[arg(long, default_value = "0.1")]
        c3_sample_ratio: f64,

        /// Skip 3-cycle intermediates with a larger out-degree
        #[arg(long, default_value = "100")]
        c3_degree_cap: usize,

        /// Fraction of anchors kept for 4-cycle counting
        #[arg(long, default_value = "0.05")]
        c4_sample_ratio: f64,

        /// Skip 4-cycle intermediates with a larger out-degree
        #[arg(long, default_value = "100")]
        c4_degree_cap: usize,

        /// Anchors between 4-cycle progress lines (with --verbose)
        #[arg(long, default_value = "2000")]
        c4_progress_interval: usize,

        /// Stop 4-cycle enumeration after this many instances
        #[arg(long, default_value = "100000")]
        c4_max_cycles: usize,

        /// Initial degree cutoff for hub replication
        #[arg(long, default_value = "50")]
        hub_threshold: usize,

        /// Hop bound for BFS expansion
        #[arg(long, default_value = "2")]
        bfs_radius: usize,

        /// Repeats for random_multi (default: both 2 and 3)
        #[arg(long)]
        repeats: Option<usize>,

        /// Strategies evaluated concurrently
        #[arg(long, default_value = "1")]
        jobs: usize,
    },

    /// Show statistics about a dataset
    Stats {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(clap::Args)]
struct InputArgs {
    /// Dataset name; reads <data-root>/<dataset>/train.txt
    #[arg(long, default_value = "FB15k-237")]
    dataset: String,

    /// Root directory holding one sub-directory per dataset
    #[arg(long, default_value = "data")]
    data_root: PathBuf,
}

impl InputArgs {
    fn dir(&self) -> PathBuf {
        self.data_root.join(&self.dataset)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    #[value(name = "all")]
    All,
    #[value(name = "random_nonoverlap")]
    RandomNonoverlap,
    #[value(name = "random_multi")]
    RandomMulti,
    #[value(name = "edge_cut")]
    EdgeCut,
    #[value(name = "vertex_cut")]
    VertexCut,
    #[value(name = "louvain")]
    Louvain,
    #[value(name = "hub_replication")]
    HubReplication,
    #[value(name = "bfs_expansion")]
    BfsExpansion,
    #[value(name = "relation_centric")]
    RelationCentric,
}

/// Expand a `--strategy` choice into concrete runs.
///
/// An explicit `--repeats` replaces the default pair of random_multi runs.
fn resolve(arg: StrategyArg, repeats: Option<usize>, cfg: &PartitionConfig) -> Vec<Strategy> {
    let multi = || match repeats {
        Some(repeats) => vec![Strategy::RandomMulti { repeats }],
        None => vec![
            Strategy::RandomMulti { repeats: 2 },
            Strategy::RandomMulti { repeats: 3 },
        ],
    };
    match arg {
        StrategyArg::All => {
            let mut runs = vec![Strategy::RandomNonOverlap];
            runs.extend(multi());
            runs.extend(
                Strategy::all(cfg)
                    .into_iter()
                    .filter(|s| !matches!(s, Strategy::RandomNonOverlap | Strategy::RandomMulti { .. })),
            );
            runs
        }
        StrategyArg::RandomNonoverlap => vec![Strategy::RandomNonOverlap],
        StrategyArg::RandomMulti => multi(),
        StrategyArg::EdgeCut => vec![Strategy::EdgeCut],
        StrategyArg::VertexCut => vec![Strategy::VertexCut],
        StrategyArg::Louvain => vec![Strategy::Louvain],
        StrategyArg::HubReplication => vec![Strategy::HubReplication {
            threshold: cfg.hub_threshold,
        }],
        StrategyArg::BfsExpansion => vec![Strategy::BfsExpansion {
            radius: cfg.bfs_radius,
        }],
        StrategyArg::RelationCentric => vec![Strategy::RelationCentric],
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Partition {
            input,
            out_root,
            strategy,
            max_edges_per_part,
            seed,
            pt_sample_ratio,
            c3_sample_ratio,
            c3_degree_cap,
            c4_sample_ratio,
            c4_degree_cap,
            c4_progress_interval,
            c4_max_cycles,
            hub_threshold,
            bfs_radius,
            repeats,
            jobs,
        } => {
            let partition = PartitionConfig {
                max_edges_per_part,
                seed,
                hub_threshold,
                bfs_radius,
            };
            let retention = RetentionConfig {
                pt_sample_ratio,
                c3_sample_ratio,
                c3_degree_cap,
                c4_sample_ratio,
                c4_degree_cap,
                c4_progress_interval,
                c4_max_cycles,
                seed,
                verbose: cli.verbose,
            };
            let strategies = resolve(strategy, repeats, &partition);
            cmd_partition(&input, &out_root.join(&input.dataset), partition, retention, &strategies, jobs)?;
        }
        Commands::Stats { input } => {
            cmd_stats(&input)?;
        }
    }

    Ok(())
}

fn load_dataset(dir: &Path) -> Result<(Dataset, LoadReport)> {
    let start = Instant::now();
    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Loading {}...", dir.display()));

    let loaded = Tsv::read_dir(dir).with_context(|| format!("Failed to load dataset from {}", dir.display()));
    match loaded {
        Ok(loaded) => {
            pb.finish_with_message(format!("Loaded in {:.2?}", start.elapsed()));
            Ok(loaded)
        }
        Err(e) => {
            pb.finish_and_clear();
            Err(e)
        }
    }
}

fn cmd_partition(
    input: &InputArgs,
    out_dir: &Path,
    partition: PartitionConfig,
    retention: RetentionConfig,
    strategies: &[Strategy],
    jobs: usize,
) -> Result<()> {
    let (dataset, report) = load_dataset(&input.dir())?;
    tracing::info!(
        dataset = %input.dataset,
        triples = dataset.len(),
        entities = dataset.vocab().entity_count(),
        relations = dataset.vocab().relation_count(),
        duplicates = report.duplicates,
        malformed = report.malformed,
        "loaded dataset"
    );

    let runner = Runner::new(dataset, partition, retention, out_dir).context("Invalid configuration")?;
    let start = Instant::now();
    let results = runner
        .run(strategies, jobs)
        .with_context(|| format!("Partitioning run failed under {}", out_dir.display()))?;

    print_results(&results);
    println!(
        "\n{} strategies finished in {:.2?}; results in {}",
        results.len(),
        start.elapsed(),
        out_dir.display()
    );
    Ok(())
}

fn print_results(results: &[StrategyMetrics]) {
    println!("Retention Summary");
    println!("=================");
    println!(
        "{:<24} {:>6} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "strategy", "parts", "repl", "overall", "PT", "C2", "C3", "C4"
    );
    for m in results {
        let d = &m.details;
        println!(
            "{:<24} {:>6} {:>8.3} {:>8.4} {:>8.4} {:>8.4} {:>8.4} {:>8.4}",
            m.strategy,
            m.partitions,
            m.replication_factor,
            m.retention_overall,
            d.pt.count().ratio(),
            d.c2.count().ratio(),
            d.c3.count().ratio(),
            d.c4.count().ratio(),
        );
    }
}

fn cmd_stats(input: &InputArgs) -> Result<()> {
    let (dataset, report) = load_dataset(&input.dir())?;
    let stats = GraphIndex::build(dataset.triples()).stats();

    println!("Dataset Statistics");
    println!("==================");
    println!("Dataset:           {}", input.dataset);
    println!("Triples:           {}", stats.triple_count);
    println!("Entities:          {}", stats.entity_count);
    println!("Relations:         {}", stats.relation_count);
    println!("Avg degree:        {:.2}", stats.avg_degree);
    println!("Max degree:        {}", stats.max_degree);
    println!("Weak components:   {}", stats.weak_components);
    println!("Duplicates:        {}", report.duplicates);
    println!("Malformed lines:   {}", report.malformed);

    Ok(())
}
