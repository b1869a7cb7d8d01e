use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Two triangles joined by a bridge, plus a reciprocal pair.
const TRAIN: &str = "\
a\tr\tb
b\tr\tc
c\tr\ta
c\tlink\tx
x\tr\ty
y\tr\tz
z\tr\tx
x\tsees\ty
y\tsees\tx
";

fn setup(train: &str) -> Result<TempDir, Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let ds = tmp.path().join("data").join("toy");
    fs::create_dir_all(&ds)?;
    fs::write(ds.join("train.txt"), train)?;
    Ok(tmp)
}

fn partition_cmd(root: &Path) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("tessera")?;
    cmd.arg("partition")
        .arg("--dataset")
        .arg("toy")
        .arg("--data-root")
        .arg(root.join("data"))
        .arg("--out-root")
        .arg(root.join("out"))
        .arg("--max-edges-per-part")
        .arg("4");
    Ok(cmd)
}

#[test]
fn test_cli_stats() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = setup(&format!("{TRAIN}a\tr\tb\nonly\ttwo\n"))?;

    let mut cmd = Command::cargo_bin("tessera")?;
    cmd.arg("stats")
        .arg("--dataset")
        .arg("toy")
        .arg("--data-root")
        .arg(tmp.path().join("data"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Triples:           9"))
        .stdout(predicate::str::contains("Entities:          6"))
        .stdout(predicate::str::contains("Relations:         3"))
        .stdout(predicate::str::contains("Weak components:   1"))
        .stdout(predicate::str::contains("Duplicates:        1"))
        .stdout(predicate::str::contains("Malformed lines:   1"));
    Ok(())
}

#[test]
fn test_cli_partition_single_strategy() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = setup(TRAIN)?;

    partition_cmd(tmp.path())?
        .arg("--strategy")
        .arg("relation_centric")
        .assert()
        .success()
        .stdout(predicate::str::contains("Retention Summary"))
        .stdout(predicate::str::contains("relation_centric"));

    let dir = tmp.path().join("out").join("toy").join("relation_centric");
    let metrics: serde_json::Value = serde_json::from_str(&fs::read_to_string(dir.join("metrics.json"))?)?;
    assert_eq!(metrics["strategy"], "relation_centric");
    assert_eq!(metrics["edges_original"], 9);
    assert_eq!(metrics["replication_factor"], 1.0);
    // x r y and x sees y each pair with y sees x, and y sees x pairs back with both
    assert_eq!(metrics["details"]["CP_len2"]["total"], 4);

    let parts = fs::read_dir(dir.join("partitions"))?.count();
    assert_eq!(metrics["partitions"].as_u64(), Some(parts as u64));

    // every input line lands in some partition file
    let mut written = String::new();
    for entry in fs::read_dir(dir.join("partitions"))? {
        written.push_str(&fs::read_to_string(entry?.path())?);
    }
    for line in TRAIN.lines() {
        assert!(written.lines().any(|l| l == line), "missing {line}");
    }
    Ok(())
}

#[test]
fn test_cli_partition_all_with_jobs() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = setup(TRAIN)?;

    partition_cmd(tmp.path())?
        .arg("--jobs")
        .arg("3")
        .arg("--bfs-radius")
        .arg("1")
        .assert()
        .success();

    let out = tmp.path().join("out").join("toy");
    for name in [
        "random_nonoverlap",
        "random_multi_k2",
        "random_multi_k3",
        "edge_cut",
        "vertex_cut",
        "louvain",
        "hub_replication_t50",
        "bfs_expansion_r1",
        "relation_centric",
    ] {
        assert!(out.join(name).join("metrics.json").is_file(), "no metrics for {name}");
    }
    Ok(())
}

#[test]
fn test_cli_repeats_override() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = setup(TRAIN)?;

    partition_cmd(tmp.path())?
        .arg("--strategy")
        .arg("random_multi")
        .arg("--repeats")
        .arg("4")
        .assert()
        .success()
        .stdout(predicate::str::contains("random_multi_k4"));

    let metrics: serde_json::Value = serde_json::from_str(&fs::read_to_string(
        tmp.path().join("out/toy/random_multi_k4/metrics.json"),
    )?)?;
    assert_eq!(metrics["edges_total"], 36);
    assert!(!tmp.path().join("out/toy/random_multi_k2").exists());
    Ok(())
}

#[test]
fn test_cli_missing_dataset_fails() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;

    partition_cmd(tmp.path())?
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load dataset"));
    Ok(())
}

#[test]
fn test_cli_rejects_bad_ratio() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = setup(TRAIN)?;

    partition_cmd(tmp.path())?
        .arg("--c3-sample-ratio")
        .arg("1.5")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
    Ok(())
}

#[test]
fn test_cli_rejects_zero_repeats() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = setup(TRAIN)?;

    partition_cmd(tmp.path())?
        .arg("--strategy")
        .arg("random_multi")
        .arg("--repeats")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("repeat"));
    Ok(())
}
