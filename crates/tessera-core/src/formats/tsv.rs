//! Tab-separated triple files.
//!
//! Each non-empty line is `head<TAB>relation<TAB>tail`. Lines that do not
//! split into exactly three fields on tabs are retried on arbitrary
//! whitespace; if that also fails the line is skipped and counted.

use crate::dataset::{Dataset, LoadReport};
use crate::strategy::Partition;
use crate::{Error, Result, Triple, Vocab};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Training split consumed from a dataset directory.
pub const TRAIN_FILE: &str = "train.txt";

/// Subdirectory of a strategy's output holding one file per partition.
pub const PARTITIONS_DIR: &str = "partitions";

/// TSV format handler.
pub struct Tsv;

impl Tsv {
    /// Split one line into `[head, relation, tail]`.
    pub fn parse_line(line: &str) -> Option<[&str; 3]> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if let [h, r, t] = fields[..] {
            return Some([h, r, t]);
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields[..] {
            [h, r, t] => Some([h, r, t]),
            _ => None,
        }
    }

    /// Read triples from any buffered reader. `origin` only labels errors.
    pub fn read<R: BufRead>(reader: R, origin: &Path) -> Result<(Dataset, LoadReport)> {
        let mut builder = Dataset::builder();
        let mut report = LoadReport::default();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| Error::io(origin, e))?;
            if line.trim().is_empty() {
                continue;
            }
            report.lines += 1;
            match Self::parse_line(&line) {
                Some([h, r, t]) => {
                    builder.add(h, r, t);
                }
                None => {
                    report.malformed += 1;
                    debug!(line = line_no + 1, file = %origin.display(), "skipping malformed line");
                }
            }
        }

        let (dataset, duplicates) = builder.build();
        report.duplicates = duplicates;
        Ok((dataset, report))
    }

    /// Read `<dir>/train.txt`.
    ///
    /// A missing directory, a missing `train.txt` or a file without a
    /// single valid triple are all fatal.
    pub fn read_dir(dir: impl AsRef<Path>) -> Result<(Dataset, LoadReport)> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::MissingInput(dir.to_path_buf()));
        }
        let path = dir.join(TRAIN_FILE);
        if !path.is_file() {
            return Err(Error::MissingInput(path));
        }
        let file = File::open(&path).map_err(|e| Error::io(&path, e))?;
        let (dataset, report) = Self::read(BufReader::new(file), &path)?;
        if dataset.is_empty() {
            return Err(Error::EmptyDataset(dir.display().to_string()));
        }
        Ok((dataset, report))
    }

    /// Write triples, resolving ids through `vocab`.
    pub fn write<W: Write>(writer: W, triples: &[Triple], vocab: &Vocab, origin: &Path) -> Result<()> {
        let mut writer = BufWriter::new(writer);
        for triple in triples {
            let (h, r, t) = vocab.resolve(triple).ok_or(Error::ForeignTriple(*triple))?;
            writeln!(writer, "{h}\t{r}\t{t}").map_err(|e| Error::io(origin, e))?;
        }
        writer.flush().map_err(|e| Error::io(origin, e))
    }

    /// Write `partitions/part_<id>.tsv` under `dir`.
    pub fn write_partition(dir: &Path, partition: &Partition, vocab: &Vocab) -> Result<PathBuf> {
        let parts_dir = dir.join(PARTITIONS_DIR);
        fs::create_dir_all(&parts_dir).map_err(|e| Error::io(&parts_dir, e))?;
        let path = parts_dir.join(format!("part_{}.tsv", partition.id));
        let file = File::create(&path).map_err(|e| Error::io(&path, e))?;
        Self::write(file, &partition.triples, vocab, &path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_tab_separated() {
        assert_eq!(
            Tsv::parse_line("/m/01\t/film/genre\t/m/02"),
            Some(["/m/01", "/film/genre", "/m/02"])
        );
    }

    #[test]
    fn test_tab_fields_may_contain_spaces() {
        assert_eq!(
            Tsv::parse_line("New York\tlocated in\tUSA"),
            Some(["New York", "located in", "USA"])
        );
    }

    #[test]
    fn test_whitespace_fallback() {
        assert_eq!(Tsv::parse_line("  a   r  b "), Some(["a", "r", "b"]));
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(Tsv::parse_line(""), None);
        assert_eq!(Tsv::parse_line("a b"), None);
        assert_eq!(Tsv::parse_line("a b c d"), None);
    }

    #[test]
    fn test_read_reports_skips_and_duplicates() {
        let input = "a\tr\tb\n\nbroken line here too\nb\tr\tc\na\tr\tb\n";
        let (ds, report) = Tsv::read(Cursor::new(input), Path::new("mem")).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(report.lines, 4);
        assert_eq!(report.malformed, 1);
        assert_eq!(report.duplicates, 1);
    }

    #[test]
    fn test_read_dir_missing() {
        let err = Tsv::read_dir("/definitely/not/here").unwrap_err();
        assert!(matches!(err, Error::MissingInput(_)));
    }

    #[test]
    fn test_read_dir_empty_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(TRAIN_FILE), "only two\n\n").unwrap();
        let err = Tsv::read_dir(dir.path()).unwrap_err();
        assert!(matches!(err, Error::EmptyDataset(_)));
    }

    #[test]
    fn test_write_partition_layout() {
        let ds = Dataset::from_names([("a", "r", "b"), ("b", "s", "c")]);
        let dir = tempfile::tempdir().unwrap();
        let part = Partition::new(3, ds.triples().to_vec());

        let path = Tsv::write_partition(dir.path(), &part, ds.vocab()).unwrap();
        assert!(path.ends_with("partitions/part_3.tsv"));
        assert_eq!(fs::read_to_string(path).unwrap(), "a\tr\tb\nb\ts\tc\n");
    }

    #[test]
    fn test_write_rejects_foreign_triple() {
        let vocab = Vocab::new();
        let t = Triple::new(crate::EntityId(7), crate::RelationId(0), crate::EntityId(8));
        let err = Tsv::write(Vec::new(), &[t], &vocab, Path::new("mem")).unwrap_err();
        assert!(matches!(err, Error::ForeignTriple(_)));
    }
}
