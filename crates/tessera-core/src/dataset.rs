//! In-memory triple set plus the vocabulary that names it.

use crate::{Triple, Vocab};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A de-duplicated list of triples in input order.
///
/// # Example
///
/// ```rust
/// use tessera_core::Dataset;
///
/// let ds = Dataset::from_names([
///     ("a", "r", "b"),
///     ("b", "r", "c"),
///     ("a", "r", "b"), // duplicate, dropped
/// ]);
/// assert_eq!(ds.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    vocab: Vocab,
    triples: Vec<Triple>,
}

impl Dataset {
    /// Start an incremental build.
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    /// Build from `(head, relation, tail)` names, dropping duplicates.
    pub fn from_names<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    {
        let mut builder = Self::builder();
        for (h, r, t) in rows {
            builder.add(h, r, t);
        }
        builder.build().0
    }

    /// The triples, first occurrence order.
    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// The name table.
    pub fn vocab(&self) -> &Vocab {
        &self.vocab
    }

    /// Number of triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// True when there are no triples.
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

/// Incremental [`Dataset`] construction with duplicate tracking.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    vocab: Vocab,
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
    duplicates: usize,
}

impl DatasetBuilder {
    /// Add a triple by name. Returns `false` if it was already present.
    pub fn add(&mut self, head: &str, relation: &str, tail: &str) -> bool {
        let triple = self.vocab.triple(head, relation, tail);
        if self.seen.insert(triple) {
            self.triples.push(triple);
            true
        } else {
            self.duplicates += 1;
            false
        }
    }

    /// Finish, returning the dataset and the number of duplicates dropped.
    pub fn build(self) -> (Dataset, usize) {
        (
            Dataset {
                vocab: self.vocab,
                triples: self.triples,
            },
            self.duplicates,
        )
    }
}

/// Bookkeeping from reading a triple file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Non-empty lines seen.
    pub lines: usize,
    /// Lines that did not split into exactly three fields.
    pub malformed: usize,
    /// Repeated triples dropped.
    pub duplicates: usize,
}
