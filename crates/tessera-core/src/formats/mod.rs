//! On-disk triple formats.
//!
//! - [`tsv`] - `head<TAB>relation<TAB>tail`, one triple per line (the
//!   `train.txt` / `part_<id>.tsv` layout)

pub mod tsv;
