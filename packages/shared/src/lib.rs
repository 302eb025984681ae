//! Types shared between the reviewbench harvester and analysis crates.
//!
//! The harvester writes one text file per review attempt and the analysis
//! reads them back. Both sides agree on the file naming through
//! [`naming::ReviewFile`] and [`naming::ReviewFilter`].

pub mod naming;

pub use naming::{document_name, ReviewFile, ReviewFilter, REVIEW_EXTENSION};
