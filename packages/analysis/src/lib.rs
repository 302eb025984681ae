//! reviewbench analysis - Review score statistics and histograms.
//!
//! Reads the review files written by the harvester, pulls five numeric
//! scores out of each with pattern matching, and summarizes them per field.
//!
//! # Example
//!
//! ```
//! use reviewbench_analysis::scores::{extract_scores, ScoreField};
//! use reviewbench_analysis::stats::FieldStats;
//!
//! let ratings: Vec<u32> = ["Rating: 6", "## Rating: **8**", "rating: 6"]
//!     .iter()
//!     .filter_map(|text| extract_scores(text).get(ScoreField::Rating))
//!     .collect();
//! let stats = FieldStats::from_values(&ratings).unwrap();
//! assert_eq!(stats.median, 6.0);
//! ```
//!
//! # Architecture
//!
//! - [`scores`]: Per-field score extraction
//! - [`stats`]: Descriptive statistics
//! - [`report`]: File selection and aggregation
//! - [`plot`]: Histogram rendering
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod error;
pub mod plot;
pub mod report;
pub mod scores;
pub mod stats;

pub use error::{AnalysisError, Result};
pub use report::{analyze_reviews, AnalysisOptions, AnalysisReport};
pub use scores::{extract_scores, ReviewScores, ScoreField};
pub use stats::FieldStats;
