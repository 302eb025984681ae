//! reviewbench harvester - Collect repeated LLM reviews of a PDF document.
//!
//! The harvester sends one document plus reviewer guidance to several LLM
//! providers, several times per model, and stores every answer as a text
//! file named `{model}_{document}_{attempt}.txt`.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use reviewbench_harvester::config::ProviderKind;
//!
//! let kind: ProviderKind = "claude".parse().unwrap();
//! assert_eq!(kind.default_models(), ["claude-sonnet-4-5", "claude-haiku-4-5"]);
//! assert_eq!(kind.output_dir(Path::new("output")), Path::new("output/output_claude"));
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants, provider kinds and settings
//! - [`error`]: Error types and Result alias
//! - [`http`]: Blocking HTTP client and JSON request helper
//! - [`document`]: Document loading and base64 encoding
//! - [`providers`]: One adapter per LLM vendor
//! - [`batch`]: Sequential, resumable batch runner
//! - [`cli`]: Command-line interface

pub mod batch;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod http;
pub mod providers;

pub use batch::{
    default_targets, run_batch, AttemptOutcome, BatchReport, ProviderTarget, ReviewJob,
};
pub use config::{ProviderKind, ProviderSettings};
pub use error::{HarvesterError, ProviderError, Result};
pub use providers::{build_provider, ReviewProvider, ReviewRequest};
