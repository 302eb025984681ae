//! Review output file naming.
//!
//! Every successful attempt produces `{model}_{document}_{attempt}.txt`.
//! The name doubles as the completion marker used to resume a batch, and the
//! analysis side filters on it with plain string matching.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Extension of review output files.
pub const REVIEW_EXTENSION: &str = "txt";

/// Identity of one review output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewFile {
    /// Model identifier (e.g., "gpt-5-mini").
    pub model: String,

    /// Document name without its `.pdf` extension.
    pub document: String,

    /// Zero-based attempt index.
    pub attempt: usize,
}

impl ReviewFile {
    pub fn new(model: impl Into<String>, document: impl Into<String>, attempt: usize) -> Self {
        Self {
            model: model.into(),
            document: document.into(),
            attempt,
        }
    }

    /// File name of this review.
    ///
    /// # Examples
    /// ```
    /// use reviewbench_shared::ReviewFile;
    ///
    /// let file = ReviewFile::new("gpt-5", "a0kq0tJwwn", 3);
    /// assert_eq!(file.file_name(), "gpt-5_a0kq0tJwwn_3.txt");
    /// ```
    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}.{REVIEW_EXTENSION}",
            self.model, self.document, self.attempt
        )
    }

    /// Full path of this review inside `dir`.
    #[must_use]
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

impl fmt::Display for ReviewFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

/// Derive the document name used in review file names from a document path.
///
/// Only a trailing `.pdf` extension (any case) is removed; other extensions
/// stay part of the name.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use reviewbench_shared::document_name;
///
/// assert_eq!(document_name(Path::new("/data/pdfs/a0kq0tJwwn.pdf")), "a0kq0tJwwn");
/// assert_eq!(document_name(Path::new("paper.PDF")), "paper");
/// assert_eq!(document_name(Path::new("notes.md")), "notes.md");
/// ```
#[must_use]
pub fn document_name(path: &Path) -> String {
    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    let name = if is_pdf {
        path.file_stem()
    } else {
        path.file_name()
    };

    name.map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Selects review files by model-name prefix and/or document-name token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewFilter {
    /// Keep only files whose name starts with this model name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Keep only files whose name contains `_{document}_`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
}

impl ReviewFilter {
    pub fn new(model: Option<String>, document: Option<String>) -> Self {
        Self { model, document }
    }

    /// Whether `file_name` passes both filters.
    ///
    /// The model filter is a plain prefix test, so `gpt-5` also selects
    /// `gpt-5-mini_*` files.
    ///
    /// # Examples
    /// ```
    /// use reviewbench_shared::ReviewFilter;
    ///
    /// let filter = ReviewFilter::new(None, Some("paper".into()));
    /// assert!(filter.matches("gpt-5_paper_0.txt"));
    /// assert!(!filter.matches("gpt-5_paper2_0.txt"));
    /// ```
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        if let Some(model) = self.model.as_deref() {
            if !file_name.starts_with(model) {
                return false;
            }
        }
        if let Some(document) = self.document.as_deref() {
            if !file_name.contains(&format!("_{document}_")) {
                return false;
            }
        }
        true
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.model.is_none() && self.document.is_none()
    }
}
