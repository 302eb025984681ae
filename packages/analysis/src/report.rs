//! Aggregation of review scores across a directory of review files.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use reviewbench_shared::{ReviewFilter, REVIEW_EXTENSION};
use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::plot::render_histograms;
use crate::scores::{extract_scores_from_file, ReviewScores, ScoreField};
use crate::stats::FieldStats;

/// Default directory for rendered images.
pub const DEFAULT_IMAGE_DIR: &str = "analyze_image";

/// What to analyze and where to put the image.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Flat directory of review files.
    pub output_dir: PathBuf,
    pub filter: ReviewFilter,
    /// Created on demand when an image is rendered.
    pub image_dir: PathBuf,
    /// Chart font; see [`crate::plot::resolve_font`].
    pub font: Option<PathBuf>,
}

impl AnalysisOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            filter: ReviewFilter::default(),
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            font: None,
        }
    }

    pub fn with_filter(mut self, filter: ReviewFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_image_dir(mut self, image_dir: impl Into<PathBuf>) -> Self {
        self.image_dir = image_dir.into();
        self
    }

    pub fn with_font(mut self, font: Option<PathBuf>) -> Self {
        self.font = font;
        self
    }
}

/// Scores extracted from one review file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileScores {
    pub file_name: String,
    pub scores: ReviewScores,
}

/// Result of analyzing a filtered set of review files.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub output_dir: PathBuf,
    pub filter: ReviewFilter,
    pub files: Vec<FileScores>,
    /// Only fields seen in at least one file.
    pub stats: BTreeMap<ScoreField, FieldStats>,
    /// Rendered image, absent when no field was found.
    pub image: Option<PathBuf>,
}

impl AnalysisReport {
    /// Write the report as pretty JSON.
    pub fn write_summary(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Review files in `dir` that pass `filter`, sorted by file name.
///
/// Only regular files with the `.txt` extension are considered.
pub fn select_review_files(dir: &Path, filter: &ReviewFilter) -> Result<Vec<PathBuf>> {
    let suffix = format!(".{REVIEW_EXTENSION}");
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            tracing::warn!(path = %entry.path().display(), "skipping non-UTF-8 file name");
            continue;
        };
        // Follows symlinks, so linked review files are read too
        if !name.ends_with(&suffix) || !entry.path().is_file() {
            continue;
        }
        if filter.matches(name) {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

/// Image file name for a filter combination.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use reviewbench_analysis::report::image_file_name;
/// use reviewbench_shared::ReviewFilter;
///
/// let filter = ReviewFilter::new(Some("gpt-5".into()), Some("a0kq0tJwwn".into()));
/// assert_eq!(image_file_name(Path::new("output_openai"), &filter), "gpt-5_a0kq0tJwwn.png");
/// assert_eq!(
///     image_file_name(Path::new("runs/output_openai"), &ReviewFilter::default()),
///     "output_openai_all.png"
/// );
/// ```
pub fn image_file_name(output_dir: &Path, filter: &ReviewFilter) -> String {
    match (&filter.model, &filter.document) {
        (Some(model), Some(document)) => format!("{model}_{document}.png"),
        (Some(model), None) => format!("{model}_all.png"),
        (None, Some(document)) => format!("all_models_{document}.png"),
        (None, None) => {
            let base = output_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("{base}_all.png")
        }
    }
}

/// Filter values end up in the image file name, so they must not contain
/// path separators.
pub fn check_filter(filter: &ReviewFilter) -> Result<()> {
    for value in [&filter.model, &filter.document].into_iter().flatten() {
        if value.contains(['/', '\\']) {
            return Err(AnalysisError::InvalidFilter(value.clone()));
        }
    }
    Ok(())
}

/// Group values by field across files and compute statistics for every
/// field that occurs at least once.
pub fn collect_stats(files: &[FileScores]) -> BTreeMap<ScoreField, FieldStats> {
    ScoreField::ALL
        .iter()
        .filter_map(|field| {
            let values: Vec<u32> = files.iter().filter_map(|f| f.scores.get(*field)).collect();
            FieldStats::from_values(&values).map(|stats| (*field, stats))
        })
        .collect()
}

/// Analyze the review files selected by `options`.
///
/// Returns `Ok(None)` when no file matches. When files match but none
/// contains a score, the report has empty statistics and no image.
pub fn analyze_reviews(options: &AnalysisOptions) -> Result<Option<AnalysisReport>> {
    check_filter(&options.filter)?;

    let paths = select_review_files(&options.output_dir, &options.filter)?;
    if paths.is_empty() {
        tracing::info!(dir = %options.output_dir.display(), "no matching review files");
        return Ok(None);
    }

    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        let scores = extract_scores_from_file(path)?;
        if scores.is_empty() {
            tracing::debug!(path = %path.display(), "no scores found in review");
        }
        files.push(FileScores {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            scores,
        });
    }

    let stats = collect_stats(&files);

    let image = if stats.is_empty() {
        None
    } else {
        let image = options
            .image_dir
            .join(image_file_name(&options.output_dir, &options.filter));
        let title = format!(
            "Review Scores Distribution Analysis - {}",
            options.output_dir.display()
        );
        fs::create_dir_all(&options.image_dir)?;
        render_histograms(&image, &title, &stats, options.font.as_deref())?;
        Some(image)
    };

    Ok(Some(AnalysisReport {
        output_dir: options.output_dir.clone(),
        filter: options.filter.clone(),
        files,
        stats,
        image,
    }))
}
