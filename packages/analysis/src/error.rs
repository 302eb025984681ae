//! Error types for the analysis side.

use thiserror::Error;

/// Main error type for the analysis library.
///
/// Score extraction itself never fails: a field missing from a review is
/// simply absent. Errors come from the filesystem, the chart renderer, the
/// JSON export, and filter values unfit for an image file name.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Chart drawing or PNG encoding failed.
    #[error("Failed to render chart: {0}")]
    Render(String),

    /// No TrueType font could be loaded for chart text.
    #[error("Chart font unavailable: {0}")]
    FontUnavailable(String),

    /// A model or document filter that would escape the image directory.
    #[error("Invalid filter value '{0}': must not contain path separators")]
    InvalidFilter(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
