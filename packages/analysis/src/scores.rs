//! Score extraction from free-text reviews.
//!
//! Reviews follow a loose convention of `Field: N` lines, sometimes written as
//! a markdown heading (`## Soundness: 3`) or with emphasis (`Rating: **6**`).
//! Each field is searched for independently; the first match wins and
//! fields that are not found are left out.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::Result;

/// The numeric fields a review is scored on, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreField {
    Soundness,
    Presentation,
    Contribution,
    Rating,
    Confidence,
}

impl ScoreField {
    pub const ALL: [ScoreField; 5] = [
        Self::Soundness,
        Self::Presentation,
        Self::Contribution,
        Self::Rating,
        Self::Confidence,
    ];

    /// Lowercase key used in reports and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Soundness => "soundness",
            Self::Presentation => "presentation",
            Self::Contribution => "contribution",
            Self::Rating => "rating",
            Self::Confidence => "confidence",
        }
    }

    /// Capitalized label as it appears in review text.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Soundness => "Soundness",
            Self::Presentation => "Presentation",
            Self::Contribution => "Contribution",
            Self::Rating => "Rating",
            Self::Confidence => "Confidence",
        }
    }

    fn pattern(&self) -> &'static Regex {
        &FIELD_PATTERNS[*self as usize]
    }
}

impl fmt::Display for ScoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pattern per field, indexed by discriminant.
#[allow(clippy::expect_used)] // Static regexes that are guaranteed to be valid
static FIELD_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ScoreField::ALL
        .iter()
        .map(|field| {
            Regex::new(&format!(
                r"(?i)(?:##\s*)?{}:\s*\*{{0,2}}([0-9]+)\*{{0,2}}",
                field.title()
            ))
            .expect("valid regex")
        })
        .collect()
});

/// Scores found in one review. Absent fields are simply missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReviewScores(BTreeMap<ScoreField, u32>);

impl ReviewScores {
    pub fn get(&self, field: ScoreField) -> Option<u32> {
        self.0.get(&field).copied()
    }

    pub fn insert(&mut self, field: ScoreField, value: u32) {
        self.0.insert(field, value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Present fields in report order.
    pub fn iter(&self) -> impl Iterator<Item = (ScoreField, u32)> + '_ {
        self.0.iter().map(|(field, value)| (*field, *value))
    }
}

impl FromIterator<(ScoreField, u32)> for ReviewScores {
    fn from_iter<I: IntoIterator<Item = (ScoreField, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Extract every score field present in `text`.
///
/// # Examples
/// ```
/// use reviewbench_analysis::scores::{extract_scores, ScoreField};
///
/// let scores = extract_scores("## Soundness: 3\nconfidence: **4**");
/// assert_eq!(scores.get(ScoreField::Soundness), Some(3));
/// assert_eq!(scores.get(ScoreField::Confidence), Some(4));
/// assert_eq!(scores.get(ScoreField::Rating), None);
/// ```
pub fn extract_scores(text: &str) -> ReviewScores {
    ScoreField::ALL
        .iter()
        .filter_map(|field| {
            let captures = field.pattern().captures(text)?;
            // Too large for u32 counts as absent
            let value = captures.get(1)?.as_str().parse::<u32>().ok()?;
            Some((*field, value))
        })
        .collect()
}

/// Read a review file and extract its scores.
pub fn extract_scores_from_file(path: &Path) -> Result<ReviewScores> {
    let text = fs::read_to_string(path)?;
    Ok(extract_scores(&text))
}
