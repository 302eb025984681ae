//! Batch runner: repeated reviews of one document across providers and models.
//!
//! Attempts run strictly in sequence: providers in declared order, models in
//! declared order, attempt indices ascending. An existing output file marks an
//! attempt as done, so rerunning a batch only fills the gaps.

use std::fs;
use std::path::{Path, PathBuf};

use reviewbench_shared::{document_name, ReviewFile};

use crate::config::{ProviderKind, USER_PROMPT};
use crate::error::{HarvesterError, Result};
use crate::providers::{ReviewProvider, ReviewRequest};

/// The document and instructions a batch reviews.
#[derive(Debug, Clone)]
pub struct ReviewJob {
    pub document: PathBuf,
    /// Name used in output file names (see [`document_name`]).
    pub document_name: String,
    pub guidance: String,
    pub prompt: String,
    pub tries: usize,
}

impl ReviewJob {
    /// Check both input files exist and read the guidance.
    pub fn load(document: &Path, guidance_path: &Path, tries: usize) -> Result<Self> {
        if !document.exists() {
            return Err(HarvesterError::DocumentNotFound(document.to_path_buf()));
        }
        if !guidance_path.exists() {
            return Err(HarvesterError::GuidanceNotFound(guidance_path.to_path_buf()));
        }

        let guidance = fs::read_to_string(guidance_path)?;

        Ok(Self {
            document: document.to_path_buf(),
            document_name: document_name(document),
            guidance,
            prompt: USER_PROMPT.to_string(),
            tries,
        })
    }
}

/// One provider with the models to run and where their reviews go.
pub struct ProviderTarget<'a> {
    pub provider: &'a dyn ReviewProvider,
    pub models: Vec<String>,
    pub output_dir: PathBuf,
}

impl<'a> ProviderTarget<'a> {
    /// Target with the provider's default models under `output_base`.
    pub fn with_defaults(provider: &'a dyn ReviewProvider, output_base: &Path) -> Self {
        let kind = provider.kind();
        Self {
            provider,
            models: kind.default_models().iter().map(|m| m.to_string()).collect(),
            output_dir: kind.output_dir(output_base),
        }
    }
}

/// The fixed provider configuration: one target per provider with its
/// default models, ordered openai, claude, gemini whatever the order of
/// `providers`.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use reviewbench_harvester::batch::default_targets;
///
/// let targets = default_targets(&[], Path::new("output"));
/// assert!(targets.is_empty());
/// ```
pub fn default_targets<'a>(
    providers: &'a [Box<dyn ReviewProvider>],
    output_base: &Path,
) -> Vec<ProviderTarget<'a>> {
    ProviderKind::ALL
        .iter()
        .flat_map(|kind| providers.iter().filter(move |p| p.kind() == *kind))
        .map(|provider| ProviderTarget::with_defaults(provider.as_ref(), output_base))
        .collect()
}

/// What happened to one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Review written to the path.
    Written(PathBuf),
    /// Output file already present; no request made.
    Skipped(PathBuf),
    /// Request or write failed; no file written.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct AttemptRecord {
    pub provider: ProviderKind,
    pub file: ReviewFile,
    pub outcome: AttemptOutcome,
}

/// Per-attempt records of a finished batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub records: Vec<AttemptRecord>,
}

impl BatchReport {
    #[must_use]
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, AttemptOutcome::Written(_)))
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, AttemptOutcome::Skipped(_)))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, AttemptOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&AttemptOutcome) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Progress callbacks for a running batch. All methods default to no-ops.
pub trait BatchObserver {
    fn provider_started(&mut self, _provider: ProviderKind, _output_dir: &Path) {}

    fn model_started(&mut self, _provider: ProviderKind, _model: &str) {}

    /// Called before the existence check; `total` is the attempt count.
    fn attempt_started(&mut self, _file: &ReviewFile, _total: usize) {}

    fn attempt_finished(&mut self, _record: &AttemptRecord) {}

    fn provider_finished(&mut self, _provider: ProviderKind) {}
}

impl BatchObserver for () {}

/// Run every attempt of `job` against `targets`.
///
/// Only failing to create an output directory aborts the batch. Provider
/// and write errors are logged, recorded as [`AttemptOutcome::Failed`], and
/// the next attempt proceeds.
pub fn run_batch(
    job: &ReviewJob,
    targets: &[ProviderTarget<'_>],
    observer: &mut dyn BatchObserver,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    for target in targets {
        let kind = target.provider.kind();
        fs::create_dir_all(&target.output_dir)?;
        observer.provider_started(kind, &target.output_dir);

        for model in &target.models {
            observer.model_started(kind, model);

            for attempt in 0..job.tries {
                let file = ReviewFile::new(model.as_str(), job.document_name.as_str(), attempt);
                observer.attempt_started(&file, job.tries);

                let outcome = run_attempt(job, target, &file);
                let record = AttemptRecord {
                    provider: kind,
                    file,
                    outcome,
                };
                observer.attempt_finished(&record);
                report.records.push(record);
            }
        }

        observer.provider_finished(kind);
    }

    tracing::info!(
        written = report.written(),
        skipped = report.skipped(),
        failed = report.failed(),
        "batch finished"
    );

    Ok(report)
}

fn run_attempt(job: &ReviewJob, target: &ProviderTarget<'_>, file: &ReviewFile) -> AttemptOutcome {
    let path = file.path_in(&target.output_dir);
    let provider = target.provider.kind();

    if path.exists() {
        tracing::debug!(path = %path.display(), "review already exists, skipping");
        return AttemptOutcome::Skipped(path);
    }

    let request = ReviewRequest {
        document: &job.document,
        guidance: &job.guidance,
        prompt: &job.prompt,
        model: &file.model,
    };

    let text = match target.provider.review(&request) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(
                %provider,
                model = %file.model,
                attempt = file.attempt,
                error = %e,
                "review request failed"
            );
            return AttemptOutcome::Failed(e.to_string());
        }
    };

    match fs::write(&path, text) {
        Ok(()) => {
            tracing::info!(%provider, path = %path.display(), "review saved");
            AttemptOutcome::Written(path)
        }
        Err(e) => {
            tracing::error!(%provider, path = %path.display(), error = %e, "failed to save review");
            AttemptOutcome::Failed(format!("failed to write {}: {e}", path.display()))
        }
    }
}
