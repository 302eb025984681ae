//! Command-line interface for the harvester.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use reviewbench_shared::ReviewFile;

use crate::batch::{
    default_targets, run_batch, AttemptOutcome, AttemptRecord, BatchObserver, ReviewJob,
};
use crate::config::{
    ProviderKind, ProviderSettings, DEFAULT_GUIDANCE_PATH, DEFAULT_OUTPUT_DIR, DEFAULT_TRIES,
};
use crate::error::Result;
use crate::http::create_client;
use crate::providers::{build_provider, ReviewProvider};

/// reviewbench harvester - Collect repeated LLM reviews of a paper.
#[derive(Parser)]
#[command(name = "reviewbench-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate reviews for a paper using every configured provider and model.
    Generate {
        /// Path to the PDF file
        #[arg(long = "pdf-path", visible_alias = "pdf_path")]
        pdf_path: PathBuf,

        /// Path to the reviewer guidance file
        #[arg(long, default_value = DEFAULT_GUIDANCE_PATH)]
        guidance: PathBuf,

        /// Number of times to call each model
        #[arg(long, default_value_t = DEFAULT_TRIES)]
        tries: usize,

        /// Base output directory
        #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Only run these providers (openai, claude, gemini); repeatable
        #[arg(long = "provider", value_parser = parse_provider)]
        providers: Vec<ProviderKind>,
    },
}

fn parse_provider(s: &str) -> std::result::Result<ProviderKind, String> {
    s.parse().map_err(|e: crate::error::HarvesterError| e.to_string())
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            pdf_path,
            guidance,
            tries,
            output,
            providers,
        } => generate_command(&pdf_path, &guidance, tries, &output, &providers),
    }
}

/// Execute the generate command.
fn generate_command(
    pdf_path: &Path,
    guidance: &Path,
    tries: usize,
    output: &Path,
    providers: &[ProviderKind],
) -> Result<()> {
    // Validate inputs before making HTTP requests
    let job = ReviewJob::load(pdf_path, guidance, tries)?;

    println!(
        "{} {}",
        style("Starting review generation for:").bold(),
        style(pdf_path.display()).cyan()
    );
    println!("Reviewer guidance: {}", guidance.display());
    println!("Attempts per model: {tries}");
    println!("Output directory: {}", output.display());

    let kinds: Vec<ProviderKind> = if providers.is_empty() {
        ProviderKind::ALL.to_vec()
    } else {
        ProviderKind::ALL
            .into_iter()
            .filter(|k| providers.contains(k))
            .collect()
    };

    let client = create_client()?;
    let adapters: Vec<Box<dyn ReviewProvider>> = kinds
        .iter()
        .map(|kind| build_provider(ProviderSettings::from_env(*kind), client.clone()))
        .collect();
    let targets = default_targets(&adapters, output);

    let mut observer = ConsoleObserver::default();
    let report = run_batch(&job, &targets, &mut observer)?;

    println!();
    println!("{}", "=".repeat(60));
    println!(
        "{} {} written, {} skipped, {} failed",
        style("All reviews processed:").green().bold(),
        report.written(),
        report.skipped(),
        style(report.failed()).yellow()
    );
    println!("{}", "=".repeat(60));

    Ok(())
}

/// Prints batch progress, with a spinner while a request is in flight.
#[derive(Default)]
struct ConsoleObserver {
    spinner: Option<ProgressBar>,
}

impl ConsoleObserver {
    fn finish_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}

impl BatchObserver for ConsoleObserver {
    fn provider_started(&mut self, provider: ProviderKind, _output_dir: &Path) {
        println!();
        println!("{}", "=".repeat(60));
        println!("Processing {} API", provider.as_str().to_uppercase());
        println!("{}", "=".repeat(60));
    }

    fn model_started(&mut self, provider: ProviderKind, model: &str) {
        println!();
        println!(
            "[{}] Using model: {}",
            provider.as_str().to_uppercase(),
            style(model).cyan()
        );
    }

    fn attempt_started(&mut self, file: &ReviewFile, total: usize) {
        let pb = ProgressBar::new_spinner();
        #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.green} {msg}")
                .expect("valid template"),
        );
        pb.set_message(format!("Attempt {}/{total}...", file.attempt + 1));
        pb.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(pb);
    }

    fn attempt_finished(&mut self, record: &AttemptRecord) {
        self.finish_spinner();
        let label = format!("  Attempt {}", record.file.attempt + 1);
        match &record.outcome {
            AttemptOutcome::Written(_) => println!("{label} {}", style("Done.").green()),
            AttemptOutcome::Skipped(_) => println!("{label} Already exists, skipping."),
            AttemptOutcome::Failed(message) => {
                println!("{label} {} {message}", style("Error:").red().bold());
            }
        }
    }

    fn provider_finished(&mut self, provider: ProviderKind) {
        self.finish_spinner();
        println!();
        println!("[{}] Completed!", provider.as_str().to_uppercase());
    }
}
