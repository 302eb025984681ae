//! Command-line interface for the analysis tool.

use std::path::PathBuf;

use clap::Parser;
use console::style;
use reviewbench_shared::ReviewFilter;

use crate::error::Result;
use crate::plot::format_optional;
use crate::report::{analyze_reviews, AnalysisOptions, AnalysisReport, DEFAULT_IMAGE_DIR};
use crate::stats::FieldStats;

/// reviewbench analyze - Score statistics and histograms for collected reviews.
#[derive(Parser)]
#[command(name = "reviewbench-analyze")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory containing review text files
    pub output_dir: PathBuf,

    /// Only files whose name starts with this model name
    #[arg(long)]
    pub model: Option<String>,

    /// Only files for this document name
    #[arg(long)]
    pub document: Option<String>,

    /// Directory for the rendered histogram image
    #[arg(long, default_value = DEFAULT_IMAGE_DIR)]
    pub image_dir: PathBuf,

    /// TrueType font for chart text (defaults to $REVIEWBENCH_FONT or a system font)
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Also write statistics and per-file scores as JSON
    #[arg(long)]
    pub summary_json: Option<PathBuf>,
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = ReviewFilter::new(cli.model, cli.document);
    let options = AnalysisOptions::new(&cli.output_dir)
        .with_filter(filter)
        .with_image_dir(cli.image_dir)
        .with_font(cli.font);

    let Some(report) = analyze_reviews(&options)? else {
        println!(
            "No matching files found in {} for model={}, document={}",
            cli.output_dir.display(),
            options.filter.model.as_deref().unwrap_or("None"),
            options.filter.document.as_deref().unwrap_or("None"),
        );
        return Ok(());
    };

    print_report(&report);

    if let Some(path) = &cli.summary_json {
        report.write_summary(path)?;
        println!("Summary written to: {}", style(path.display()).cyan());
    }

    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!(
        "Found {} review files in {}",
        report.files.len(),
        report.output_dir.display()
    );

    for file in &report.files {
        println!("File: {}", file.file_name);
        for (field, value) in file.scores.iter() {
            println!("  {field}: {value}");
        }
        println!();
    }

    println!("{}", "=".repeat(60));
    println!("{}", style("STATISTICS SUMMARY").bold());
    println!("{}", "=".repeat(60));

    for (field, stats) in &report.stats {
        println!();
        println!("{}:", style(field.as_str().to_uppercase()).bold());
        print_field_stats(stats);
    }

    println!();
    println!("{}", "=".repeat(60));

    match &report.image {
        Some(image) => {
            println!();
            println!(
                "{} {}",
                style("Visualization saved to:").green(),
                style(image.display()).cyan()
            );
        }
        None => println!("No scores found; no visualization written."),
    }
}

fn print_field_stats(stats: &FieldStats) {
    let distribution = stats
        .distribution
        .iter()
        .map(|(value, count)| format!("{value}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");

    println!("  Count: {}", stats.count);
    println!("  Mean: {:.2}", stats.mean);
    println!("  Std: {}", format_optional(stats.std_dev));
    println!("  Variance: {}", format_optional(stats.variance));
    println!("  Min: {}", stats.min);
    println!("  Max: {}", stats.max);
    println!("  Median: {:.1}", stats.median);
    println!("  Distribution: {{{distribution}}}");
}
