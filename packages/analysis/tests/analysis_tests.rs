//! End-to-end analysis over a directory of review files.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use reviewbench_analysis::plot::{resolve_font, IMAGE_SIZE};
use reviewbench_analysis::{analyze_reviews, AnalysisError, AnalysisOptions, ScoreField};
use reviewbench_shared::ReviewFilter;

fn write_review(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

/// Five gpt-5 reviews with soundness 1..=5 plus distractors.
fn populate(dir: &Path) {
    for (attempt, soundness) in (1..=5).enumerate() {
        write_review(
            dir,
            &format!("gpt-5_a0kq0tJwwn_{attempt}.txt"),
            &format!("## Soundness: {soundness}\n## Rating: **6**\nConfidence: 4"),
        );
    }
    write_review(dir, "gpt-5-mini_a0kq0tJwwn_0.txt", "Soundness: 2");
    write_review(dir, "gpt-5_other_0.txt", "Soundness: 1");
    write_review(dir, "readme.md", "Soundness: 4");
}

fn font_available() -> bool {
    resolve_font(None).is_ok()
}

#[test]
fn test_missing_explicit_font_fails_render() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());

    let options = AnalysisOptions::new(dir.path())
        .with_filter(ReviewFilter::new(
            Some("gpt-5_".to_string()),
            Some("a0kq0tJwwn".to_string()),
        ))
        .with_image_dir(dir.path().join("images"))
        .with_font(Some(dir.path().join("missing.ttf")));

    let err = analyze_reviews(&options).unwrap_err();
    assert!(matches!(err, AnalysisError::FontUnavailable(_)));
    assert!(!dir.path().join("images").join("gpt-5__a0kq0tJwwn.png").exists());
}

#[test]
fn test_statistics_for_known_values() {
    if !font_available() {
        eprintln!("skipping: no chart font available");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());
    let image_dir = dir.path().join("images");

    let options = AnalysisOptions::new(dir.path())
        .with_filter(ReviewFilter::new(
            Some("gpt-5".to_string()),
            Some("a0kq0tJwwn".to_string()),
        ))
        .with_image_dir(&image_dir);

    let report = analyze_reviews(&options).unwrap().unwrap();

    // Prefix filter also picks up gpt-5-mini
    assert_eq!(report.files.len(), 6);

    let soundness = &report.stats[&ScoreField::Soundness];
    assert_eq!(soundness.count, 6);
    assert_eq!(soundness.min, 1);
    assert_eq!(soundness.max, 5);

    let rating = &report.stats[&ScoreField::Rating];
    assert_eq!(rating.count, 5);
    assert_eq!(rating.mean, 6.0);
    assert_eq!(rating.std_dev, Some(0.0));

    assert!(!report.stats.contains_key(&ScoreField::Presentation));

    let image = report.image.unwrap();
    assert_eq!(image, image_dir.join("gpt-5_a0kq0tJwwn.png"));
    let (width, height) = image::image_dimensions(&image).unwrap();
    assert_eq!((width, height), IMAGE_SIZE);
}

#[test]
fn test_one_to_five_soundness() {
    if !font_available() {
        eprintln!("skipping: no chart font available");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let reviews = dir.path().join("output_openai");
    fs::create_dir(&reviews).unwrap();
    populate(&reviews);
    fs::remove_file(reviews.join("gpt-5-mini_a0kq0tJwwn_0.txt")).unwrap();
    fs::remove_file(reviews.join("gpt-5_other_0.txt")).unwrap();

    let image_dir = dir.path().join("images");
    let options = AnalysisOptions::new(&reviews).with_image_dir(&image_dir);
    let report = analyze_reviews(&options).unwrap().unwrap();

    let soundness = &report.stats[&ScoreField::Soundness];
    assert_eq!(soundness.count, 5);
    assert_eq!(soundness.mean, 3.0);
    assert_eq!(soundness.median, 3.0);
    assert_eq!(soundness.min, 1);
    assert_eq!(soundness.max, 5);
    assert_eq!(
        report.image,
        Some(image_dir.join("output_openai_all.png"))
    );
    assert!(image_dir.join("output_openai_all.png").is_file());
}

#[test]
fn test_empty_selection_reports_nothing() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());
    let image_dir = dir.path().join("images");

    let options = AnalysisOptions::new(dir.path())
        .with_filter(ReviewFilter::new(Some("claude".to_string()), None))
        .with_image_dir(&image_dir);

    assert!(analyze_reviews(&options).unwrap().is_none());
    assert!(!image_dir.exists());
}

#[test]
fn test_summary_json_without_scores() {
    let dir = tempfile::tempdir().unwrap();
    write_review(dir.path(), "gemini-2.5-flash_doc_0.txt", "no scores");
    write_review(dir.path(), "gemini-2.5-flash_doc_1.txt", "still none");

    let options =
        AnalysisOptions::new(dir.path()).with_image_dir(dir.path().join("images"));
    let report = analyze_reviews(&options).unwrap().unwrap();

    let summary = dir.path().join("summary.json");
    report.write_summary(&summary).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(json["files"].as_array().unwrap().len(), 2);
    assert_eq!(json["files"][0]["file_name"], "gemini-2.5-flash_doc_0.txt");
    assert_eq!(json["stats"], serde_json::json!({}));
    assert_eq!(json["filter"], serde_json::json!({}));
}
