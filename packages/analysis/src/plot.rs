//! Histogram rendering.
//!
//! Draws one bar chart per score field in a 2x3 grid and writes it as PNG.
//! Text is rasterized from a TrueType font registered with plotters at
//! runtime, so no system font library is needed.

use std::collections::BTreeMap;
use std::env;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::{AnalysisError, Result};
use crate::scores::ScoreField;
use crate::stats::FieldStats;

/// Pixel size of the rendered image.
pub const IMAGE_SIZE: (u32, u32) = (1500, 1000);

/// Environment variable naming a TTF file for chart text.
pub const FONT_ENV_VAR: &str = "REVIEWBENCH_FONT";

const FONT_FAMILY: &str = "sans-serif";

/// Searched in order when no font is given explicitly.
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const STEEL_BLUE: RGBColor = RGBColor(70, 130, 180);
const WHEAT: RGBColor = RGBColor(245, 222, 179);

/// Font currently registered with plotters, if any.
static REGISTERED_FONT: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Pick the chart font: `explicit`, then `$REVIEWBENCH_FONT`, then the first
/// existing system font.
pub fn resolve_font(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return existing_font(path.to_path_buf());
    }

    if let Ok(path) = env::var(FONT_ENV_VAR) {
        if !path.is_empty() {
            return existing_font(PathBuf::from(path));
        }
    }

    SYSTEM_FONT_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
        .ok_or_else(|| {
            AnalysisError::FontUnavailable(format!(
                "no system font found; pass --font or set {FONT_ENV_VAR}"
            ))
        })
}

fn existing_font(path: PathBuf) -> Result<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(AnalysisError::FontUnavailable(format!(
            "font file not found: {}",
            path.display()
        )))
    }
}

/// Register `path` as the chart font family unless it already is.
///
/// plotters keeps font data for the life of the process, so the bytes are
/// leaked once per distinct font.
fn ensure_font_registered(path: &Path) -> Result<()> {
    let mut registered = REGISTERED_FONT
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if registered.as_deref() == Some(path) {
        return Ok(());
    }

    let bytes: &'static [u8] = Box::leak(fs::read(path)?.into_boxed_slice());
    for style in [FontStyle::Normal, FontStyle::Bold] {
        register_font(FONT_FAMILY, style, bytes).map_err(|_| {
            AnalysisError::FontUnavailable(format!(
                "not a usable TrueType font: {}",
                path.display()
            ))
        })?;
    }

    tracing::debug!(font = %path.display(), "registered chart font");
    *registered = Some(path.to_path_buf());
    Ok(())
}

/// Render one histogram per field in `stats` into a PNG at `output`.
///
/// Fields without statistics leave their grid cell blank, as does the sixth
/// cell.
pub fn render_histograms(
    output: &Path,
    title: &str,
    stats: &BTreeMap<ScoreField, FieldStats>,
    font: Option<&Path>,
) -> Result<()> {
    let font = resolve_font(font)?;
    ensure_font_registered(&font)?;

    draw_figure(output, title, stats).map_err(|e| AnalysisError::Render(e.to_string()))?;

    tracing::info!(path = %output.display(), fields = stats.len(), "histograms rendered");
    Ok(())
}

fn draw_figure(
    output: &Path,
    title: &str,
    stats: &BTreeMap<ScoreField, FieldStats>,
) -> std::result::Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(output, IMAGE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let body = root.titled(title, (FONT_FAMILY, 32).into_font().style(FontStyle::Bold))?;
    let cells = body.split_evenly((2, 3));

    for (field, cell) in ScoreField::ALL.iter().zip(cells.iter()) {
        if let Some(field_stats) = stats.get(field) {
            draw_field(cell, *field, field_stats)?;
        }
    }

    root.present()?;
    Ok(())
}

fn draw_field(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    field: ScoreField,
    stats: &FieldStats,
) -> std::result::Result<(), Box<dyn Error>> {
    let (x_start, x_end) = x_range(stats);
    let max_freq = u32::try_from(stats.max_frequency()).unwrap_or(u32::MAX);
    // Headroom above the tallest bar for the stats box
    let y_end = max_freq.saturating_add(max_freq / 3).saturating_add(1);

    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("{} Distribution", field.title()),
            (FONT_FAMILY, 22).into_font().style(FontStyle::Bold),
        )
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(50)
        .build_cartesian_2d((x_start..x_end).into_segmented(), 0u32..y_end)?;

    // X labels are drawn below at the observed values only
    chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(WHITE)
        .bold_line_style(BLACK.mix(0.15))
        .x_labels(1)
        .x_label_formatter(&|_: &SegmentValue<u64>| String::new())
        .y_label_formatter(&|y: &u32| y.to_string())
        .x_desc("Score")
        .y_desc("Frequency")
        .axis_desc_style((FONT_FAMILY, 16))
        .label_style((FONT_FAMILY, 14))
        .draw()?;

    let bars = || stats.values.iter().map(|v| (u64::from(*v), 1u32));
    chart.draw_series(
        Histogram::vertical(&chart)
            .style(STEEL_BLUE.mix(0.7).filled())
            .margin(10)
            .data(bars()),
    )?;
    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLACK.stroke_width(1))
            .margin(10)
            .data(bars()),
    )?;

    let (origin_x, origin_y) = area.get_base_pixel();
    let label_style = TextStyle::from((FONT_FAMILY, 14).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));
    for value in x_ticks(stats) {
        let (x, y) = chart.backend_coord(&(SegmentValue::CenterOf(value), 0));
        let (x, y) = (x - origin_x, y - origin_y);
        area.draw(&PathElement::new(vec![(x, y), (x, y + 5)], BLACK))?;
        area.draw(&Text::new(value.to_string(), (x, y + 8), label_style.clone()))?;
    }

    let lines = [
        format!("Mean: {:.2}", stats.mean),
        format!("Std: {}", format_optional(stats.std_dev)),
        format!("Median: {:.1}", stats.median),
        format!("Count: {}", stats.count),
    ];
    draw_stats_box(&chart.plotting_area().strip_coord_spec(), &lines)?;

    Ok(())
}

/// Segmented x range covering every observed value. `u64` so that a
/// value of `u32::MAX` still gets its own segment.
fn x_range(stats: &FieldStats) -> (u64, u64) {
    (u64::from(stats.min), u64::from(stats.max) + 1)
}

/// X positions that get a tick label: exactly the observed values.
fn x_ticks(stats: &FieldStats) -> Vec<u64> {
    stats.distribution.keys().map(|&v| u64::from(v)).collect()
}

/// Text box in the top-right corner of a plotting area.
fn draw_stats_box(
    plot: &DrawingArea<BitMapBackend<'_>, Shift>,
    lines: &[String],
) -> std::result::Result<(), Box<dyn Error>> {
    const BOX_WIDTH: i32 = 130;
    const LINE_HEIGHT: i32 = 18;
    const PADDING: i32 = 8;

    let (width, _) = plot.dim_in_pixel();
    let x1 = i32::try_from(width).unwrap_or(i32::MAX) - PADDING;
    let x0 = x1 - BOX_WIDTH;
    let y0 = PADDING;
    let y1 = y0 + LINE_HEIGHT * lines.len() as i32 + PADDING;

    plot.draw(&Rectangle::new([(x0, y0), (x1, y1)], WHEAT.mix(0.5).filled()))?;
    plot.draw(&Rectangle::new([(x0, y0), (x1, y1)], BLACK.mix(0.3)))?;

    for (i, line) in lines.iter().enumerate() {
        plot.draw(&Text::new(
            line.clone(),
            (x0 + PADDING, y0 + PADDING / 2 + LINE_HEIGHT * i as i32),
            (FONT_FAMILY, 14),
        ))?;
    }

    Ok(())
}

/// Two-decimal number, or `n/a` when undefined.
pub fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}
