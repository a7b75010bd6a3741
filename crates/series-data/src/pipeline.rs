//! Extraction pipeline for one report layout.
//!
//! Resolves titles, scans the grid once, extracts one series per configured
//! value column, merges them and normalises the result. [`run_job`] wraps the
//! same steps with the grid loader and the CSV writer.

use std::path::PathBuf;

use chrono::Utc;
use series_core::error::Result;
use series_core::formatting::format_series_list;
use series_core::layouts::{ReportJob, ReportLayout};
use series_core::models::{Grid, Series, WideTable};
use series_core::title::TitleBuilder;
use tracing::{debug, info};

use crate::extractor::SeriesExtractor;
use crate::merger::SeriesMerger;
use crate::normalizer::TableNormalizer;
use crate::reader::load_grid;
use crate::scanner::YearMonthScanner;
use crate::writer::write_csv;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside an extracted table.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ExtractionMetadata {
    /// Layout name.
    pub report: String,
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    /// Number of value columns in the layout.
    pub columns_configured: usize,
    /// Number of columns that yielded at least one record.
    pub series_extracted: usize,
    /// Value columns that yielded no records.
    pub skipped_columns: Vec<usize>,
    /// Rows in the final table.
    pub rows: usize,
    /// Wall-clock seconds from title resolution to normalisation.
    pub extract_time_seconds: f64,
}

/// The output of [`extract`].
#[derive(Debug, Clone)]
pub struct Extraction {
    pub table: WideTable,
    pub metadata: ExtractionMetadata,
}

/// What [`run_job`] wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub report: String,
    pub output: PathBuf,
    pub rows: usize,
    /// Series titles included in the output, in column order.
    pub series: Vec<String>,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the extraction pipeline over an already-loaded grid.
///
/// 1. Validate the layout and resolve one title per value column.
/// 2. Scan the year/month columns once.
/// 3. Read each value column at the scanned rows; columns with no records
///    are skipped.
/// 4. Merge the series on `(year, month)`.
/// 5. Drop placeholder-titled and all-absent columns, sort by date.
///
/// Fails with [`series_core::error::ExtractError::NoSeriesExtracted`] when no
/// column yields a record.
pub fn extract(grid: &Grid, layout: &ReportLayout) -> Result<Extraction> {
    layout.validate()?;
    let started = std::time::Instant::now();

    // ── Step 1: Titles ────────────────────────────────────────────────────────
    let mut titles = TitleBuilder::resolve(grid, layout);

    // ── Step 2: Scan ──────────────────────────────────────────────────────────
    let scanner = YearMonthScanner::new(layout.start_row, layout.year_col, layout.month_col);
    let blocks = scanner.scan(grid);

    // ── Step 3: Per-column series ─────────────────────────────────────────────
    let mut series = Vec::with_capacity(layout.value_cols.len());
    let mut skipped_columns = Vec::new();
    for &col in &layout.value_cols {
        let records = SeriesExtractor::records_from_blocks(&blocks, grid, col);
        if records.is_empty() {
            debug!("{}: column {} produced no records, skipping", layout.name, col);
            skipped_columns.push(col);
            continue;
        }
        let title = titles
            .remove(&col)
            .unwrap_or_else(|| TitleBuilder::placeholder(col));
        debug!("{}: column {} -> {} ({} records)", layout.name, col, title, records.len());
        series.push(Series {
            column: col,
            title,
            records,
        });
    }

    // ── Step 4 & 5: Merge and normalise ───────────────────────────────────────
    let merged = SeriesMerger::merge(&layout.name, &series)?;
    let table = TableNormalizer::normalize(merged);

    let metadata = ExtractionMetadata {
        report: layout.name.clone(),
        generated_at: Utc::now().to_rfc3339(),
        columns_configured: layout.value_cols.len(),
        series_extracted: series.len(),
        skipped_columns,
        rows: table.rows.len(),
        extract_time_seconds: started.elapsed().as_secs_f64(),
    };

    Ok(Extraction { table, metadata })
}

/// Load, extract and write one report.
pub fn run_job(job: &ReportJob) -> Result<RunSummary> {
    let layout = &job.layout;
    info!("{}: reading {}", layout.name, job.input.display());

    let grid = load_grid(&job.input, layout.sheet.as_deref())?;
    let Extraction { table, metadata } = extract(&grid, layout)?;

    if let Ok(json) = serde_json::to_string(&metadata) {
        debug!("{}: extraction metadata {}", layout.name, json);
    }

    write_csv(&table, &job.output)?;

    info!(
        "{}: wrote {} rows to {}\nColumns included:\n{}",
        layout.name,
        table.rows.len(),
        job.output.display(),
        format_series_list(&table.columns)
    );

    Ok(RunSummary {
        report: layout.name.clone(),
        output: job.output.clone(),
        rows: table.rows.len(),
        series: table.columns,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
