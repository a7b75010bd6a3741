use clap::Parser;
use std::path::PathBuf;

use crate::error::{ExtractError, Result};
use crate::layouts::{Layouts, ReportJob, ReportKind, ReportLayout};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Extract monthly time series from central bank bulletin workbooks
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bcb-series",
    about = "Extract monthly time series from central bank bulletin workbooks",
    version
)]
pub struct Settings {
    /// Report layout to extract (repeatable; all built-in reports by default)
    #[arg(long = "report", value_parser = parse_report_kind)]
    pub reports: Vec<ReportKind>,

    /// JSON file describing a custom report layout
    #[arg(long, conflicts_with = "reports")]
    pub layout_file: Option<PathBuf>,

    /// Directory holding the downloaded workbooks
    #[arg(long, env = "BCB_SERIES_INPUT_DIR", default_value = "data/macro/bcb_excels")]
    pub input_dir: PathBuf,

    /// Directory the cleaned CSV tables are written to
    #[arg(long, env = "BCB_SERIES_OUTPUT_DIR", default_value = "data/macro/clean")]
    pub output_dir: PathBuf,

    /// Explicit workbook path (single report only)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Explicit output CSV path (single report only)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Worksheet to read instead of the layout's default
    #[arg(long)]
    pub sheet: Option<String>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Accepts report names case-insensitively, with `-` for `_`.
fn parse_report_kind(value: &str) -> std::result::Result<ReportKind, String> {
    value.parse::<ReportKind>().map_err(|_| {
        let known: Vec<&str> = ReportKind::ALL.iter().map(|k| k.as_str()).collect();
        format!("unknown report '{}' (expected one of: {})", value, known.join(", "))
    })
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments from the process environment and apply `--debug`.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// The layouts selected on the command line.
    pub fn layouts(&self) -> Result<Vec<ReportLayout>> {
        if let Some(path) = &self.layout_file {
            return Ok(vec![ReportLayout::from_json_file(path)?]);
        }
        if self.reports.is_empty() {
            return Ok(Layouts::all());
        }
        Ok(self.reports.iter().copied().map(Layouts::get).collect())
    }

    /// Resolve the selected layouts into concrete jobs.
    ///
    /// `--input`, `--output` and `--sheet` apply to a single selected report
    /// only; with several reports they are rejected rather than silently
    /// applied to all of them.
    pub fn jobs(&self) -> Result<Vec<ReportJob>> {
        let layouts = self.layouts()?;

        let has_overrides = self.input.is_some() || self.output.is_some() || self.sheet.is_some();
        if has_overrides && layouts.len() != 1 {
            return Err(ExtractError::Config(format!(
                "--input/--output/--sheet need exactly one report, got {}",
                layouts.len()
            )));
        }

        Ok(layouts
            .into_iter()
            .map(|mut layout| {
                if let Some(sheet) = &self.sheet {
                    layout.sheet = Some(sheet.clone());
                }
                let mut job = ReportJob::in_dirs(layout, &self.input_dir, &self.output_dir);
                if let Some(input) = &self.input {
                    job.input = input.clone();
                }
                if let Some(output) = &self.output {
                    job.output = output.clone();
                }
                job
            })
            .collect())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
