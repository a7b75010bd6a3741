use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the series extraction crates.
///
/// Cell-level gaps and empty year blocks are not represented here: they are
/// absorbed where they occur and surface only as absent values or log lines.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A spreadsheet could be opened but not decoded into a grid.
    #[error("Failed to load grid from {path}: {message}")]
    GridLoad { path: PathBuf, message: String },

    /// The requested worksheet does not exist in the workbook.
    #[error("Sheet '{sheet}' not found in {path}")]
    SheetNotFound { path: PathBuf, sheet: String },

    /// The file extension is not one the grid loader understands.
    #[error("Unsupported grid format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Every configured value column came back empty.
    #[error("No valid series extracted for {0}")]
    NoSeriesExtracted(String),

    /// A report name is not one of the built-in layouts.
    #[error("Unknown report: {0}")]
    UnknownReport(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The output table could not be written.
    #[error("Failed to write table to {path}: {message}")]
    TableWrite { path: PathBuf, message: String },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the series crates.
pub type Result<T> = std::result::Result<T, ExtractError>;
