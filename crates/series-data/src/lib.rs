//! Extraction layer for BCB monthly series.
//!
//! Scans grids for year/month blocks, extracts one long-format series per
//! value column, joins them into a dated wide table and moves grids and
//! tables in and out of files.

pub mod extractor;
pub mod merger;
pub mod normalizer;
pub mod pipeline;
pub mod reader;
pub mod scanner;
pub mod writer;

pub use series_core as core;
