//! Runtime orchestration layer for BCB monthly series.
//!
//! Runs independent report jobs concurrently and reports each outcome.

pub mod orchestrator;

pub use series_core as core;
pub use series_data as data;
