//! Core types for bulletin time-series extraction.
//!
//! Holds the grid and table models, the single-cell classifier, header title
//! reconstruction, the report layout registry, CLI settings and the shared
//! error type. Nothing in this crate touches the file system except layout
//! loading.

pub mod cell;
pub mod error;
pub mod formatting;
pub mod layouts;
pub mod models;
pub mod settings;
pub mod time_utils;
pub mod title;
