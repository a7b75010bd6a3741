//! Column-title reconstruction from multi-row header fragments.
//!
//! Bulletin headers are split across merged rows and are sometimes rendered
//! letter-spaced (`"T O T A L"`). [`TitleBuilder`] stitches the fragments of one
//! column back together into a single readable title.

use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::layouts::ReportLayout;
use crate::models::Grid;

fn letter_spaced_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:\p{L}\s)+\p{L}$").expect("regex is valid"))
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:col_\d+|Unnamed(?::.*)?)$").expect("regex is valid"))
}

// ── TitleBuilder ──────────────────────────────────────────────────────────────

/// Stateless helper that builds column titles from header rows.
pub struct TitleBuilder;

impl TitleBuilder {
    /// Build the title of column `col` from the inclusive, 1-indexed header
    /// rows `start_row..=end_row`.
    ///
    /// Non-empty fragments are whitespace-collapsed, letter-spaced words are
    /// closed up, and the fragments are joined with single spaces. Parentheses
    /// are removed but their contents kept. An empty result falls back to
    /// [`TitleBuilder::placeholder`].
    pub fn build(grid: &Grid, col: usize, start_row: usize, end_row: usize) -> String {
        let first = start_row.saturating_sub(1);
        let last = end_row.min(grid.height());
        let parts: Vec<String> = (first..last)
            .filter_map(|row| grid.cell(row, col).as_display_text())
            .map(|raw| squash_spaces(&raw))
            .filter(|s| !s.is_empty())
            .collect();

        let joined = parts.join(" ").replace(['(', ')'], "");
        let title = collapse_whitespace(&joined);

        if title.is_empty() {
            Self::placeholder(col)
        } else {
            title
        }
    }

    /// Positional title used when no header text could be recovered.
    pub fn placeholder(col: usize) -> String {
        format!("col_{col}")
    }

    /// `true` for titles that carry no recovered header text.
    pub fn is_placeholder(title: &str) -> bool {
        placeholder_regex().is_match(title)
    }

    /// Resolve one title per configured value column of `layout`.
    ///
    /// Precedence: explicit override, then the header span covering the
    /// column, then the placeholder. A title already taken gets the first free
    /// `_2`, `_3`, ... suffix in column order, so every output field name is
    /// unique even when a header itself ends in such a suffix.
    pub fn resolve(grid: &Grid, layout: &ReportLayout) -> BTreeMap<usize, String> {
        let mut used: HashSet<String> = HashSet::new();
        let mut titles = BTreeMap::new();

        for &col in &layout.value_cols {
            let base = if let Some(title) = layout.title_overrides.get(&col) {
                title.clone()
            } else if let Some(span) = layout.header_span_for(col) {
                Self::build(grid, col, span.start_row, span.end_row)
            } else {
                Self::placeholder(col)
            };

            let title = if used.contains(&base) {
                (2..)
                    .map(|n| format!("{base}_{n}"))
                    .find(|candidate| !used.contains(candidate))
                    .unwrap_or_else(|| Self::placeholder(col))
            } else {
                base
            };
            used.insert(title.clone());
            titles.insert(col, title);
        }

        titles
    }
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse whitespace and close up letter-spaced words.
fn squash_spaces(s: &str) -> String {
    let collapsed = collapse_whitespace(s);
    if letter_spaced_regex().is_match(&collapsed) {
        collapsed.replace(' ', "")
    } else {
        collapsed
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
