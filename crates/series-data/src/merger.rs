//! Outer join of long-format series into one dated wide table.

use std::collections::BTreeMap;

use series_core::error::{ExtractError, Result};
use series_core::models::{Series, WideRow, WideTable};
use series_core::time_utils::month_end;
use tracing::{debug, warn};

/// Stateless helper that joins series on `(year, month)`.
pub struct SeriesMerger;

impl SeriesMerger {
    /// Full outer join of `series` on `(year, month)`.
    ///
    /// Produces one row per key present in any series, with one field per
    /// series in input order; a series lacking the key contributes `None`.
    /// Each row is dated on the last calendar day of its month. Rows come
    /// out in key order.
    ///
    /// Fails with [`ExtractError::NoSeriesExtracted`] when `series` is empty.
    pub fn merge(report: &str, series: &[Series]) -> Result<WideTable> {
        if series.is_empty() {
            return Err(ExtractError::NoSeriesExtracted(report.to_string()));
        }

        let width = series.len();
        // Keyed by (year, month) so rows come out in calendar order.
        let mut joined: BTreeMap<(i32, u32), Vec<Option<f64>>> = BTreeMap::new();

        for (idx, s) in series.iter().enumerate() {
            for record in &s.records {
                let slots = joined
                    .entry((record.year, record.month))
                    .or_insert_with(|| vec![None; width]);
                if let Some(slot) = slots.get_mut(idx) {
                    *slot = slot.or(record.value);
                }
            }
        }

        let rows: Vec<WideRow> = joined
            .into_iter()
            .filter_map(|((year, month), values)| {
                let Some(date) = month_end(year, month) else {
                    warn!("SeriesMerger: dropping invalid key {}-{}", year, month);
                    return None;
                };
                Some(WideRow {
                    date,
                    year,
                    month,
                    values,
                })
            })
            .collect();

        debug!(
            "SeriesMerger: joined {} series into {} rows for {}",
            width,
            rows.len(),
            report
        );

        Ok(WideTable {
            columns: series.iter().map(|s| s.title.clone()).collect(),
            rows,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
