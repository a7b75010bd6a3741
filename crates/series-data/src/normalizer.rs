//! Post-join cleanup of the wide table.

use series_core::models::WideTable;
use series_core::title::TitleBuilder;
use tracing::debug;

/// Stateless helper that tidies a merged [`WideTable`].
pub struct TableNormalizer;

impl TableNormalizer {
    /// Drop all-absent and placeholder-titled columns, then sort rows by date.
    ///
    /// Surviving columns keep their relative order and titles.
    pub fn normalize(mut table: WideTable) -> WideTable {
        let keep: Vec<bool> = (0..table.columns.len())
            .map(|idx| {
                let title = &table.columns[idx];
                if TitleBuilder::is_placeholder(title) {
                    debug!("TableNormalizer: dropping untitled column {}", title);
                    return false;
                }
                if table.column_values(idx).all(|v| v.is_none()) {
                    debug!("TableNormalizer: dropping empty column {}", title);
                    return false;
                }
                true
            })
            .collect();

        table.columns = retain_by_mask(std::mem::take(&mut table.columns), &keep);
        for row in &mut table.rows {
            row.values = retain_by_mask(std::mem::take(&mut row.values), &keep);
        }

        table.rows.sort_by_key(|r| r.date);
        table
    }
}

fn retain_by_mask<T>(items: Vec<T>, keep: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(keep.iter())
        .filter_map(|(item, &k)| k.then_some(item))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
