use chrono::NaiveDate;
use log::{info, warn};

use crate::config::LedgerConfig;
use crate::errors::CoreError;
use crate::models::cell::CellValue;
use crate::models::history::{HistoryEntry, HistoryOutcome};
use crate::sheet::traits::TabularStore;

/// Appends the daily valuation history: newest entry at the anchor
/// row, at most one entry per calendar day.
pub struct HistoryService;

impl HistoryService {
    pub fn new() -> Self {
        Self
    }

    /// Record today's total value.
    ///
    /// If the anchor row already carries today's date, its value cell
    /// is overwritten in place (a re-run converges to the same stored
    /// value). Otherwise a new row is inserted at the anchor position,
    /// pushing older history down. A blank total-value source cell is
    /// a warned no-op — a blank or zero entry is never written.
    pub async fn append_or_update(
        &self,
        store: &dyn TabularStore,
        config: &LedgerConfig,
        today: NaiveDate,
    ) -> Result<HistoryOutcome, CoreError> {
        let total_raw = store.read_cell(&config.total_value_cell).await?;
        let total = CellValue::from_raw(total_raw.as_deref().unwrap_or(""), true);
        if total.is_blank() {
            warn!(
                "total value cell {} is blank; history entry skipped",
                config.total_value_cell
            );
            return Ok(HistoryOutcome::SkippedBlankTotal);
        }

        let entry = HistoryEntry::new(today, total);
        let anchor_date = store.read_cell(&config.history_date_cell()).await?;

        if anchor_date.as_deref().map(str::trim) == Some(entry.date_string().as_str()) {
            store
                .write_range(
                    &config.history_value_cell().into(),
                    vec![vec![entry.total_value.clone()]],
                )
                .await?;
            info!("history for {} updated in place", entry.date_string());
            return Ok(HistoryOutcome::UpdatedInPlace);
        }

        store
            .insert_row(
                &config.history_sheet,
                config.history_anchor_row,
                vec![
                    CellValue::Text(entry.date_string()),
                    entry.total_value.clone(),
                ],
            )
            .await?;
        info!("history row inserted for {}", entry.date_string());
        Ok(HistoryOutcome::Inserted)
    }
}

impl Default for HistoryService {
    fn default() -> Self {
        Self::new()
    }
}
