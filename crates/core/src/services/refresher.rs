use log::{info, warn};

use crate::config::LedgerConfig;
use crate::errors::CoreError;
use crate::models::cell::CellValue;
use crate::models::quote::PriceDirection;
use crate::models::report::{RefreshReport, RowOutcome};
use crate::prices::traits::PriceSource;
use crate::sheet::a1::RangeRef;
use crate::sheet::traits::{RangeWrite, TabularStore};

/// Refreshes market prices for the tracked ledger rows.
///
/// Per row: read symbol → skip if blank → read prior price → fetch →
/// classify direction → queue a backup write (prior price into the
/// backup column) and a price write. All queued writes across all
/// rows go to the store as one batch; a fetch failure excludes only
/// its own row.
pub struct PriceRefresher;

impl PriceRefresher {
    pub fn new() -> Self {
        Self
    }

    pub async fn refresh(
        &self,
        store: &dyn TabularStore,
        source: &dyn PriceSource,
        config: &LedgerConfig,
    ) -> Result<RefreshReport, CoreError> {
        let mut report = RefreshReport::default();

        let (Some(&min_row), Some(&max_row)) = (
            config.tracked_rows.iter().min(),
            config.tracked_rows.iter().max(),
        ) else {
            info!("no tracked rows configured; nothing to refresh");
            return Ok(report);
        };

        // One bounded read per column instead of per-cell traffic.
        let symbol_span = RangeRef::column(&config.holdings_sheet, config.symbol_col, min_row, max_row);
        let price_span = RangeRef::column(&config.holdings_sheet, config.price_col, min_row, max_row);
        let symbols = store.read_column(&symbol_span).await?;
        let old_prices = store.read_column(&price_span).await?;

        let mut writes: Vec<RangeWrite> = Vec::new();

        for (i, &row) in config.tracked_rows.iter().enumerate() {
            let idx = (row - min_row) as usize;
            let symbol = symbols
                .get(idx)
                .map(|s| s.trim().to_uppercase())
                .unwrap_or_default();

            if symbol.is_empty() {
                report.outcomes.push(RowOutcome::SkippedBlank { row });
                continue;
            }

            let old_raw = old_prices.get(idx).cloned().unwrap_or_default();

            // Pace external fetches to respect upstream quota.
            if i > 0 && !config.fetch_pause.is_zero() {
                tokio::time::sleep(config.fetch_pause).await;
            }

            let quote = match source.fetch(&symbol).await {
                Ok(q) => q,
                Err(e) => {
                    warn!("row {row} | {symbol}: price fetch failed: {e}");
                    report.outcomes.push(RowOutcome::FetchFailed {
                        row,
                        symbol,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            // A blank or non-numeric prior cell is a first-ever fetch,
            // not a failure: direction comes back Unknown.
            let old_price = CellValue::parse_number(&old_raw);
            let direction = PriceDirection::classify(old_price, quote.price);

            // Backup before overwrite, in the same batch. Exactly one
            // generation of history per row.
            writes.push(RangeWrite::cell(
                config.price_backup_cell(row),
                CellValue::from_raw(&old_raw, true),
            ));
            writes.push(RangeWrite::cell(
                config.price_cell(row),
                CellValue::Number(quote.price),
            ));

            info!(
                "row {row} | {symbol}: {} -> {} {}",
                if old_raw.trim().is_empty() { "(blank)" } else { old_raw.trim() },
                quote.price,
                direction.arrow(),
            );
            report.outcomes.push(RowOutcome::Updated {
                row,
                symbol,
                old_price,
                new_price: quote.price,
                direction,
            });
        }

        if writes.is_empty() {
            warn!("no successful price updates to write");
            return Ok(report);
        }

        store.write_batch(writes).await?;
        info!(
            "price refresh committed: {} updated, {} failed, {} skipped",
            report.updated(),
            report.failed(),
            report.skipped(),
        );
        Ok(report)
    }
}

impl Default for PriceRefresher {
    fn default() -> Self {
        Self::new()
    }
}
