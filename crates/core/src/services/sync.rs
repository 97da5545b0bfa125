use log::{info, warn};

use crate::config::LedgerConfig;
use crate::errors::CoreError;
use crate::models::cell::CellValue;
use crate::models::holding::HoldingSet;
use crate::models::report::ReconcileOutcome;
use crate::services::matcher::Matcher;
use crate::sheet::traits::TabularStore;

/// Orchestrates one holdings sync: read the ledger symbol column,
/// reconcile the observed data into it, write the quantity column in
/// a single range write, report unmatched symbols.
pub struct SyncService {
    matcher: Matcher,
}

impl SyncService {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(),
        }
    }

    pub async fn sync_holdings(
        &self,
        store: &dyn TabularStore,
        config: &LedgerConfig,
        observed: &HoldingSet,
    ) -> Result<ReconcileOutcome, CoreError> {
        let symbol_range = config.symbol_range();
        let ledger_symbols = store.read_column(&symbol_range).await?;

        // The writes list must line up with the configured row span
        // exactly; anything else is mis-wired configuration.
        if ledger_symbols.len() != config.row_count() {
            return Err(CoreError::GridSizeMismatch {
                context: symbol_range.to_string(),
                expected: config.row_count(),
                actual: ledger_symbols.len(),
            });
        }

        let outcome = self
            .matcher
            .reconcile(&ledger_symbols, observed, config.coerce_quantities);

        let grid: Vec<Vec<CellValue>> = outcome.writes.iter().cloned().map(|v| vec![v]).collect();
        store.write_range(&config.quantity_range(), grid).await?;

        info!(
            "holdings sync: {} of {} observed symbols matched ledger rows",
            outcome.matched,
            observed.len(),
        );
        if config.report_new_symbols {
            if outcome.new_symbols.is_empty() {
                info!("no new symbols detected");
            } else {
                warn!(
                    "new symbols not present in {}: {}",
                    symbol_range,
                    outcome.new_symbols.join(", "),
                );
            }
        }

        Ok(outcome)
    }
}

impl Default for SyncService {
    fn default() -> Self {
        Self::new()
    }
}
