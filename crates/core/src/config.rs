use std::time::Duration;

use crate::errors::CoreError;
use crate::sheet::a1::{CellRef, RangeRef};

/// Runtime configuration for one ledger.
///
/// All row/column coordinates are 1-based spreadsheet coordinates.
/// Built once at process start (the CLI assembles it from the
/// environment) and threaded through every component call — there is
/// no global state.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Spreadsheet document id.
    pub spreadsheet_id: String,
    /// Worksheet holding the ledger rows (e.g. "holdings").
    pub holdings_sheet: String,
    /// Worksheet holding the daily valuation history.
    pub history_sheet: String,

    /// Column containing ledger symbols (1 = column A).
    pub symbol_col: u32,
    /// Column receiving reconciled quantities.
    pub quantity_col: u32,
    /// Column receiving refreshed prices.
    pub price_col: u32,
    /// Column receiving the previous price before each overwrite.
    pub price_backup_col: u32,

    /// Inclusive row span of the ledger slot layout.
    pub first_row: u32,
    pub last_row: u32,

    /// Rows whose prices are refreshed. Ordered, possibly
    /// non-contiguous (the ledger has section headers and subtotals
    /// between tracked rows).
    pub tracked_rows: Vec<u32>,

    /// Row in the history sheet where the newest entry lives.
    pub history_anchor_row: u32,
    /// Cell in the holdings sheet holding the current total value.
    pub total_value_cell: CellRef,

    /// Coerce observed quantities to numbers when they parse cleanly.
    pub coerce_quantities: bool,
    /// Report observed symbols that have no ledger row.
    pub report_new_symbols: bool,

    /// Pause between consecutive price fetches (upstream quota).
    pub fetch_pause: Duration,
}

impl LedgerConfig {
    /// Validate coordinate sanity. Called by the facade before any
    /// store traffic; a bad range is a configuration error, not a
    /// runtime surprise halfway through a write.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err(CoreError::Config("spreadsheet id is empty".into()));
        }
        if self.first_row == 0 || self.last_row < self.first_row {
            return Err(CoreError::Config(format!(
                "invalid ledger row span {}..={}",
                self.first_row, self.last_row
            )));
        }
        let cols = [
            ("symbol", self.symbol_col),
            ("quantity", self.quantity_col),
            ("price", self.price_col),
            ("price backup", self.price_backup_col),
        ];
        if let Some((name, _)) = cols.iter().find(|(_, c)| *c == 0) {
            return Err(CoreError::Config(format!(
                "{name} column is not a valid 1-based column"
            )));
        }
        if let Some(&row) = self.tracked_rows.iter().find(|&&r| r == 0) {
            return Err(CoreError::Config(format!(
                "tracked row {row} is not a valid 1-based row"
            )));
        }
        if self.history_anchor_row < 2 {
            return Err(CoreError::Config(
                "history anchor row must leave room for a header row".into(),
            ));
        }
        Ok(())
    }

    /// Number of ledger slots in the configured span.
    pub fn row_count(&self) -> usize {
        (self.last_row - self.first_row + 1) as usize
    }

    /// Range covering the symbol column over the ledger span.
    pub fn symbol_range(&self) -> RangeRef {
        RangeRef::column(
            &self.holdings_sheet,
            self.symbol_col,
            self.first_row,
            self.last_row,
        )
    }

    /// Range covering the quantity column over the ledger span.
    pub fn quantity_range(&self) -> RangeRef {
        RangeRef::column(
            &self.holdings_sheet,
            self.quantity_col,
            self.first_row,
            self.last_row,
        )
    }

    /// Single cell in the symbol column.
    pub fn symbol_cell(&self, row: u32) -> CellRef {
        CellRef::new(&self.holdings_sheet, self.symbol_col, row)
    }

    /// Single cell in the price column.
    pub fn price_cell(&self, row: u32) -> CellRef {
        CellRef::new(&self.holdings_sheet, self.price_col, row)
    }

    /// Single cell in the price-backup column.
    pub fn price_backup_cell(&self, row: u32) -> CellRef {
        CellRef::new(&self.holdings_sheet, self.price_backup_col, row)
    }

    /// Anchor cell holding the newest history date.
    pub fn history_date_cell(&self) -> CellRef {
        CellRef::new(&self.history_sheet, 1, self.history_anchor_row)
    }

    /// Cell holding the newest history value.
    pub fn history_value_cell(&self) -> CellRef {
        CellRef::new(&self.history_sheet, 2, self.history_anchor_row)
    }
}
