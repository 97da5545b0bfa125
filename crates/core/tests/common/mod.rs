// Shared test fakes: an in-memory tabular store and a scripted price
// source, so the pipeline runs without any live spreadsheet or
// market-data dependency.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use ledger_sync_core::config::LedgerConfig;
use ledger_sync_core::errors::CoreError;
use ledger_sync_core::models::cell::CellValue;
use ledger_sync_core::models::quote::PriceQuote;
use ledger_sync_core::prices::traits::PriceSource;
use ledger_sync_core::sheet::a1::{CellRef, RangeRef};
use ledger_sync_core::sheet::traits::{validate_grid, RangeWrite, TabularStore};

// ═══════════════════════════════════════════════════════════════════
// In-memory tabular store
// ═══════════════════════════════════════════════════════════════════

type CellKey = (String, u32, u32); // (sheet, col, row)

#[derive(Default)]
pub struct InMemoryStore {
    cells: Mutex<HashMap<CellKey, String>>,
    pub batch_calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, sheet: &str, col: u32, row: u32, value: &str) {
        self.cells
            .lock()
            .unwrap()
            .insert((sheet.to_string(), col, row), value.to_string());
    }

    pub fn get(&self, sheet: &str, col: u32, row: u32) -> String {
        self.cells
            .lock()
            .unwrap()
            .get(&(sheet.to_string(), col, row))
            .cloned()
            .unwrap_or_default()
    }

    pub fn batch_call_count(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    fn put_grid(&self, range: &RangeRef, values: &[Vec<CellValue>]) {
        let mut cells = self.cells.lock().unwrap();
        for (r, row_values) in values.iter().enumerate() {
            for (c, value) in row_values.iter().enumerate() {
                let key = (
                    range.sheet.clone(),
                    range.start_col + c as u32,
                    range.start_row + r as u32,
                );
                match value {
                    CellValue::Blank => {
                        cells.remove(&key);
                    }
                    other => {
                        cells.insert(key, other.to_string());
                    }
                }
            }
        }
    }
}

#[async_trait]
impl TabularStore for InMemoryStore {
    async fn read_column(&self, range: &RangeRef) -> Result<Vec<String>, CoreError> {
        let cells = self.cells.lock().unwrap();
        Ok((range.start_row..=range.end_row)
            .map(|row| {
                cells
                    .get(&(range.sheet.clone(), range.start_col, row))
                    .cloned()
                    .unwrap_or_default()
            })
            .collect())
    }

    async fn read_cell(&self, cell: &CellRef) -> Result<Option<String>, CoreError> {
        let cells = self.cells.lock().unwrap();
        Ok(cells
            .get(&(cell.sheet.clone(), cell.col, cell.row))
            .cloned()
            .filter(|v| !v.is_empty()))
    }

    async fn read_range(&self, range: &RangeRef) -> Result<Vec<Vec<String>>, CoreError> {
        let cells = self.cells.lock().unwrap();
        Ok((range.start_row..=range.end_row)
            .map(|row| {
                (range.start_col..=range.end_col)
                    .map(|col| {
                        cells
                            .get(&(range.sheet.clone(), col, row))
                            .cloned()
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect())
    }

    async fn write_range(
        &self,
        range: &RangeRef,
        values: Vec<Vec<CellValue>>,
    ) -> Result<(), CoreError> {
        validate_grid(range, &values)?;
        self.put_grid(range, &values);
        Ok(())
    }

    async fn write_batch(&self, writes: Vec<RangeWrite>) -> Result<(), CoreError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        for w in &writes {
            validate_grid(&w.range, &w.values)?;
        }
        for w in &writes {
            self.put_grid(&w.range, &w.values);
        }
        Ok(())
    }

    async fn insert_row(
        &self,
        sheet: &str,
        row: u32,
        values: Vec<CellValue>,
    ) -> Result<(), CoreError> {
        let mut cells = self.cells.lock().unwrap();
        // Shift everything at or below the insertion point down a row.
        let shifted: Vec<(CellKey, String)> = cells
            .iter()
            .filter(|((s, _, r), _)| s == sheet && *r >= row)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (key, _) in &shifted {
            cells.remove(key);
        }
        for ((s, c, r), v) in shifted {
            cells.insert((s, c, r + 1), v);
        }
        for (i, value) in values.iter().enumerate() {
            if let CellValue::Blank = value {
                continue;
            }
            cells.insert((sheet.to_string(), 1 + i as u32, row), value.to_string());
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════
// Scripted price source
// ═══════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MockPriceSource {
    prices: Mutex<HashMap<String, f64>>,
    failing: Mutex<Vec<String>>,
    pub fetch_calls: AtomicUsize,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_price(&self, symbol: &str, price: f64) {
        self.prices
            .lock()
            .unwrap()
            .insert(symbol.to_uppercase(), price);
    }

    pub fn fail_for(&self, symbol: &str) {
        self.failing.lock().unwrap().push(symbol.to_uppercase());
    }

    pub fn fetch_call_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    fn name(&self) -> &str {
        "MockPriceSource"
    }

    async fn fetch(&self, symbol: &str) -> Result<PriceQuote, CoreError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let symbol = symbol.to_uppercase();
        if self.failing.lock().unwrap().contains(&symbol) {
            return Err(CoreError::PriceNotAvailable(symbol));
        }
        self.prices
            .lock()
            .unwrap()
            .get(&symbol)
            .map(|&price| PriceQuote {
                symbol: symbol.clone(),
                price,
            })
            .ok_or(CoreError::PriceNotAvailable(symbol))
    }
}

// ═══════════════════════════════════════════════════════════════════
// Config helper
// ═══════════════════════════════════════════════════════════════════

/// Small ledger for tests: slots in rows 4–8 of "holdings", tracked
/// price rows deliberately non-contiguous, history anchored at row 2.
pub fn test_config() -> LedgerConfig {
    LedgerConfig {
        spreadsheet_id: "test-sheet".into(),
        holdings_sheet: "holdings".into(),
        history_sheet: "history".into(),
        symbol_col: 1,
        quantity_col: 14,
        price_col: 17,
        price_backup_col: 18,
        first_row: 4,
        last_row: 8,
        tracked_rows: vec![4, 5, 7],
        history_anchor_row: 2,
        total_value_cell: CellRef::new("holdings", 2, 1),
        coerce_quantities: true,
        report_new_symbols: true,
        fetch_pause: Duration::ZERO,
    }
}
