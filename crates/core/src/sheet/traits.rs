use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::cell::CellValue;
use crate::sheet::a1::{CellRef, RangeRef};

/// One range plus the grid of values to land there. Batched writes are
/// a list of these, committed in a single store call.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeWrite {
    pub range: RangeRef,
    pub values: Vec<Vec<CellValue>>,
}

impl RangeWrite {
    pub fn new(range: RangeRef, values: Vec<Vec<CellValue>>) -> Self {
        Self { range, values }
    }

    /// A write of a single cell.
    pub fn cell(cell: CellRef, value: CellValue) -> Self {
        Self {
            range: cell.into(),
            values: vec![vec![value]],
        }
    }
}

/// Capability boundary over the persistent ledger: a 2-D grid
/// addressable by A1 ranges.
///
/// The core never talks to a spreadsheet API directly; it goes through
/// this trait so the pipeline is testable against an in-memory fake.
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Read a single-column range top to bottom. Rows the store has no
    /// data for come back as empty strings, so the result always has
    /// exactly `range.row_count()` entries.
    async fn read_column(&self, range: &RangeRef) -> Result<Vec<String>, CoreError>;

    /// Read one cell. `None` means the cell holds no value.
    async fn read_cell(&self, cell: &CellRef) -> Result<Option<String>, CoreError>;

    /// Read a rectangular range as rows of strings. Trailing empty
    /// cells may be elided per row, matching spreadsheet API behavior.
    async fn read_range(&self, range: &RangeRef) -> Result<Vec<Vec<String>>, CoreError>;

    /// Write a grid of values over a range.
    async fn write_range(
        &self,
        range: &RangeRef,
        values: Vec<Vec<CellValue>>,
    ) -> Result<(), CoreError>;

    /// Commit several range writes in one store call.
    async fn write_batch(&self, writes: Vec<RangeWrite>) -> Result<(), CoreError>;

    /// Insert a new row at `row` (shifting existing rows down) and
    /// fill it with `values` starting at column A.
    async fn insert_row(
        &self,
        sheet: &str,
        row: u32,
        values: Vec<CellValue>,
    ) -> Result<(), CoreError>;
}

/// Reject a write whose grid shape does not cover its range. A
/// mismatch means mis-wired row configuration, which must surface
/// before anything lands in the store.
pub fn validate_grid(range: &RangeRef, values: &[Vec<CellValue>]) -> Result<(), CoreError> {
    if values.len() != range.row_count() {
        return Err(CoreError::GridSizeMismatch {
            context: range.to_string(),
            expected: range.row_count(),
            actual: values.len(),
        });
    }
    Ok(())
}
