use chrono::NaiveDate;

use crate::models::cell::CellValue;

/// One row of the valuation history sheet: a calendar date and the
/// total portfolio value captured that day.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub total_value: CellValue,
}

impl HistoryEntry {
    pub fn new(date: NaiveDate, total_value: CellValue) -> Self {
        Self { date, total_value }
    }

    /// Date rendered the way the sheet stores it.
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// What a history append actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOutcome {
    /// A fresh row was inserted at the anchor position.
    Inserted,
    /// Today's existing row had its value overwritten in place.
    UpdatedInPlace,
    /// The total-value source cell was blank; nothing written.
    SkippedBlankTotal,
}
