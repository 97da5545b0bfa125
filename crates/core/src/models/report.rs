use crate::models::cell::CellValue;
use crate::models::quote::PriceDirection;

/// Result of reconciling observed holdings against the ledger layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileOutcome {
    /// One write value per ledger slot, in row order. Always exactly
    /// as long as the configured row span.
    pub writes: Vec<CellValue>,
    /// Observed symbols with no ledger row. Reported, never dropped,
    /// never auto-inserted. Sorted.
    pub new_symbols: Vec<String>,
    /// Ledger symbols that matched an observed holding.
    pub matched: usize,
}

/// What happened to a single tracked row during a price refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// Price fetched and queued for write.
    Updated {
        row: u32,
        symbol: String,
        old_price: Option<f64>,
        new_price: f64,
        direction: PriceDirection,
    },
    /// The symbol cell was blank; nothing to do for this slot.
    SkippedBlank { row: u32 },
    /// The fetch failed; the row is excluded from the write batch.
    FetchFailed {
        row: u32,
        symbol: String,
        reason: String,
    },
}

/// Per-run summary of a price refresh. Collected per-item errors live
/// here — they never abort the batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshReport {
    pub outcomes: Vec<RowOutcome>,
}

impl RefreshReport {
    pub fn updated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RowOutcome::Updated { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RowOutcome::FetchFailed { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RowOutcome::SkippedBlank { .. }))
            .count()
    }

    /// True when at least one row produced a write.
    pub fn has_writes(&self) -> bool {
        self.updated() > 0
    }
}
