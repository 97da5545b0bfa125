use std::collections::BTreeSet;

use crate::models::cell::CellValue;
use crate::models::holding::HoldingSet;
use crate::models::report::ReconcileOutcome;

/// Reconciles observed holdings against the ledger's fixed symbol
/// layout.
///
/// Pure business logic — no I/O, no API calls. Easy to test.
pub struct Matcher;

impl Matcher {
    pub fn new() -> Self {
        Self
    }

    /// Produce one write value per ledger slot, in row order.
    ///
    /// - A ledger symbol present in `observed` gets the observed
    ///   quantity (numeric-coerced when `coerce` is on and the string
    ///   parses cleanly, thousands separators stripped).
    /// - A ledger symbol absent from `observed` gets an explicit
    ///   blank. That is the normal "position closed" signal, not an
    ///   error — and the blank overwrites any stale quantity.
    /// - An empty ledger cell gets a blank and takes no part in the
    ///   new-symbol diff.
    ///
    /// `new_symbols` is every observed symbol without a ledger row,
    /// sorted. They are reported, never auto-inserted.
    pub fn reconcile(
        &self,
        ledger_symbols: &[String],
        observed: &HoldingSet,
        coerce: bool,
    ) -> ReconcileOutcome {
        let mut writes = Vec::with_capacity(ledger_symbols.len());
        let mut ledger_set: BTreeSet<&str> = BTreeSet::new();
        let mut matched = 0;

        for raw in ledger_symbols {
            let symbol = raw.trim();
            if !symbol.is_empty() {
                ledger_set.insert(symbol);
            }
            let value = match observed.get(symbol) {
                Some(quantity) if !symbol.is_empty() => {
                    matched += 1;
                    CellValue::from_raw(quantity, coerce)
                }
                _ => CellValue::Blank,
            };
            writes.push(value);
        }

        let new_symbols: Vec<String> = observed
            .symbols()
            .filter(|s| !ledger_set.contains(s))
            .map(str::to_string)
            .collect();

        ReconcileOutcome {
            writes,
            new_symbols,
            matched,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}
