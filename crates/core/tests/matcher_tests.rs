// ═══════════════════════════════════════════════════════════════════
// Matcher tests — reconciling observed holdings against the ledger's
// fixed symbol layout
// ═══════════════════════════════════════════════════════════════════

use ledger_sync_core::models::cell::CellValue;
use ledger_sync_core::models::holding::{HoldingSet, ObservedHolding};
use ledger_sync_core::services::matcher::Matcher;

fn symbols(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn observed(pairs: &[(&str, &str)]) -> HoldingSet {
    let mut set = HoldingSet::new();
    for (s, q) in pairs {
        set.insert(*s, *q);
    }
    set
}

#[test]
fn writes_length_always_equals_ledger_length() {
    let matcher = Matcher::new();
    let cases: Vec<Vec<String>> = vec![
        symbols(&[]),
        symbols(&["AAPL"]),
        symbols(&["AAPL", "", "TSLA", "  ", "MSFT"]),
    ];
    let obs = observed(&[("AAPL", "10"), ("NVDA", "3")]);

    for ledger in cases {
        let outcome = matcher.reconcile(&ledger, &obs, true);
        assert_eq!(outcome.writes.len(), ledger.len());
    }
}

#[test]
fn matched_symbol_gets_observed_quantity() {
    let matcher = Matcher::new();
    let outcome = matcher.reconcile(
        &symbols(&["AAPL", "TSLA"]),
        &observed(&[("AAPL", "10"), ("TSLA", "2.5")]),
        true,
    );
    assert_eq!(outcome.writes[0], CellValue::Number(10.0));
    assert_eq!(outcome.writes[1], CellValue::Number(2.5));
    assert_eq!(outcome.matched, 2);
}

#[test]
fn absent_symbol_writes_explicit_blank() {
    // A position missing from the observed data is "closed", not an
    // error; the blank must overwrite whatever quantity was there.
    let matcher = Matcher::new();
    let outcome = matcher.reconcile(
        &symbols(&["AAPL", "TSLA"]),
        &observed(&[("AAPL", "10")]),
        true,
    );
    assert_eq!(outcome.writes[1], CellValue::Blank);
    assert!(outcome.new_symbols.is_empty());
}

#[test]
fn ledger_symbols_are_trimmed_before_matching() {
    let matcher = Matcher::new();
    let outcome = matcher.reconcile(
        &symbols(&["  AAPL  "]),
        &observed(&[("AAPL", "7")]),
        true,
    );
    assert_eq!(outcome.writes[0], CellValue::Number(7.0));
}

#[test]
fn new_symbols_is_exactly_observed_minus_ledger() {
    let matcher = Matcher::new();
    let outcome = matcher.reconcile(
        &symbols(&["AAPL", "", "TSLA"]),
        &observed(&[("AAPL", "1"), ("MSFT", "2"), ("NVDA", "3")]),
        true,
    );
    assert_eq!(outcome.new_symbols, vec!["MSFT".to_string(), "NVDA".to_string()]);
}

#[test]
fn spec_scenario_blank_slot_and_new_symbol() {
    // L = ["AAPL","","TSLA"], O = {"AAPL":"10","MSFT":"5"}
    let matcher = Matcher::new();
    let outcome = matcher.reconcile(
        &symbols(&["AAPL", "", "TSLA"]),
        &observed(&[("AAPL", "10"), ("MSFT", "5")]),
        true,
    );
    assert_eq!(
        outcome.writes,
        vec![
            CellValue::Number(10.0),
            CellValue::Blank,
            CellValue::Blank,
        ]
    );
    assert_eq!(outcome.new_symbols, vec!["MSFT".to_string()]);
}

#[test]
fn thousands_separators_are_stripped_before_coercion() {
    let matcher = Matcher::new();
    let outcome = matcher.reconcile(
        &symbols(&["AAPL"]),
        &observed(&[("AAPL", "1,234")]),
        true,
    );
    assert_eq!(outcome.writes[0], CellValue::Number(1234.0));
}

#[test]
fn unparseable_quantity_falls_back_to_raw_string() {
    let matcher = Matcher::new();
    let outcome = matcher.reconcile(
        &symbols(&["AAPL"]),
        &observed(&[("AAPL", "n/a")]),
        true,
    );
    assert_eq!(outcome.writes[0], CellValue::Text("n/a".into()));
}

#[test]
fn coercion_can_be_disabled() {
    let matcher = Matcher::new();
    let outcome = matcher.reconcile(
        &symbols(&["AAPL"]),
        &observed(&[("AAPL", "10")]),
        false,
    );
    assert_eq!(outcome.writes[0], CellValue::Text("10".into()));
}

#[test]
fn empty_ledger_cells_do_not_join_the_new_symbol_diff() {
    // An empty slot must not "absorb" an observed empty-string symbol,
    // and must still receive a blank write.
    let matcher = Matcher::new();
    let outcome = matcher.reconcile(
        &symbols(&["", "   "]),
        &observed(&[("AAPL", "1")]),
        true,
    );
    assert_eq!(outcome.writes, vec![CellValue::Blank, CellValue::Blank]);
    assert_eq!(outcome.new_symbols, vec!["AAPL".to_string()]);
    assert_eq!(outcome.matched, 0);
}

#[test]
fn duplicate_observed_symbols_fold_last_occurrence_wins() {
    let set = HoldingSet::from_holdings(vec![
        ObservedHolding::new("AAPL", "10"),
        ObservedHolding::new("TSLA", "1"),
        ObservedHolding::new("AAPL", "12"),
    ]);
    assert_eq!(set.get("AAPL"), Some("12"));
    assert_eq!(set.len(), 2);

    let matcher = Matcher::new();
    let outcome = matcher.reconcile(&symbols(&["AAPL"]), &set, true);
    assert_eq!(outcome.writes[0], CellValue::Number(12.0));
}

#[test]
fn duplicate_ledger_symbols_each_get_the_observed_quantity() {
    // Symbols are a join key but not guaranteed unique; every slot
    // carrying the symbol receives the same write.
    let matcher = Matcher::new();
    let outcome = matcher.reconcile(
        &symbols(&["AAPL", "AAPL"]),
        &observed(&[("AAPL", "10")]),
        true,
    );
    assert_eq!(outcome.writes[0], CellValue::Number(10.0));
    assert_eq!(outcome.writes[1], CellValue::Number(10.0));
}
