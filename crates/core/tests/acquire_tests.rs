// ═══════════════════════════════════════════════════════════════════
// Acquisition tests — delimited record parsing and scrape-dump
// consumption
// ═══════════════════════════════════════════════════════════════════

use std::io::Write;

use ledger_sync_core::acquire::records::{load_holdings_file, parse_holdings_str};
use ledger_sync_core::acquire::scrape::{load_scrape_dump, positions_to_holdings, ScrapedPosition};
use ledger_sync_core::errors::CoreError;
use ledger_sync_core::models::holding::HoldingSet;

#[test]
fn records_are_trimmed_and_extra_fields_ignored() {
    let holdings = parse_holdings_str("  AAPL ,  10 , Apple Inc, 150.25\nTSLA,2\n").unwrap();
    assert_eq!(holdings.len(), 2);
    assert_eq!(holdings[0].symbol, "AAPL");
    assert_eq!(holdings[0].quantity, "10");
    assert_eq!(holdings[1].symbol, "TSLA");
}

#[test]
fn empty_first_field_excludes_the_record() {
    let holdings = parse_holdings_str(",10\n  ,5\nAAPL,3\n").unwrap();
    assert_eq!(holdings.len(), 1);
    assert_eq!(holdings[0].symbol, "AAPL");
}

#[test]
fn records_without_a_quantity_field_are_skipped() {
    let holdings = parse_holdings_str("HEADERLINE\nAAPL,10\n").unwrap();
    assert_eq!(holdings.len(), 1);
    assert_eq!(holdings[0].symbol, "AAPL");
}

#[test]
fn fold_into_holding_set_is_last_occurrence_wins() {
    let holdings = parse_holdings_str("AAPL,10\nMSFT,5\nAAPL,11\n").unwrap();
    let set = HoldingSet::from_holdings(holdings);
    assert_eq!(set.len(), 2);
    assert_eq!(set.get("AAPL"), Some("11"));
    assert_eq!(set.get("MSFT"), Some("5"));
}

#[test]
fn holding_set_symbols_iterate_sorted() {
    let set = HoldingSet::from_holdings(
        parse_holdings_str("TSLA,1\nAAPL,2\nMSFT,3\n").unwrap(),
    );
    let symbols: Vec<&str> = set.symbols().collect();
    assert_eq!(symbols, vec!["AAPL", "MSFT", "TSLA"]);
}

#[test]
fn missing_holdings_file_is_a_fatal_input_error() {
    let err = load_holdings_file(std::path::Path::new("no/such/file.csv")).unwrap_err();
    assert!(matches!(err, CoreError::InputFileNotFound(_)));
}

#[test]
fn holdings_file_roundtrip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "AAPL, 10").unwrap();
    writeln!(file, "BRK.B, 1,234").unwrap();
    file.flush().unwrap();

    let set = load_holdings_file(file.path()).unwrap();
    assert_eq!(set.get("AAPL"), Some("10"));
    // Third field ("234") is extra data, not part of the quantity.
    assert_eq!(set.get("BRK.B"), Some("1"));
}

#[test]
fn scrape_dump_parses_and_reduces_to_symbol_quantity() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"symbol": "AAPL", "description": "Apple Inc", "quantity": "10",
              "lastPrice": "150.25", "marketValue": "1502.50"}},
            {{"symbol": " TSLA ", "description": "Tesla", "quantity": " 2 ",
              "lastPrice": "250.00", "marketValue": "500.00"}},
            {{"symbol": "", "description": "cash row", "quantity": "99",
              "lastPrice": "", "marketValue": ""}}
        ]"#
    )
    .unwrap();
    file.flush().unwrap();

    let positions = load_scrape_dump(file.path()).unwrap();
    assert_eq!(positions.len(), 3);
    assert_eq!(positions[0].last_price, "150.25");

    let set = positions_to_holdings(&positions);
    assert_eq!(set.len(), 2);
    assert_eq!(set.get("AAPL"), Some("10"));
    assert_eq!(set.get("TSLA"), Some("2"));
}

#[test]
fn scrape_dump_tolerates_missing_optional_fields() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"[{{"symbol": "AAPL", "quantity": "10"}}]"#).unwrap();
    file.flush().unwrap();

    let positions = load_scrape_dump(file.path()).unwrap();
    assert_eq!(positions[0], ScrapedPosition {
        symbol: "AAPL".into(),
        description: String::new(),
        quantity: "10".into(),
        last_price: String::new(),
        market_value: String::new(),
    });
}

#[test]
fn missing_scrape_dump_is_a_fatal_input_error() {
    let err = load_scrape_dump(std::path::Path::new("no/such/dump.json")).unwrap_err();
    assert!(matches!(err, CoreError::InputFileNotFound(_)));
}
