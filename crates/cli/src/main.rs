use std::path::PathBuf;
use std::time::Duration;

use log::error;

use ledger_sync_core::acquire::vision::GeminiAnalyzer;
use ledger_sync_core::config::LedgerConfig;
use ledger_sync_core::errors::CoreError;
use ledger_sync_core::models::history::HistoryOutcome;
use ledger_sync_core::models::report::{ReconcileOutcome, RefreshReport, RowOutcome};
use ledger_sync_core::prices::yahoo::YahooPriceSource;
use ledger_sync_core::sheet::a1::{self, CellRef};
use ledger_sync_core::sheet::sheets::SheetsStore;
use ledger_sync_core::LedgerSync;

const USAGE: &str = "\
usage: ledger-sync <command> [args]

commands:
  holdings <file.csv>    reconcile a delimited holdings file into the ledger
  scrape <dump.json>     reconcile a browser-scrape positions dump
  image <screenshot>     extract holdings from a screenshot and reconcile
  prices                 refresh tracked prices (backs up prior prices)
  history                append/update today's valuation history row
  daily                  prices + history in one run
";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        // Fatal errors stop the run; nothing partial is retried.
        error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CoreError> {
    let mut args = std::env::args().skip(1);
    let command = match args.next() {
        Some(c) => c,
        None => {
            eprint!("{USAGE}");
            return Ok(());
        }
    };

    let ledger = build_ledger()?;

    match command.as_str() {
        "holdings" => {
            let path = expect_path(args.next(), "holdings <file.csv>")?;
            let outcome = ledger.sync_holdings_from_csv(&path).await?;
            print_reconcile(&outcome, ledger.config().report_new_symbols);
        }
        "scrape" => {
            let path = expect_path(args.next(), "scrape <dump.json>")?;
            let outcome = ledger.sync_holdings_from_scrape(&path).await?;
            print_reconcile(&outcome, ledger.config().report_new_symbols);
        }
        "image" => {
            let path = expect_path(args.next(), "image <screenshot>")?;
            let api_key = require_env("GEMINI_API_KEY")?;
            let analyzer = GeminiAnalyzer::new(api_key);
            let outcome = ledger.sync_holdings_from_image(&analyzer, &path).await?;
            print_reconcile(&outcome, ledger.config().report_new_symbols);
        }
        "prices" => {
            let report = ledger.refresh_prices().await?;
            print_refresh(&report);
        }
        "history" => {
            let outcome = ledger.append_history().await?;
            print_history(outcome);
        }
        "daily" => {
            let (report, outcome) = ledger.run_daily_update().await?;
            print_refresh(&report);
            print_history(outcome);
        }
        other => {
            eprint!("{USAGE}");
            return Err(CoreError::Config(format!("unknown command '{other}'")));
        }
    }

    Ok(())
}

// ── Configuration from the environment ──────────────────────────────

fn build_ledger() -> Result<LedgerSync, CoreError> {
    let holdings_sheet = env_or("LEDGER_HOLDINGS_SHEET", "holdings");
    let total_cell = env_or("LEDGER_TOTAL_VALUE_CELL", "B1");
    let (total_col, total_row) = a1::parse_coord(&total_cell).ok_or_else(|| {
        CoreError::Config(format!("invalid LEDGER_TOTAL_VALUE_CELL '{total_cell}'"))
    })?;

    let config = LedgerConfig {
        spreadsheet_id: require_env("LEDGER_SPREADSHEET_ID")?,
        history_sheet: env_or("LEDGER_HISTORY_SHEET", "history"),
        symbol_col: env_col("LEDGER_SYMBOL_COL", "A")?,
        quantity_col: env_col("LEDGER_QUANTITY_COL", "N")?,
        price_col: env_col("LEDGER_PRICE_COL", "Q")?,
        price_backup_col: env_col("LEDGER_BACKUP_COL", "R")?,
        first_row: env_row("LEDGER_FIRST_ROW", 4)?,
        last_row: env_row("LEDGER_LAST_ROW", 72)?,
        tracked_rows: parse_row_list(&env_or("LEDGER_TRACKED_ROWS", "4-60,63-64,71,79-87"))?,
        history_anchor_row: env_row("LEDGER_HISTORY_ANCHOR_ROW", 2)?,
        total_value_cell: CellRef::new(&holdings_sheet, total_col, total_row),
        holdings_sheet,
        coerce_quantities: env_flag("LEDGER_COERCE_QUANTITIES", true)?,
        report_new_symbols: env_flag("LEDGER_REPORT_NEW_SYMBOLS", true)?,
        fetch_pause: Duration::from_millis(env_row("LEDGER_FETCH_PAUSE_MS", 500)? as u64),
    };

    let store = SheetsStore::new(
        config.spreadsheet_id.clone(),
        require_env("LEDGER_SHEETS_TOKEN")?,
    );
    let prices = YahooPriceSource::new()?;

    LedgerSync::new(config, Box::new(store), Box::new(prices))
}

fn require_env(key: &str) -> Result<String, CoreError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| CoreError::Config(format!("missing required env var {key}")))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_col(key: &str, default: &str) -> Result<u32, CoreError> {
    let letters = env_or(key, default);
    a1::col_index(&letters)
        .ok_or_else(|| CoreError::Config(format!("invalid column letter '{letters}' in {key}")))
}

fn env_row(key: &str, default: u32) -> Result<u32, CoreError> {
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse()
            .map_err(|_| CoreError::Config(format!("invalid number '{v}' in {key}"))),
        Err(_) => Ok(default),
    }
}

fn env_flag(key: &str, default: bool) -> Result<bool, CoreError> {
    match std::env::var(key) {
        Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(CoreError::Config(format!("invalid flag '{other}' in {key}"))),
        },
        Err(_) => Ok(default),
    }
}

/// Parse a row list such as `4-60,63-64,71,79-87` into an ordered set
/// of row numbers.
fn parse_row_list(list: &str) -> Result<Vec<u32>, CoreError> {
    let mut rows = Vec::new();
    for part in list.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some((start, end)) = part.split_once('-') {
            let start: u32 = start.trim().parse().map_err(|_| bad_rows(list))?;
            let end: u32 = end.trim().parse().map_err(|_| bad_rows(list))?;
            if start == 0 || end < start {
                return Err(bad_rows(list));
            }
            rows.extend(start..=end);
        } else {
            let row: u32 = part.parse().map_err(|_| bad_rows(list))?;
            if row == 0 {
                return Err(bad_rows(list));
            }
            rows.push(row);
        }
    }
    if rows.is_empty() {
        return Err(bad_rows(list));
    }
    Ok(rows)
}

fn bad_rows(list: &str) -> CoreError {
    CoreError::Config(format!("invalid tracked-rows list '{list}'"))
}

fn expect_path(arg: Option<String>, usage: &str) -> Result<PathBuf, CoreError> {
    arg.map(PathBuf::from)
        .ok_or_else(|| CoreError::Config(format!("usage: ledger-sync {usage}")))
}

// ── Report rendering ────────────────────────────────────────────────

fn print_reconcile(outcome: &ReconcileOutcome, report_new: bool) {
    println!(
        "holdings updated: {} matched, {} slots written",
        outcome.matched,
        outcome.writes.len()
    );
    if report_new {
        if outcome.new_symbols.is_empty() {
            println!("no new symbols detected");
        } else {
            println!(
                "new symbols not in the ledger (reported, not inserted): {}",
                outcome.new_symbols.join(", ")
            );
        }
    }
}

fn print_refresh(report: &RefreshReport) {
    for outcome in &report.outcomes {
        match outcome {
            RowOutcome::Updated {
                row,
                symbol,
                old_price,
                new_price,
                direction,
            } => {
                let old = old_price
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "(blank)".into());
                println!("row {row} | {symbol}: {old} -> {new_price} {}", direction.arrow());
            }
            RowOutcome::SkippedBlank { row } => {
                println!("row {row} | skipped (no symbol)");
            }
            RowOutcome::FetchFailed { row, symbol, reason } => {
                println!("row {row} | {symbol}: FAILED ({reason})");
            }
        }
    }
    if report.has_writes() {
        println!(
            "prices committed in one batch: {} updated, {} failed, {} skipped",
            report.updated(),
            report.failed(),
            report.skipped()
        );
    } else {
        println!("no successful price updates to write");
    }
}

fn print_history(outcome: HistoryOutcome) {
    match outcome {
        HistoryOutcome::Inserted => println!("history: new row inserted for today"),
        HistoryOutcome::UpdatedInPlace => println!("history: today's row updated in place"),
        HistoryOutcome::SkippedBlankTotal => {
            println!("history: total value cell is blank, nothing recorded")
        }
    }
}
