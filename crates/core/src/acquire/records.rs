use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::info;

use crate::errors::CoreError;
use crate::models::holding::{HoldingSet, ObservedHolding};

/// Parse a delimited record stream into observed holdings.
///
/// Contract with every acquisition collaborator: each record is
/// `symbol, quantity, ...` — extra fields are ignored, every field is
/// trimmed, and a record is included only when its first field is
/// non-empty and a second field exists. The stream is treated as an
/// opaque blob; image-extraction output goes through this same parser.
pub fn parse_holdings<R: Read>(reader: R) -> Result<Vec<ObservedHolding>, CoreError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut holdings = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let symbol = record.get(0).unwrap_or("").trim();
        let quantity = match record.get(1) {
            Some(q) => q.trim(),
            None => continue,
        };
        if symbol.is_empty() {
            continue;
        }
        holdings.push(ObservedHolding::new(symbol, quantity));
    }
    Ok(holdings)
}

/// Parse an in-memory blob (e.g. raw image-extraction output).
pub fn parse_holdings_str(content: &str) -> Result<Vec<ObservedHolding>, CoreError> {
    parse_holdings(content.as_bytes())
}

/// Load a holdings file and fold it into a [`HoldingSet`]
/// (last-occurrence-wins). A missing file is a fatal configuration
/// error for the run.
pub fn load_holdings_file(path: &Path) -> Result<HoldingSet, CoreError> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CoreError::InputFileNotFound(path.display().to_string())
        } else {
            CoreError::FileIO(format!("{}: {e}", path.display()))
        }
    })?;

    let holdings = parse_holdings(file)?;
    let set = HoldingSet::from_holdings(holdings);
    info!(
        "read {} symbols from {}",
        set.len(),
        path.display()
    );
    Ok(set)
}
