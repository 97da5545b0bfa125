use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::holding::{HoldingSet, ObservedHolding};

/// One position row as dumped by the external browser scraper.
///
/// Session capture and DOM scraping live outside this crate (the
/// scraper logs in, persists its own session artifact, and writes a
/// JSON dump of the positions table). The core reads that dump and
/// consumes only `symbol` and `quantity`; the remaining fields ride
/// along for debugging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedPosition {
    pub symbol: String,
    #[serde(default)]
    pub description: String,
    pub quantity: String,
    #[serde(default)]
    pub last_price: String,
    #[serde(default)]
    pub market_value: String,
}

/// Load a scrape dump file (JSON array of positions).
pub fn load_scrape_dump(path: &Path) -> Result<Vec<ScrapedPosition>, CoreError> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CoreError::InputFileNotFound(path.display().to_string())
        } else {
            CoreError::FileIO(format!("{}: {e}", path.display()))
        }
    })?;
    let positions: Vec<ScrapedPosition> = serde_json::from_reader(file)?;
    Ok(positions)
}

/// Reduce scraped positions to the observed symbol → quantity mapping
/// (trimmed, blank symbols dropped, last occurrence wins).
pub fn positions_to_holdings(positions: &[ScrapedPosition]) -> HoldingSet {
    HoldingSet::from_holdings(positions.iter().filter_map(|p| {
        let symbol = p.symbol.trim();
        if symbol.is_empty() {
            return None;
        }
        Some(ObservedHolding::new(symbol, p.quantity.trim()))
    }))
}
