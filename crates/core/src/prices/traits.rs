use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::quote::PriceQuote;

/// Capability boundary over the market-price source.
///
/// One symbol per call; a failed fetch is an `Err` for that symbol
/// only and never aborts a refresh batch. The refresher owns pacing
/// between calls.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the current market price for a symbol.
    async fn fetch(&self, symbol: &str) -> Result<PriceQuote, CoreError>;
}
