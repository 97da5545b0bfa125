use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::quote::PriceQuote;
use super::traits::PriceSource;

/// Yahoo Finance implementation of [`PriceSource`].
///
/// - **Free**: No API key required.
/// - **Coverage**: Global equities, ETFs, indices, mutual funds.
///
/// Uses the regular market price from the chart metadata, falling
/// back to the previous close when the market is closed and no recent
/// price is present; if neither is usable the fetch fails for that
/// symbol.
pub struct YahooPriceSource {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooPriceSource {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new()
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to create connector: {e}"),
            })?;
        Ok(Self { connector })
    }
}

#[async_trait]
impl PriceSource for YahooPriceSource {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn fetch(&self, symbol: &str) -> Result<PriceQuote, CoreError> {
        let symbol = symbol.trim().to_uppercase();

        let resp = self
            .connector
            .get_latest_quotes(&symbol, "1d")
            .await
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to fetch latest quote for {symbol}: {e}"),
            })?;

        // Prefer the live regular market price; fall back to the
        // previous close, then to the last intraday bar.
        let price = match resp.metadata() {
            Ok(meta) => select_price(meta.regular_market_price, meta.previous_close),
            Err(_) => None,
        };

        let price = match price {
            Some(p) => p,
            None => resp
                .last_quote()
                .map_err(|_| CoreError::PriceNotAvailable(symbol.clone()))?
                .close,
        };

        if !price.is_finite() || price < 0.0 {
            return Err(CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Invalid price returned for {symbol}: {price}"),
            });
        }

        Ok(PriceQuote { symbol, price })
    }
}

/// Pick a usable price from the chart metadata: the regular market
/// price when it is a positive finite number, otherwise the previous
/// close under the same test.
fn select_price(regular: Option<f64>, previous_close: Option<f64>) -> Option<f64> {
    regular
        .filter(|p| p.is_finite() && *p > 0.0)
        .or(previous_close)
        .filter(|p| p.is_finite() && *p > 0.0)
}
