pub mod acquire;
pub mod config;
pub mod errors;
pub mod models;
pub mod prices;
pub mod services;
pub mod sheet;

use std::path::Path;

use chrono::NaiveDate;

use acquire::records;
use acquire::scrape;
use acquire::vision::{ImageAnalyzer, EXTRACTION_PROMPT};
use config::LedgerConfig;
use errors::CoreError;
use models::history::HistoryOutcome;
use models::holding::HoldingSet;
use models::report::{ReconcileOutcome, RefreshReport};
use prices::traits::PriceSource;
use services::history::HistoryService;
use services::refresher::PriceRefresher;
use services::sync::SyncService;
use sheet::traits::TabularStore;

/// Main entry point for the Ledger Sync core library.
///
/// Holds the run configuration plus the two external capabilities
/// (tabular store, price source) and the services that operate on
/// them. Single-threaded, sequential: each operation is one blocking
/// pass over the store, safe to re-run manually — reconcile and
/// history writes are idempotent for the same inputs.
#[must_use]
pub struct LedgerSync {
    config: LedgerConfig,
    store: Box<dyn TabularStore>,
    prices: Box<dyn PriceSource>,
    sync_service: SyncService,
    refresher: PriceRefresher,
    history_service: HistoryService,
}

impl std::fmt::Debug for LedgerSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerSync")
            .field("spreadsheet", &self.config.spreadsheet_id)
            .field("rows", &format!("{}..={}", self.config.first_row, self.config.last_row))
            .field("tracked_rows", &self.config.tracked_rows.len())
            .field("price_source", &self.prices.name())
            .finish()
    }
}

impl LedgerSync {
    /// Wire up a ledger against a store and a price source.
    /// Fails fast on inconsistent configuration — nothing is written
    /// to the store from here.
    pub fn new(
        config: LedgerConfig,
        store: Box<dyn TabularStore>,
        prices: Box<dyn PriceSource>,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            config,
            store,
            prices,
            sync_service: SyncService::new(),
            refresher: PriceRefresher::new(),
            history_service: HistoryService::new(),
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ── Holdings reconciliation ─────────────────────────────────────

    /// Reconcile an observed holding set into the ledger and write the
    /// quantity column in one range write.
    pub async fn sync_holdings(
        &self,
        observed: &HoldingSet,
    ) -> Result<ReconcileOutcome, CoreError> {
        self.sync_service
            .sync_holdings(self.store.as_ref(), &self.config, observed)
            .await
    }

    /// Sync from a delimited holdings file (CSV-style record stream).
    pub async fn sync_holdings_from_csv(
        &self,
        path: &Path,
    ) -> Result<ReconcileOutcome, CoreError> {
        let observed = records::load_holdings_file(path)?;
        self.sync_holdings(&observed).await
    }

    /// Sync from a browser-scrape dump (JSON positions list). Only
    /// symbol and quantity are consumed.
    pub async fn sync_holdings_from_scrape(
        &self,
        path: &Path,
    ) -> Result<ReconcileOutcome, CoreError> {
        let positions = scrape::load_scrape_dump(path)?;
        let observed = scrape::positions_to_holdings(&positions);
        self.sync_holdings(&observed).await
    }

    /// Sync from a portfolio screenshot: run the image analyzer, feed
    /// its raw text output through the record parser, reconcile.
    pub async fn sync_holdings_from_image(
        &self,
        analyzer: &dyn ImageAnalyzer,
        image_path: &Path,
    ) -> Result<ReconcileOutcome, CoreError> {
        let raw = analyzer.analyze(image_path, EXTRACTION_PROMPT).await?;
        let holdings = records::parse_holdings_str(&raw)?;
        let observed = HoldingSet::from_holdings(holdings);
        self.sync_holdings(&observed).await
    }

    // ── Price refresh ───────────────────────────────────────────────

    /// Refresh market prices for every tracked row, backing up the
    /// prior price, and commit all writes as a single batch.
    pub async fn refresh_prices(&self) -> Result<RefreshReport, CoreError> {
        self.refresher
            .refresh(self.store.as_ref(), self.prices.as_ref(), &self.config)
            .await
    }

    // ── Valuation history ───────────────────────────────────────────

    /// Append or update today's history entry.
    pub async fn append_history(&self) -> Result<HistoryOutcome, CoreError> {
        self.append_history_on(chrono::Utc::now().date_naive()).await
    }

    /// Append or update the history entry for an explicit date.
    pub async fn append_history_on(
        &self,
        date: NaiveDate,
    ) -> Result<HistoryOutcome, CoreError> {
        self.history_service
            .append_or_update(self.store.as_ref(), &self.config, date)
            .await
    }

    // ── Combined run ────────────────────────────────────────────────

    /// One daily cycle: refresh tracked prices, then record the
    /// resulting total value in the history sheet.
    pub async fn run_daily_update(
        &self,
    ) -> Result<(RefreshReport, HistoryOutcome), CoreError> {
        let report = self.refresh_prices().await?;
        let history = self.append_history().await?;
        Ok((report, history))
    }
}
