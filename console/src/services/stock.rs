//! Current stock listing and low-stock alerts

use serde::Serialize;
use shared::{summarize_stock, SessionContext, StockFilter, StockSnapshot, StockSummary};

use crate::error::ConsoleResult;
use crate::external::LedgerApi;

/// Listing plus the figures shown above it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockOverview {
    pub products: Vec<StockSnapshot>,
    pub summary: StockSummary,
}

/// Stock queries against the ledger
pub struct StockService<L> {
    ledger: L,
}

impl<L: LedgerApi> StockService<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// Current stock, classified locally.
    ///
    /// The state filter is applied again on this side because the ledger's
    /// own classification may disagree with the local thresholds.
    pub async fn list(
        &self,
        session: &SessionContext,
        filter: &StockFilter,
    ) -> ConsoleResult<Vec<StockSnapshot>> {
        let mut products = self.ledger.query_stock(session, filter).await?;
        let state = filter.state_filter.unwrap_or_default();
        products.retain(|p| state.matches(p.classification()));
        Ok(products)
    }

    /// Low and depleted products
    pub async fn alerts(&self, session: &SessionContext) -> ConsoleResult<Vec<StockSnapshot>> {
        let alerts = self.list(session, &StockFilter::alerts()).await?;
        if !alerts.is_empty() {
            tracing::info!(count = alerts.len(), "products need restocking");
        }
        Ok(alerts)
    }

    pub async fn overview(
        &self,
        session: &SessionContext,
        filter: &StockFilter,
    ) -> ConsoleResult<StockOverview> {
        let products = self.list(session, filter).await?;
        let summary = summarize_stock(&products);
        Ok(StockOverview { products, summary })
    }
}
