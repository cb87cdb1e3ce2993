//! Inventory ledger client
//!
//! The ledger is the system of record for stock entries, exits and levels.
//! It is the final arbiter of invoice uniqueness and stock sufficiency.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    EntityId, ExitReceipt, ExitSubmission, InvoiceNumberCheck, InvoiceReceipt, InvoiceSubmission,
    MovementFilter, MovementPage, SessionContext, StockFilter, StockSnapshot,
};

use super::api::{accepted, ApiClient, Decoded};
use crate::error::{ConsoleError, ConsoleResult};

/// Operations the console needs from the ledger
#[async_trait]
pub trait LedgerApi: Send + Sync {
    async fn invoice_number_exists(
        &self,
        session: &SessionContext,
        invoice_number: &str,
    ) -> ConsoleResult<bool>;

    async fn submit_invoice(
        &self,
        session: &SessionContext,
        submission: &InvoiceSubmission,
    ) -> ConsoleResult<InvoiceReceipt>;

    async fn submit_exit(
        &self,
        session: &SessionContext,
        submission: &ExitSubmission,
    ) -> ConsoleResult<ExitReceipt>;

    async fn query_stock(
        &self,
        session: &SessionContext,
        filter: &StockFilter,
    ) -> ConsoleResult<Vec<StockSnapshot>>;

    async fn query_movements(
        &self,
        session: &SessionContext,
        filter: &MovementFilter,
    ) -> ConsoleResult<MovementPage>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceNumberQuery<'a> {
    invoice_number: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceAck {
    invoice_id: EntityId,
    total: Decimal,
}

#[derive(Debug, Deserialize)]
struct StockListResponse {
    products: Vec<StockSnapshot>,
}

/// REST client for the inventory ledger
#[derive(Clone)]
pub struct LedgerClient {
    api: ApiClient,
}

impl LedgerClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl LedgerApi for LedgerClient {
    async fn invoice_number_exists(
        &self,
        session: &SessionContext,
        invoice_number: &str,
    ) -> ConsoleResult<bool> {
        let query = InvoiceNumberQuery {
            invoice_number: invoice_number.trim(),
        };
        let check: InvoiceNumberCheck = accepted(
            self.api
                .get("inventory/invoices/exists", &query, Some(session))
                .await?,
        )?;
        Ok(check.exists)
    }

    async fn submit_invoice(
        &self,
        session: &SessionContext,
        submission: &InvoiceSubmission,
    ) -> ConsoleResult<InvoiceReceipt> {
        tracing::info!(
            invoice_number = %submission.invoice_number,
            lines = submission.line_items.len(),
            total = %submission.total_value,
            "submitting invoice entry"
        );

        match self
            .api
            .post::<_, InvoiceAck>("inventory/entries", submission, Some(session))
            .await?
        {
            Decoded::Accepted(ack) => Ok(InvoiceReceipt {
                invoice_id: ack.invoice_id,
                total: ack.total,
            }),
            Decoded::Rejected(rejection) if rejection.is_duplicate_invoice() => Err(
                ConsoleError::DuplicateInvoice(submission.invoice_number.clone()),
            ),
            Decoded::Rejected(rejection) => Err(rejection.into()),
        }
    }

    async fn submit_exit(
        &self,
        session: &SessionContext,
        submission: &ExitSubmission,
    ) -> ConsoleResult<ExitReceipt> {
        tracing::info!(lines = submission.line_items.len(), "submitting manual exit");
        accepted(
            self.api
                .post("inventory/exits", submission, Some(session))
                .await?,
        )
    }

    async fn query_stock(
        &self,
        session: &SessionContext,
        filter: &StockFilter,
    ) -> ConsoleResult<Vec<StockSnapshot>> {
        let response: StockListResponse =
            accepted(self.api.get("inventory/stock", filter, Some(session)).await?)?;
        tracing::debug!(products = response.products.len(), "stock snapshot received");
        Ok(response.products)
    }

    async fn query_movements(
        &self,
        session: &SessionContext,
        filter: &MovementFilter,
    ) -> ConsoleResult<MovementPage> {
        accepted(
            self.api
                .get("inventory/movements", filter, Some(session))
                .await?,
        )
    }
}
