//! Console services
//!
//! View-state holders for the two compositions plus the read-only stock
//! and movement queries.

pub mod export;
pub mod invoice_entry;
pub mod movements;
pub mod stock;
pub mod stock_exit;

pub use export::{stock_report, StockReportRow};
pub use invoice_entry::InvoiceEntry;
pub use movements::MovementService;
pub use stock::{StockOverview, StockService};
pub use stock_exit::StockExit;

use shared::{FieldMark, Workflow};

use crate::error::ConsoleError;

/// Record a failed attempt and return the workflow to composing
pub(crate) fn settle_failure(
    workflow: &mut Workflow,
    error: ConsoleError,
    marks: Vec<FieldMark>,
) -> ConsoleError {
    tracing::warn!(code = error.code(), error = %error, "submission failed");

    if let Err(e) = workflow
        .fail(error.user_message(), marks)
        .and_then(|_| workflow.settle())
    {
        return e.into();
    }
    error
}
