//! Invoice entry composition and submission

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::{
    invoice_violations, AddOutcome, EntityId, FieldMark, InvoiceHeader, InvoiceReceipt,
    InvoiceSubmission, LineItem, LineItemEditor, LineItemField, Product, SessionContext,
    SubmissionState, ValidationError, Workflow,
};

use super::settle_failure;
use crate::error::{ConsoleError, ConsoleResult};
use crate::external::LedgerApi;

/// View state of one supplier invoice being entered
#[derive(Debug, Default)]
pub struct InvoiceEntry {
    header: InvoiceHeader,
    editor: LineItemEditor,
    workflow: Workflow,
}

impl InvoiceEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> &InvoiceHeader {
        &self.header
    }

    pub fn items(&self) -> &[LineItem] {
        self.editor.items()
    }

    pub fn state(&self) -> SubmissionState {
        self.workflow.state()
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn total(&self) -> Decimal {
        self.editor.total()
    }

    // Header

    pub fn set_invoice_number(&mut self, number: impl Into<String>) -> ConsoleResult<()> {
        self.workflow.touch()?;
        self.header.invoice_number = number.into();
        Ok(())
    }

    pub fn set_supplier(&mut self, supplier_id: Option<EntityId>) -> ConsoleResult<()> {
        self.workflow.touch()?;
        self.header.supplier_id = supplier_id;
        Ok(())
    }

    pub fn set_invoice_date(&mut self, date: Option<NaiveDate>) -> ConsoleResult<()> {
        self.workflow.touch()?;
        self.header.invoice_date = date;
        Ok(())
    }

    pub fn set_notes(&mut self, notes: Option<String>) -> ConsoleResult<()> {
        self.workflow.touch()?;
        self.header.notes = notes;
        Ok(())
    }

    // Line items

    pub fn add_product(&mut self, product: &Product) -> ConsoleResult<AddOutcome> {
        self.workflow.touch()?;
        let outcome = self.editor.add_product(product);
        if let Some(warning) = outcome.warning() {
            tracing::debug!(product_id = %warning.product_id, "duplicate product ignored");
        }
        Ok(outcome)
    }

    pub fn update_field(&mut self, index: usize, field: LineItemField, raw: &str) -> ConsoleResult<()> {
        self.workflow.touch()?;
        self.editor.update_field(index, field, raw)?;
        Ok(())
    }

    pub fn set_field(
        &mut self,
        index: usize,
        field: LineItemField,
        value: Option<Decimal>,
    ) -> ConsoleResult<()> {
        self.workflow.touch()?;
        self.editor.set_field(index, field, value)?;
        Ok(())
    }

    pub fn remove_product(&mut self, index: usize) -> ConsoleResult<LineItem> {
        self.workflow.touch()?;
        Ok(self.editor.remove_product(index)?)
    }

    /// Discard the composition
    pub fn abandon(&mut self) -> ConsoleResult<()> {
        self.workflow.abandon()?;
        self.clear();
        Ok(())
    }

    fn clear(&mut self) {
        self.header = InvoiceHeader::default();
        self.editor.clear();
    }

    /// Ask the ledger whether the current invoice number is taken.
    ///
    /// Advisory only; the ledger rejects duplicates again at commit time.
    pub async fn check_invoice_number<L>(&self, ledger: &L, session: &SessionContext) -> ConsoleResult<bool>
    where
        L: LedgerApi + ?Sized,
    {
        let number = self.header.invoice_number.trim();
        if number.is_empty() {
            return Ok(false);
        }
        ledger.invoice_number_exists(session, number).await
    }

    /// Validate, check uniqueness and commit the invoice.
    ///
    /// On success the composition is cleared and the workflow returns to
    /// idle. On any failure it returns to composing with the offending
    /// fields marked, and nothing is cleared. Dropping the future part way
    /// through counts as a failure.
    pub async fn submit<L>(&mut self, ledger: &L, session: &SessionContext) -> ConsoleResult<InvoiceReceipt>
    where
        L: LedgerApi + ?Sized,
    {
        let mut attempt = self.workflow.begin_attempt()?;

        let violations = invoice_violations(&self.header, self.editor.items());
        if let Some(first) = violations.first().cloned() {
            let marks = violations.iter().map(ValidationError::mark).collect();
            return Err(settle_failure(&mut attempt, first.into(), marks));
        }

        let Some(submission) = InvoiceSubmission::from_parts(&self.header, self.editor.items()) else {
            let error = ValidationError::MissingSupplier;
            let marks = vec![error.mark()];
            return Err(settle_failure(&mut attempt, error.into(), marks));
        };

        match ledger
            .invoice_number_exists(session, &submission.invoice_number)
            .await
        {
            Ok(false) => {}
            Ok(true) => {
                let error = ConsoleError::DuplicateInvoice(submission.invoice_number.clone());
                return Err(settle_failure(&mut attempt, error, vec![invoice_number_mark()]));
            }
            Err(error) => return Err(settle_failure(&mut attempt, error, Vec::new())),
        }

        attempt.begin_submission()?;
        match ledger.submit_invoice(session, &submission).await {
            Ok(receipt) => {
                tracing::info!(
                    invoice_id = %receipt.invoice_id,
                    total = %receipt.total,
                    "invoice registered"
                );
                attempt.succeed()?;
                attempt.settle()?;
                drop(attempt);
                self.clear();
                Ok(receipt)
            }
            Err(error) => {
                let marks = match error {
                    ConsoleError::DuplicateInvoice(_) => vec![invoice_number_mark()],
                    _ => Vec::new(),
                };
                Err(settle_failure(&mut attempt, error, marks))
            }
        }
    }
}

fn invoice_number_mark() -> FieldMark {
    FieldMark {
        line: None,
        field: "invoiceNumber",
    }
}
