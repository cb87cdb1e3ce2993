//! Manual stock exit composition and submission

use rust_decimal::Decimal;
use shared::{
    exit_violations, AddOutcome, ExitEditor, ExitLine, ExitReason, ExitReceipt, ExitSubmission,
    SessionContext, StockSnapshot, SubmissionState, ValidationError, Workflow,
};

use super::settle_failure;
use crate::error::ConsoleResult;
use crate::external::LedgerApi;

/// View state of one manual exit being composed
#[derive(Debug, Default)]
pub struct StockExit {
    editor: ExitEditor,
    workflow: Workflow,
}

impl StockExit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[ExitLine] {
        self.editor.lines()
    }

    pub fn state(&self) -> SubmissionState {
        self.workflow.state()
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn total_value(&self) -> Decimal {
        self.editor.total_value()
    }

    pub fn add_product(&mut self, snapshot: &StockSnapshot) -> ConsoleResult<AddOutcome> {
        self.workflow.touch()?;
        Ok(self.editor.add_product(snapshot))
    }

    pub fn update_quantity(&mut self, index: usize, raw: &str) -> ConsoleResult<()> {
        self.workflow.touch()?;
        self.editor.update_quantity(index, raw)?;
        Ok(())
    }

    pub fn set_quantity(&mut self, index: usize, quantity: Option<Decimal>) -> ConsoleResult<()> {
        self.workflow.touch()?;
        self.editor.set_quantity(index, quantity)?;
        Ok(())
    }

    pub fn set_reason(&mut self, index: usize, reason: Option<ExitReason>) -> ConsoleResult<()> {
        self.workflow.touch()?;
        self.editor.set_reason(index, reason)?;
        Ok(())
    }

    pub fn set_notes(&mut self, index: usize, notes: Option<String>) -> ConsoleResult<()> {
        self.workflow.touch()?;
        self.editor.set_notes(index, notes)?;
        Ok(())
    }

    pub fn remove_product(&mut self, index: usize) -> ConsoleResult<ExitLine> {
        self.workflow.touch()?;
        Ok(self.editor.remove_product(index)?)
    }

    pub fn abandon(&mut self) -> ConsoleResult<()> {
        self.workflow.abandon()?;
        self.editor.clear();
        Ok(())
    }

    /// Validate against the selection-time snapshots and commit the exit.
    ///
    /// Quantities above the snapshot's on-hand figure are refused before any
    /// network call. The ledger may still reject a stale snapshot. Dropping
    /// the future before the ledger answers leaves the lines editable.
    pub async fn submit<L>(&mut self, ledger: &L, session: &SessionContext) -> ConsoleResult<ExitReceipt>
    where
        L: LedgerApi + ?Sized,
    {
        let mut attempt = self.workflow.begin_attempt()?;

        let violations = exit_violations(self.editor.lines());
        if let Some(first) = violations.first().cloned() {
            let marks = violations.iter().map(ValidationError::mark).collect();
            return Err(settle_failure(&mut attempt, first.into(), marks));
        }

        let Some(submission) = ExitSubmission::from_lines(self.editor.lines()) else {
            let error = ValidationError::NoLineItems;
            let marks = vec![error.mark()];
            return Err(settle_failure(&mut attempt, error.into(), marks));
        };

        attempt.begin_submission()?;
        match ledger.submit_exit(session, &submission).await {
            Ok(receipt) => {
                tracing::info!(
                    products = receipt.total_products,
                    total_value = %receipt.total_value,
                    "manual exit registered"
                );
                attempt.succeed()?;
                attempt.settle()?;
                drop(attempt);
                self.editor.clear();
                Ok(receipt)
            }
            Err(error) => Err(settle_failure(&mut attempt, error, Vec::new())),
        }
    }
}
