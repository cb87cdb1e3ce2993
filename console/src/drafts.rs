//! Compositions loaded from JSON files
//!
//! Lets an invoice or exit be prepared offline and replayed through the
//! same editors and validators the interactive views use.

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{
    DuplicateProduct, EntityId, ExitReason, LineItemField, Product, StockSnapshot,
};

use crate::error::{ConsoleError, ConsoleResult};
use crate::services::{InvoiceEntry, StockExit};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default)]
    pub supplier_id: Option<EntityId>,
    #[serde(default)]
    pub invoice_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub lines: Vec<InvoiceDraftLine>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraftLine {
    pub product_id: EntityId,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub purchase_price: Option<Decimal>,
    #[serde(default)]
    pub custom_sale_price: Option<Decimal>,
    #[serde(default)]
    pub returned_quantity: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitDraft {
    #[serde(default)]
    pub lines: Vec<ExitDraftLine>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitDraftLine {
    pub product_id: EntityId,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub reason: Option<ExitReason>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Read a draft file from disk
pub fn read_draft(path: &Path) -> ConsoleResult<String> {
    std::fs::read_to_string(path).map_err(|e| ConsoleError::from_io(path, e))
}

impl InvoiceDraft {
    pub fn from_json(raw: &str) -> ConsoleResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Replay the draft into `entry`, resolving products from `catalog`.
    ///
    /// Returns the duplicate-product warnings raised along the way.
    pub fn apply(&self, entry: &mut InvoiceEntry, catalog: &[Product]) -> ConsoleResult<Vec<DuplicateProduct>> {
        entry.set_invoice_number(self.invoice_number.clone())?;
        entry.set_supplier(self.supplier_id.clone())?;
        entry.set_invoice_date(self.invoice_date)?;
        entry.set_notes(self.notes.clone())?;

        let mut warnings = Vec::new();
        for line in &self.lines {
            let product = catalog
                .iter()
                .find(|p| p.id == line.product_id)
                .ok_or_else(|| ConsoleError::NotFound(format!("Product {}", line.product_id)))?;

            let index = match entry.add_product(product)? {
                shared::AddOutcome::Added { index } => index,
                shared::AddOutcome::AlreadyPresent(warning) => {
                    warnings.push(warning);
                    continue;
                }
            };

            // Purchase price before the custom price so an explicit sale
            // price is never replaced by the suggestion.
            entry.set_field(index, LineItemField::Quantity, line.quantity)?;
            entry.set_field(index, LineItemField::PurchasePrice, line.purchase_price)?;
            if line.custom_sale_price.is_some() {
                entry.set_field(index, LineItemField::CustomSalePrice, line.custom_sale_price)?;
            }
            entry.set_field(index, LineItemField::ReturnedQuantity, line.returned_quantity)?;
        }
        Ok(warnings)
    }
}

impl ExitDraft {
    pub fn from_json(raw: &str) -> ConsoleResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Replay the draft into `exit`, resolving products from a stock snapshot
    pub fn apply(&self, exit: &mut StockExit, stock: &[StockSnapshot]) -> ConsoleResult<Vec<DuplicateProduct>> {
        let mut warnings = Vec::new();
        for line in &self.lines {
            let snapshot = stock
                .iter()
                .find(|s| s.product_id == line.product_id)
                .ok_or_else(|| ConsoleError::NotFound(format!("Product {}", line.product_id)))?;

            let index = match exit.add_product(snapshot)? {
                shared::AddOutcome::Added { index } => index,
                shared::AddOutcome::AlreadyPresent(warning) => {
                    warnings.push(warning);
                    continue;
                }
            };

            exit.set_quantity(index, line.quantity)?;
            exit.set_reason(index, line.reason.clone())?;
            exit.set_notes(index, line.notes.clone())?;
        }
        Ok(warnings)
    }
}
