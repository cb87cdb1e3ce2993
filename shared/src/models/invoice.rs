//! Supplier invoice (stock entry) models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LineItem;
use crate::types::EntityId;
use crate::valuation;

/// Header fields of an invoice being composed
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceHeader {
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default)]
    pub supplier_id: Option<EntityId>,
    #[serde(default)]
    pub invoice_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for committing an invoice and its lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSubmission {
    pub invoice_number: String,
    pub supplier_id: EntityId,
    pub invoice_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub total_value: Decimal,
    pub line_items: Vec<InvoiceLinePayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLinePayload {
    pub product_id: EntityId,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
    pub returned_quantity: Decimal,
    pub net_quantity: Decimal,
    pub subtotal: Decimal,
}

impl InvoiceSubmission {
    /// Build the wire payload from a validated composition.
    ///
    /// Returns `None` when a required header field is missing; callers run
    /// the validator first so this only guards against misuse.
    pub fn from_parts(header: &InvoiceHeader, items: &[LineItem]) -> Option<Self> {
        let supplier_id = header.supplier_id.clone()?;
        let invoice_date = header.invoice_date?;

        let line_items = items
            .iter()
            .map(|item| InvoiceLinePayload {
                product_id: item.product_id.clone(),
                quantity: item.quantity.unwrap_or(Decimal::ZERO),
                purchase_price: item.purchase_price.unwrap_or(Decimal::ZERO),
                sale_price: item.effective_sale_price(),
                returned_quantity: item.returned_quantity,
                net_quantity: item.net_quantity(),
                subtotal: item.subtotal,
            })
            .collect();

        Some(Self {
            invoice_number: header.invoice_number.trim().to_string(),
            supplier_id,
            invoice_date,
            notes: header.notes.clone().filter(|n| !n.trim().is_empty()),
            total_value: valuation::invoice_total(items),
            line_items,
        })
    }
}

/// Ledger acknowledgement of a committed invoice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceReceipt {
    pub invoice_id: EntityId,
    pub total: Decimal,
}

/// Answer of the invoice number existence check
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvoiceNumberCheck {
    pub exists: bool,
}
