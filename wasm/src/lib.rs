//! WebAssembly module for the Beverage Distribution Console
//!
//! Provides client-side computation for:
//! - Stock classification and inventory value
//! - Suggested sale prices and money formatting
//! - Invoice totals
//! - Offline validation of invoice and exit compositions
//!
//! Amounts cross the boundary as decimal strings so no precision is lost
//! to floating point. Unparseable amounts count as zero.

use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use shared::{ExitLine, InvoiceHeader, LineItem, StockSnapshot, ValidationError};

fn amount(raw: &str) -> Decimal {
    shared::parse_amount(raw).unwrap_or(Decimal::ZERO)
}

fn optional_amount(raw: &str) -> Option<Decimal> {
    shared::parse_amount(raw)
}

/// Validation failure as handed to the form
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Violation {
    message: String,
    field: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
}

impl From<&ValidationError> for Violation {
    fn from(error: &ValidationError) -> Self {
        let mark = error.mark();
        Self {
            message: error.to_string(),
            field: mark.field,
            line: mark.line,
        }
    }
}

fn violations_json(errors: &[ValidationError]) -> Result<String, String> {
    let violations: Vec<Violation> = errors.iter().map(Violation::from).collect();
    serde_json::to_string(&violations).map_err(|e| e.to_string())
}

fn parse_json<T: serde::de::DeserializeOwned>(raw: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(raw).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn invoice_total_of(items_json: &str) -> Result<String, String> {
    let mut items: Vec<LineItem> = parse_json(items_json, "line items")?;
    // Subtotals from the caller are not trusted
    items.iter_mut().for_each(LineItem::refresh_derived);
    Ok(shared::invoice_total(&items).to_string())
}

fn invoice_violations_of(header_json: &str, items_json: &str) -> Result<String, String> {
    let header: InvoiceHeader = parse_json(header_json, "invoice header")?;
    let items: Vec<LineItem> = parse_json(items_json, "line items")?;
    violations_json(&shared::invoice_violations(&header, &items))
}

fn exit_violations_of(lines_json: &str) -> Result<String, String> {
    let lines: Vec<ExitLine> = parse_json(lines_json, "exit lines")?;
    violations_json(&shared::exit_violations(&lines))
}

fn stock_summary_of(snapshots_json: &str) -> Result<String, String> {
    let snapshots: Vec<StockSnapshot> = parse_json(snapshots_json, "stock")?;
    serde_json::to_string(&shared::summarize_stock(&snapshots)).map_err(|e| e.to_string())
}

/// Classify an on-hand quantity: high, medium, low or depleted
#[wasm_bindgen]
pub fn classify_stock(on_hand: &str) -> String {
    shared::classify(amount(on_hand)).as_str().to_string()
}

#[wasm_bindgen]
pub fn calculate_inventory_value(on_hand: &str, sale_price: &str) -> String {
    shared::inventory_value(amount(on_hand), amount(sale_price)).to_string()
}

/// Suggested sale price, rounded for display
#[wasm_bindgen]
pub fn calculate_suggested_sale_price(purchase_price: &str) -> String {
    shared::round_for_display(shared::suggested_sale_price(amount(purchase_price))).to_string()
}

#[wasm_bindgen]
pub fn calculate_line_subtotal(quantity: &str, purchase_price: &str) -> String {
    shared::line_subtotal(optional_amount(quantity), optional_amount(purchase_price)).to_string()
}

#[wasm_bindgen]
pub fn format_money(value: &str, currency: &str) -> String {
    shared::format_money(amount(value), currency)
}

/// Sum of line subtotals for a JSON array of line items
#[wasm_bindgen]
pub fn calculate_invoice_total(items_json: &str) -> Result<String, JsValue> {
    invoice_total_of(items_json).map_err(|e| JsValue::from_str(&e))
}

/// Every rule a composed invoice breaks, as a JSON array
#[wasm_bindgen]
pub fn validate_invoice_json(header_json: &str, items_json: &str) -> Result<String, JsValue> {
    invoice_violations_of(header_json, items_json).map_err(|e| JsValue::from_str(&e))
}

/// Every rule a composed exit breaks, as a JSON array
#[wasm_bindgen]
pub fn validate_exit_json(lines_json: &str) -> Result<String, JsValue> {
    exit_violations_of(lines_json).map_err(|e| JsValue::from_str(&e))
}

/// Totals and per-classification counts for a stock listing
#[wasm_bindgen]
pub fn summarize_stock(snapshots_json: &str) -> Result<String, JsValue> {
    stock_summary_of(snapshots_json).map_err(|e| JsValue::from_str(&e))
}
