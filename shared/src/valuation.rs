//! Stock valuation and classification
//!
//! Pure functions shared by the invoice entry view, the stock listing and
//! the low/zero stock alerts. Values keep full precision; rounding to the
//! currency's minor unit happens only in [`round_for_display`] and
//! [`format_money`].
//!
//! Arithmetic never panics. A product that leaves the `Decimal` range
//! counts as zero, the same as unparseable input, and sums saturate.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::{LineItem, StockClassification, StockSnapshot};

/// Suggested markup applied to the purchase price (10%)
pub const SUGGESTED_MARKUP: Decimal = Decimal::from_parts(110, 0, 0, false, 2);

/// Minimum on-hand units for a product to count as well stocked
pub const HIGH_STOCK_MIN: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Maximum on-hand units still classified as low
pub const LOW_STOCK_MAX: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Minor-unit precision used for display
pub const CURRENCY_DECIMALS: u32 = 2;

/// Classify an on-hand quantity.
///
/// high >= 50, medium 11..=49, low 1..=10, depleted 0. Fractional values
/// fall into the bucket of their magnitude (10.5 is medium, 0.5 is low).
/// Negative balances are ledger anomalies and classify as depleted.
pub fn classify(on_hand: Decimal) -> StockClassification {
    if on_hand >= HIGH_STOCK_MIN {
        StockClassification::High
    } else if on_hand > LOW_STOCK_MAX {
        StockClassification::Medium
    } else if on_hand > Decimal::ZERO {
        StockClassification::Low
    } else {
        StockClassification::Depleted
    }
}

/// Monetary value of the stock on hand
pub fn inventory_value(on_hand: Decimal, sale_price: Decimal) -> Decimal {
    if on_hand.is_zero() {
        return Decimal::ZERO;
    }
    on_hand.checked_mul(sale_price).unwrap_or(Decimal::ZERO)
}

/// Suggested sale price for a purchase price (10% markup, unrounded)
pub fn suggested_sale_price(purchase_price: Decimal) -> Decimal {
    purchase_price
        .checked_mul(SUGGESTED_MARKUP)
        .unwrap_or(Decimal::ZERO)
}

/// Line subtotal; missing inputs count as zero
pub fn line_subtotal(quantity: Option<Decimal>, purchase_price: Option<Decimal>) -> Decimal {
    quantity
        .unwrap_or(Decimal::ZERO)
        .checked_mul(purchase_price.unwrap_or(Decimal::ZERO))
        .unwrap_or(Decimal::ZERO)
}

/// Quantity that actually enters stock
pub fn net_quantity(quantity: Decimal, returned_quantity: Decimal) -> Decimal {
    quantity.saturating_sub(returned_quantity)
}

/// Sum of all line subtotals
pub fn invoice_total(items: &[LineItem]) -> Decimal {
    sum_amounts(items.iter().map(|item| item.subtotal))
}

/// Saturating sum of amounts
pub fn sum_amounts(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |total, amount| total.saturating_add(amount))
}

/// Round to the currency's minor unit for display
pub fn round_for_display(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(CURRENCY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_DECIMALS);
    rounded
}

/// Format an amount as `$1,234.50` style text
pub fn format_money(value: Decimal, symbol: &str) -> String {
    let rounded = round_for_display(value);
    let text = rounded.abs().to_string();
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}{}.{}", sign, symbol, grouped, fraction)
}

// ============================================================================
// Stock summary
// ============================================================================

/// Aggregate figures shown above the stock listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub product_count: usize,
    pub total_units: Decimal,
    pub total_value: Decimal,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub depleted: usize,
}

impl StockSummary {
    /// Products the alerting view should flag
    pub fn attention_count(&self) -> usize {
        self.low + self.depleted
    }
}

/// Summarise a stock snapshot list using the local classification
pub fn summarize_stock(snapshots: &[StockSnapshot]) -> StockSummary {
    snapshots
        .iter()
        .fold(StockSummary::default(), |mut summary, snapshot| {
            summary.product_count += 1;
            summary.total_units = summary.total_units.saturating_add(snapshot.on_hand);
            summary.total_value = summary
                .total_value
                .saturating_add(snapshot.inventory_value());
            match snapshot.classification() {
                StockClassification::High => summary.high += 1,
                StockClassification::Medium => summary.medium += 1,
                StockClassification::Low => summary.low += 1,
                StockClassification::Depleted => summary.depleted += 1,
            }
            summary
        })
}
