//! Submission validators for invoice entry and manual exits
//!
//! Rules are checked in a fixed order. `validate_*` reports the first
//! violation; `*_violations` lists every violation in the same order so the
//! view can mark all offending fields at once.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::models::{ExitLine, InvoiceHeader, LineItem};

/// A rule violated by a composed invoice or exit request.
///
/// `line` indices are zero-based; messages number lines from one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invoice number is required")]
    MissingInvoiceNumber,

    #[error("Supplier is required")]
    MissingSupplier,

    #[error("Invoice date is required")]
    MissingInvoiceDate,

    #[error("Add at least one product")]
    NoLineItems,

    #[error("Line {}: quantity must be greater than zero", .line + 1)]
    NonPositiveQuantity { line: usize },

    #[error("Line {}: purchase price must be greater than zero", .line + 1)]
    NonPositivePurchasePrice { line: usize },

    #[error("Line {}: returned quantity cannot be negative", .line + 1)]
    NegativeReturnedQuantity { line: usize },

    #[error("Line {}: returned quantity cannot exceed the quantity received", .line + 1)]
    ReturnedExceedsQuantity { line: usize },

    #[error("Line {}: sale price must be greater than zero", .line + 1)]
    NonPositiveSalePrice { line: usize },

    #[error("Line {}: only {on_hand} units on hand, {requested} requested", .line + 1)]
    ExceedsOnHand {
        line: usize,
        requested: Decimal,
        on_hand: Decimal,
    },

    #[error("Line {}: a reason is required", .line + 1)]
    MissingReason { line: usize },
}

/// Field to highlight in the form after a failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMark {
    pub line: Option<usize>,
    pub field: &'static str,
}

impl ValidationError {
    pub fn mark(&self) -> FieldMark {
        let (line, field) = match self {
            ValidationError::MissingInvoiceNumber => (None, "invoiceNumber"),
            ValidationError::MissingSupplier => (None, "supplierId"),
            ValidationError::MissingInvoiceDate => (None, "invoiceDate"),
            ValidationError::NoLineItems => (None, "lineItems"),
            ValidationError::NonPositiveQuantity { line }
            | ValidationError::ExceedsOnHand { line, .. } => (Some(*line), "quantity"),
            ValidationError::NonPositivePurchasePrice { line } => (Some(*line), "purchasePrice"),
            ValidationError::NegativeReturnedQuantity { line }
            | ValidationError::ReturnedExceedsQuantity { line } => {
                (Some(*line), "returnedQuantity")
            }
            ValidationError::NonPositiveSalePrice { line } => (Some(*line), "customSalePrice"),
            ValidationError::MissingReason { line } => (Some(*line), "reason"),
        };
        FieldMark { line, field }
    }
}

fn is_positive(value: Option<Decimal>) -> bool {
    value.map(|v| v > Decimal::ZERO).unwrap_or(false)
}

// ============================================================================
// Invoice entry
// ============================================================================

/// Every rule the invoice breaks, in check order
pub fn invoice_violations(header: &InvoiceHeader, items: &[LineItem]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if header.invoice_number.trim().is_empty() {
        errors.push(ValidationError::MissingInvoiceNumber);
    }
    if header.supplier_id.as_ref().map_or(true, |id| id.is_blank()) {
        errors.push(ValidationError::MissingSupplier);
    }
    if header.invoice_date.is_none() {
        errors.push(ValidationError::MissingInvoiceDate);
    }
    if items.is_empty() {
        errors.push(ValidationError::NoLineItems);
    }

    for (line, item) in items.iter().enumerate() {
        if !is_positive(item.quantity) {
            errors.push(ValidationError::NonPositiveQuantity { line });
        }
        if !is_positive(item.purchase_price) {
            errors.push(ValidationError::NonPositivePurchasePrice { line });
        }
        if item.returned_quantity < Decimal::ZERO {
            errors.push(ValidationError::NegativeReturnedQuantity { line });
        } else if item.returned_quantity > item.quantity.unwrap_or(Decimal::ZERO) {
            errors.push(ValidationError::ReturnedExceedsQuantity { line });
        }
        if item.custom_sale_price.is_some() && !is_positive(item.custom_sale_price) {
            errors.push(ValidationError::NonPositiveSalePrice { line });
        }
    }

    errors
}

/// First rule the invoice breaks, if any
pub fn validate_invoice(header: &InvoiceHeader, items: &[LineItem]) -> Result<(), ValidationError> {
    match invoice_violations(header, items).into_iter().next() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

// ============================================================================
// Manual exit
// ============================================================================

/// Every rule the exit request breaks, in check order
pub fn exit_violations(lines: &[ExitLine]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if lines.is_empty() {
        errors.push(ValidationError::NoLineItems);
    }

    for (line, item) in lines.iter().enumerate() {
        match item.quantity {
            Some(requested) if requested > Decimal::ZERO => {
                if requested > item.on_hand {
                    errors.push(ValidationError::ExceedsOnHand {
                        line,
                        requested,
                        on_hand: item.on_hand,
                    });
                }
            }
            _ => errors.push(ValidationError::NonPositiveQuantity { line }),
        }
        if item.reason.as_ref().map_or(true, |reason| reason.is_blank()) {
            errors.push(ValidationError::MissingReason { line });
        }
    }

    errors
}

/// First rule the exit request breaks, if any
pub fn validate_exit(lines: &[ExitLine]) -> Result<(), ValidationError> {
    match exit_violations(lines).into_iter().next() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExitReason;
    use crate::types::EntityId;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn header() -> InvoiceHeader {
        InvoiceHeader {
            invoice_number: "F-0001".to_string(),
            supplier_id: Some(EntityId::from(3)),
            invoice_date: NaiveDate::from_ymd_opt(2024, 5, 2),
            notes: None,
        }
    }

    fn line(quantity: &str, price: &str) -> LineItem {
        let mut item = LineItem {
            product_id: EntityId::from("P-1"),
            code: None,
            name: "Cola 2L".to_string(),
            quantity: None,
            purchase_price: None,
            custom_sale_price: None,
            suggested_sale_price: None,
            returned_quantity: Decimal::ZERO,
            subtotal: Decimal::ZERO,
        };
        item.set_quantity(crate::types::parse_amount(quantity));
        item.set_purchase_price(crate::types::parse_amount(price));
        item
    }

    fn exit_line(on_hand: &str, quantity: &str, reason: Option<ExitReason>) -> ExitLine {
        ExitLine {
            product_id: EntityId::from("P-9"),
            code: None,
            name: "Water 600ml".to_string(),
            on_hand: dec(on_hand),
            sale_price: dec("0.80"),
            quantity: crate::types::parse_amount(quantity),
            reason,
            notes: None,
        }
    }

    #[test]
    fn test_valid_invoice() {
        assert!(validate_invoice(&header(), &[line("2", "1.50")]).is_ok());
    }

    #[test]
    fn test_each_header_rule_independently() {
        let items = [line("2", "1.50")];

        let mut h = header();
        h.invoice_number = "   ".to_string();
        assert_eq!(validate_invoice(&h, &items), Err(ValidationError::MissingInvoiceNumber));

        let mut h = header();
        h.supplier_id = None;
        assert_eq!(validate_invoice(&h, &items), Err(ValidationError::MissingSupplier));

        let mut h = header();
        h.invoice_date = None;
        assert_eq!(validate_invoice(&h, &items), Err(ValidationError::MissingInvoiceDate));

        assert_eq!(validate_invoice(&header(), &[]), Err(ValidationError::NoLineItems));
    }

    #[test]
    fn test_line_rules() {
        assert_eq!(
            validate_invoice(&header(), &[line("0", "1.50")]),
            Err(ValidationError::NonPositiveQuantity { line: 0 })
        );
        assert_eq!(
            validate_invoice(&header(), &[line("2", "1.50"), line("2", "-1")]),
            Err(ValidationError::NonPositivePurchasePrice { line: 1 })
        );
        assert_eq!(
            validate_invoice(&header(), &[line("abc", "1.50")]),
            Err(ValidationError::NonPositiveQuantity { line: 0 })
        );
    }

    #[test]
    fn test_returned_quantity_rules() {
        let mut item = line("5", "1.00");
        item.set_returned_quantity(Some(dec("6")));
        assert_eq!(
            validate_invoice(&header(), &[item.clone()]),
            Err(ValidationError::ReturnedExceedsQuantity { line: 0 })
        );

        item.set_returned_quantity(Some(dec("5")));
        assert!(validate_invoice(&header(), &[item.clone()]).is_ok());

        item.set_returned_quantity(Some(dec("-1")));
        assert_eq!(
            validate_invoice(&header(), &[item]),
            Err(ValidationError::NegativeReturnedQuantity { line: 0 })
        );
    }

    #[test]
    fn test_violations_keep_check_order() {
        let h = InvoiceHeader::default();
        let errors = invoice_violations(&h, &[line("0", "0")]);
        assert_eq!(
            errors,
            vec![
                ValidationError::MissingInvoiceNumber,
                ValidationError::MissingSupplier,
                ValidationError::MissingInvoiceDate,
                ValidationError::NonPositiveQuantity { line: 0 },
                ValidationError::NonPositivePurchasePrice { line: 0 },
            ]
        );
        assert_eq!(validate_invoice(&h, &[]), Err(errors[0].clone()));
    }

    #[test]
    fn test_exit_over_on_hand_rejected() {
        let lines = [exit_line("3", "5", Some(ExitReason::Damaged))];
        assert_eq!(
            validate_exit(&lines),
            Err(ValidationError::ExceedsOnHand {
                line: 0,
                requested: dec("5"),
                on_hand: dec("3"),
            })
        );
        assert!(validate_exit(&[exit_line("3", "3", Some(ExitReason::Damaged))]).is_ok());
    }

    #[test]
    fn test_exit_reason_required() {
        assert_eq!(
            validate_exit(&[exit_line("10", "1", None)]),
            Err(ValidationError::MissingReason { line: 0 })
        );
        assert_eq!(
            validate_exit(&[exit_line("10", "1", Some(ExitReason::Other(" ".to_string())))]),
            Err(ValidationError::MissingReason { line: 0 })
        );
        assert_eq!(
            validate_exit(&[exit_line("10", "1", Some(ExitReason::from("Other".to_string())))]),
            Err(ValidationError::MissingReason { line: 0 })
        );
        assert!(validate_exit(&[exit_line("10", "1", Some(ExitReason::Other("Promo".into())))]).is_ok());
    }

    #[test]
    fn test_exit_empty_and_zero_quantity() {
        assert_eq!(validate_exit(&[]), Err(ValidationError::NoLineItems));
        assert_eq!(
            validate_exit(&[exit_line("10", "0", Some(ExitReason::Loss))]),
            Err(ValidationError::NonPositiveQuantity { line: 0 })
        );
    }

    #[test]
    fn test_messages_number_lines_from_one() {
        let error = ValidationError::NonPositiveQuantity { line: 0 };
        assert_eq!(error.to_string(), "Line 1: quantity must be greater than zero");
        assert_eq!(error.mark(), FieldMark { line: Some(0), field: "quantity" });
    }
}
