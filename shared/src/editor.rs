//! Line-item editors for invoice entry and manual exits
//!
//! Both keep an ordered, duplicate-free list. Edits apply in the order they
//! are issued and keep derived fields current; validation waits for submit.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::models::{ExitLine, ExitReason, LineItem, LineItemField, Product, StockSnapshot};
use crate::types::{parse_amount, EntityId};
use crate::valuation;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("No line at position {index} (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Warning shown when a product is added twice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateProduct {
    pub product_id: EntityId,
    pub name: String,
}

impl std::fmt::Display for DuplicateProduct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is already in the list", self.name)
    }
}

/// Result of adding a product; a duplicate is a warning, not an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added { index: usize },
    AlreadyPresent(DuplicateProduct),
}

impl AddOutcome {
    pub fn warning(&self) -> Option<&DuplicateProduct> {
        match self {
            AddOutcome::Added { .. } => None,
            AddOutcome::AlreadyPresent(warning) => Some(warning),
        }
    }
}

fn check_index(index: usize, len: usize) -> Result<(), EditorError> {
    if index < len {
        Ok(())
    } else {
        Err(EditorError::IndexOutOfRange { index, len })
    }
}

// ============================================================================
// Invoice entry
// ============================================================================

/// Line items of the invoice being composed
#[derive(Debug, Clone, Default)]
pub struct LineItemEditor {
    items: Vec<LineItem>,
}

impl LineItemEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, product_id: &EntityId) -> bool {
        self.items.iter().any(|item| &item.product_id == product_id)
    }

    pub fn add_product(&mut self, product: &Product) -> AddOutcome {
        if self.contains(&product.id) {
            return AddOutcome::AlreadyPresent(DuplicateProduct {
                product_id: product.id.clone(),
                name: product.name.clone(),
            });
        }
        self.items.push(LineItem::for_product(product));
        AddOutcome::Added {
            index: self.items.len() - 1,
        }
    }

    /// Apply raw text typed into a field.
    ///
    /// Unparseable input is kept as blank and counts as zero until submit.
    pub fn update_field(
        &mut self,
        index: usize,
        field: LineItemField,
        raw: &str,
    ) -> Result<(), EditorError> {
        self.set_field(index, field, parse_amount(raw))
    }

    /// Apply an already parsed value
    pub fn set_field(
        &mut self,
        index: usize,
        field: LineItemField,
        value: Option<Decimal>,
    ) -> Result<(), EditorError> {
        check_index(index, self.items.len())?;
        let item = &mut self.items[index];
        match field {
            LineItemField::Quantity => item.set_quantity(value),
            LineItemField::PurchasePrice => item.set_purchase_price(value),
            LineItemField::CustomSalePrice => item.set_custom_sale_price(value),
            LineItemField::ReturnedQuantity => item.set_returned_quantity(value),
        }
        Ok(())
    }

    pub fn remove_product(&mut self, index: usize) -> Result<LineItem, EditorError> {
        check_index(index, self.items.len())?;
        Ok(self.items.remove(index))
    }

    pub fn total(&self) -> Decimal {
        valuation::invoice_total(&self.items)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

// ============================================================================
// Manual exit
// ============================================================================

/// Lines of the manual exit being composed
#[derive(Debug, Clone, Default)]
pub struct ExitEditor {
    lines: Vec<ExitLine>,
}

impl ExitEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[ExitLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn add_product(&mut self, snapshot: &StockSnapshot) -> AddOutcome {
        if self.lines.iter().any(|line| line.product_id == snapshot.product_id) {
            return AddOutcome::AlreadyPresent(DuplicateProduct {
                product_id: snapshot.product_id.clone(),
                name: snapshot.name.clone(),
            });
        }
        self.lines.push(ExitLine::for_snapshot(snapshot));
        AddOutcome::Added {
            index: self.lines.len() - 1,
        }
    }

    pub fn update_quantity(&mut self, index: usize, raw: &str) -> Result<(), EditorError> {
        self.set_quantity(index, parse_amount(raw))
    }

    pub fn set_quantity(&mut self, index: usize, quantity: Option<Decimal>) -> Result<(), EditorError> {
        check_index(index, self.lines.len())?;
        self.lines[index].quantity = quantity;
        Ok(())
    }

    pub fn set_reason(&mut self, index: usize, reason: Option<ExitReason>) -> Result<(), EditorError> {
        check_index(index, self.lines.len())?;
        self.lines[index].reason = reason;
        Ok(())
    }

    pub fn set_notes(&mut self, index: usize, notes: Option<String>) -> Result<(), EditorError> {
        check_index(index, self.lines.len())?;
        self.lines[index].notes = notes;
        Ok(())
    }

    pub fn remove_product(&mut self, index: usize) -> Result<ExitLine, EditorError> {
        check_index(index, self.lines.len())?;
        Ok(self.lines.remove(index))
    }

    /// Value of all stock leaving, at snapshot sale prices
    pub fn total_value(&self) -> Decimal {
        valuation::sum_amounts(self.lines.iter().map(ExitLine::value))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: EntityId::from(id),
            code: None,
            name: name.to_string(),
            category_id: None,
            supplier_id: None,
            group_id: None,
            purchase_price: None,
            sale_price: None,
        }
    }

    fn snapshot(id: &str, on_hand: &str) -> StockSnapshot {
        StockSnapshot {
            product_id: EntityId::from(id),
            code: None,
            name: format!("Product {}", id),
            category: None,
            supplier: None,
            group: None,
            owner: None,
            on_hand: dec(on_hand),
            sale_price: dec("2.00"),
            purchase_price: None,
            reported_classification: None,
            reported_inventory_value: None,
        }
    }

    #[test]
    fn test_add_product_defaults() {
        let mut editor = LineItemEditor::new();
        let outcome = editor.add_product(&product("1", "Cola 2L"));
        assert_eq!(outcome, AddOutcome::Added { index: 0 });

        let item = &editor.items()[0];
        assert_eq!(item.quantity, Some(Decimal::ONE));
        assert_eq!(item.purchase_price, None);
        assert_eq!(item.custom_sale_price, None);
        assert_eq!(item.subtotal, Decimal::ZERO);
    }

    #[test]
    fn test_duplicate_add_is_a_warning() {
        let mut editor = LineItemEditor::new();
        editor.add_product(&product("1", "Cola 2L"));
        editor.update_field(0, LineItemField::PurchasePrice, "1.50").unwrap();
        let before = editor.items().to_vec();

        let outcome = editor.add_product(&product("1", "Cola 2L"));
        assert_eq!(outcome.warning().unwrap().to_string(), "Cola 2L is already in the list");
        assert_eq!(editor.items(), before.as_slice());
    }

    #[test]
    fn test_update_recomputes_subtotal_and_suggestion() {
        let mut editor = LineItemEditor::new();
        editor.add_product(&product("1", "Cola 2L"));
        editor.update_field(0, LineItemField::Quantity, "2").unwrap();
        editor.update_field(0, LineItemField::PurchasePrice, "1.50").unwrap();

        let item = &editor.items()[0];
        assert_eq!(item.subtotal, dec("3.00"));
        assert_eq!(item.suggested_sale_price, Some(dec("1.65")));
    }

    #[test]
    fn test_invalid_input_counts_as_zero() {
        let mut editor = LineItemEditor::new();
        editor.add_product(&product("1", "Cola 2L"));
        editor.update_field(0, LineItemField::PurchasePrice, "1.50").unwrap();
        editor.update_field(0, LineItemField::Quantity, "two").unwrap();

        assert_eq!(editor.items()[0].quantity, None);
        assert_eq!(editor.items()[0].subtotal, Decimal::ZERO);
    }

    #[test]
    fn test_custom_price_suppresses_suggestion() {
        let mut editor = LineItemEditor::new();
        editor.add_product(&product("1", "Cola 2L"));
        editor.update_field(0, LineItemField::PurchasePrice, "1.00").unwrap();
        editor.update_field(0, LineItemField::CustomSalePrice, "1.25").unwrap();
        editor.update_field(0, LineItemField::PurchasePrice, "2.00").unwrap();

        let item = &editor.items()[0];
        assert_eq!(item.suggested_sale_price, Some(dec("1.10")));
        assert_eq!(item.effective_sale_price(), Some(dec("1.25")));

        editor.update_field(0, LineItemField::CustomSalePrice, "").unwrap();
        assert_eq!(editor.items()[0].effective_sale_price(), Some(dec("2.20")));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut editor = LineItemEditor::new();
        for id in ["a", "b", "c", "d"] {
            editor.add_product(&product(id, id));
        }
        let removed = editor.remove_product(1).unwrap();
        assert_eq!(removed.product_id, EntityId::from("b"));

        let ids: Vec<&str> = editor.items().iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut editor = LineItemEditor::new();
        assert_eq!(
            editor.remove_product(0),
            Err(EditorError::IndexOutOfRange { index: 0, len: 0 })
        );
        assert!(editor.update_field(3, LineItemField::Quantity, "1").is_err());
    }

    #[test]
    fn test_scenario_two_item_total() {
        let mut editor = LineItemEditor::new();
        editor.add_product(&product("1", "Cola 2L"));
        editor.add_product(&product("2", "Juice 1L"));
        editor.update_field(0, LineItemField::Quantity, "2").unwrap();
        editor.update_field(0, LineItemField::PurchasePrice, "1.50").unwrap();
        editor.update_field(1, LineItemField::Quantity, "1").unwrap();
        editor.update_field(1, LineItemField::PurchasePrice, "3.00").unwrap();

        assert_eq!(editor.items()[0].subtotal, dec("3.00"));
        assert_eq!(editor.items()[1].subtotal, dec("3.00"));
        assert_eq!(editor.total(), dec("6.00"));
        assert_eq!(editor.total(), editor.total());
    }

    #[test]
    fn test_exit_editor() {
        let mut editor = ExitEditor::new();
        editor.add_product(&snapshot("1", "3"));
        assert!(editor.add_product(&snapshot("1", "3")).warning().is_some());
        assert_eq!(editor.len(), 1);

        editor.update_quantity(0, "2.5").unwrap();
        editor.set_reason(0, Some(ExitReason::Expired)).unwrap();
        assert_eq!(editor.total_value(), dec("5.00"));

        editor.remove_product(0).unwrap();
        assert!(editor.is_empty());
    }
}
