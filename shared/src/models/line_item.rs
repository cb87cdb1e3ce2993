//! Invoice line items

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;
use crate::types::EntityId;
use crate::valuation;

/// One product entry within an invoice being composed.
///
/// Numeric inputs are parsed once when edited; `None` means blank or
/// unparseable and counts as zero for derived values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: EntityId,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub purchase_price: Option<Decimal>,
    /// User override; suppresses the suggestion while set
    #[serde(default)]
    pub custom_sale_price: Option<Decimal>,
    #[serde(default)]
    pub suggested_sale_price: Option<Decimal>,
    #[serde(default)]
    pub returned_quantity: Decimal,
    #[serde(default)]
    pub subtotal: Decimal,
}

/// Editable fields of a line item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LineItemField {
    Quantity,
    PurchasePrice,
    CustomSalePrice,
    ReturnedQuantity,
}

impl LineItemField {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineItemField::Quantity => "quantity",
            LineItemField::PurchasePrice => "purchasePrice",
            LineItemField::CustomSalePrice => "customSalePrice",
            LineItemField::ReturnedQuantity => "returnedQuantity",
        }
    }
}

impl LineItem {
    /// Fresh line for a product: one unit, prices blank
    pub fn for_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            code: product.code.clone(),
            name: product.name.clone(),
            quantity: Some(Decimal::ONE),
            purchase_price: None,
            custom_sale_price: None,
            suggested_sale_price: None,
            returned_quantity: Decimal::ZERO,
            subtotal: Decimal::ZERO,
        }
    }

    pub fn set_quantity(&mut self, quantity: Option<Decimal>) {
        self.quantity = quantity;
        self.subtotal = valuation::line_subtotal(self.quantity, self.purchase_price);
    }

    pub fn set_purchase_price(&mut self, price: Option<Decimal>) {
        self.purchase_price = price;
        self.subtotal = valuation::line_subtotal(self.quantity, self.purchase_price);
        if self.custom_sale_price.is_none() {
            self.suggested_sale_price = self.purchase_price.map(valuation::suggested_sale_price);
        }
    }

    /// Setting `None` drops the override and brings the suggestion back
    pub fn set_custom_sale_price(&mut self, price: Option<Decimal>) {
        self.custom_sale_price = price;
        if self.custom_sale_price.is_none() {
            self.suggested_sale_price = self.purchase_price.map(valuation::suggested_sale_price);
        }
    }

    pub fn set_returned_quantity(&mut self, returned: Option<Decimal>) {
        self.returned_quantity = returned.unwrap_or(Decimal::ZERO);
    }

    /// Re-derive subtotal and suggestion, e.g. after deserializing
    pub fn refresh_derived(&mut self) {
        self.subtotal = valuation::line_subtotal(self.quantity, self.purchase_price);
        if self.custom_sale_price.is_none() {
            self.suggested_sale_price = self.purchase_price.map(valuation::suggested_sale_price);
        }
    }

    /// Price the product will be sold at
    pub fn effective_sale_price(&self) -> Option<Decimal> {
        self.custom_sale_price.or(self.suggested_sale_price)
    }

    pub fn net_quantity(&self) -> Decimal {
        valuation::net_quantity(self.quantity.unwrap_or(Decimal::ZERO), self.returned_quantity)
    }
}
