//! Stock snapshot models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::EntityId;
use crate::valuation;

/// Four-bucket stock level label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StockClassification {
    /// 50 units or more
    High,
    /// 11 to 49 units
    Medium,
    /// 1 to 10 units
    Low,
    /// Nothing on hand
    Depleted,
}

impl StockClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockClassification::High => "high",
            StockClassification::Medium => "medium",
            StockClassification::Low => "low",
            StockClassification::Depleted => "depleted",
        }
    }
}

impl std::fmt::Display for StockClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockClassification::High => write!(f, "High"),
            StockClassification::Medium => write!(f, "Medium"),
            StockClassification::Low => write!(f, "Low"),
            StockClassification::Depleted => write!(f, "Depleted"),
        }
    }
}

/// Point-in-time stock row as reported by the ledger.
///
/// Read only. The ledger also reports its own classification and value;
/// the console recomputes both locally so every view agrees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockSnapshot {
    #[serde(alias = "id")]
    pub product_id: EntityId,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(alias = "onHandQuantity")]
    pub on_hand: Decimal,
    pub sale_price: Decimal,
    #[serde(default)]
    pub purchase_price: Option<Decimal>,
    /// Free-form label; unknown values must not fail the decode
    #[serde(default, rename = "classification")]
    pub reported_classification: Option<String>,
    #[serde(default, rename = "inventoryValue")]
    pub reported_inventory_value: Option<Decimal>,
}

impl StockSnapshot {
    pub fn classification(&self) -> StockClassification {
        valuation::classify(self.on_hand)
    }

    pub fn inventory_value(&self) -> Decimal {
        valuation::inventory_value(self.on_hand, self.sale_price)
    }

    /// Low or depleted products surface in the alerts view
    pub fn needs_attention(&self) -> bool {
        matches!(
            self.classification(),
            StockClassification::Low | StockClassification::Depleted
        )
    }
}

/// Stock-level filter offered by the listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockStateFilter {
    #[default]
    All,
    High,
    Medium,
    Low,
    Depleted,
    /// Low and depleted together
    Alerts,
}

impl StockStateFilter {
    pub fn matches(&self, classification: StockClassification) -> bool {
        match self {
            StockStateFilter::All => true,
            StockStateFilter::High => classification == StockClassification::High,
            StockStateFilter::Medium => classification == StockClassification::Medium,
            StockStateFilter::Low => classification == StockClassification::Low,
            StockStateFilter::Depleted => classification == StockClassification::Depleted,
            StockStateFilter::Alerts => matches!(
                classification,
                StockClassification::Low | StockClassification::Depleted
            ),
        }
    }
}

/// Query parameters for the current stock endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_filter: Option<StockStateFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_search: Option<String>,
}

impl StockFilter {
    pub fn alerts() -> Self {
        Self {
            state_filter: Some(StockStateFilter::Alerts),
            ..Self::default()
        }
    }
}
