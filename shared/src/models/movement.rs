//! Ledger movement history models

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{backend_datetime, EntityId, Pagination, PaginationMeta};

/// Direction of a ledger movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Stock received against a supplier invoice
    Entry,
    /// Stock removed (dispatch or manual exit)
    Exit,
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovementKind::Entry => write!(f, "Entry"),
            MovementKind::Exit => write!(f, "Exit"),
        }
    }
}

/// A recorded stock movement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: EntityId,
    pub kind: MovementKind,
    pub product_id: EntityId,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: Decimal,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    #[serde(default)]
    pub total: Option<Decimal>,
    /// Invoice number for entries, exit reason for manual exits
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(with = "backend_datetime")]
    pub occurred_at: NaiveDateTime,
    #[serde(default)]
    pub user_name: Option<String>,
}

/// Aggregate statistics over the filtered movements
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovementStats {
    pub total_entries: u64,
    pub total_exits: u64,
    #[serde(default)]
    pub entry_value: Decimal,
    #[serde(default)]
    pub exit_value: Decimal,
}

impl MovementStats {
    pub fn net_value(&self) -> Decimal {
        self.entry_value.saturating_sub(self.exit_value)
    }
}

/// Query parameters for movement history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovementFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<MovementKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_search: Option<String>,
    pub page: u32,
    pub per_page: u32,
}

impl Default for MovementFilter {
    fn default() -> Self {
        let pagination = Pagination::default();
        Self {
            kind: None,
            product: None,
            from: None,
            to: None,
            text_search: None,
            page: pagination.page,
            per_page: pagination.per_page,
        }
    }
}

/// One page of movement history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovementPage {
    pub movements: Vec<Movement>,
    #[serde(default)]
    pub stats: MovementStats,
    pub pagination: PaginationMeta,
}
