//! Manual stock exit models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::StockSnapshot;
use crate::types::EntityId;
use crate::valuation;

/// Why stock leaves the warehouse outside of a dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExitReason {
    Damaged,
    Expired,
    InternalUse,
    Sample,
    Loss,
    /// Free text entered under "Other"
    Other(String),
}

impl ExitReason {
    /// The fixed choices offered before free text
    pub const PRESETS: [ExitReason; 5] = [
        ExitReason::Damaged,
        ExitReason::Expired,
        ExitReason::InternalUse,
        ExitReason::Sample,
        ExitReason::Loss,
    ];

    pub fn code(&self) -> &str {
        match self {
            ExitReason::Damaged => "damaged",
            ExitReason::Expired => "expired",
            ExitReason::InternalUse => "internal_use",
            ExitReason::Sample => "sample",
            ExitReason::Loss => "loss",
            ExitReason::Other(text) => text.as_str(),
        }
    }

    /// A free-text reason must say something
    pub fn is_blank(&self) -> bool {
        matches!(self, ExitReason::Other(text) if text.trim().is_empty())
    }
}

impl From<String> for ExitReason {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "damaged" => ExitReason::Damaged,
            "expired" => ExitReason::Expired,
            "internal_use" | "internal use" => ExitReason::InternalUse,
            "sample" => ExitReason::Sample,
            "loss" => ExitReason::Loss,
            // The choice label itself carries no free text
            "other" => ExitReason::Other(String::new()),
            _ => ExitReason::Other(raw.trim().to_string()),
        }
    }
}

impl From<ExitReason> for String {
    fn from(reason: ExitReason) -> Self {
        reason.code().to_string()
    }
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitReason::Damaged => write!(f, "Damaged"),
            ExitReason::Expired => write!(f, "Expired"),
            ExitReason::InternalUse => write!(f, "Internal use"),
            ExitReason::Sample => write!(f, "Sample"),
            ExitReason::Loss => write!(f, "Loss"),
            ExitReason::Other(text) => write!(f, "{}", text),
        }
    }
}

/// One product in a manual exit being composed.
///
/// `on_hand` and `sale_price` are copied from the snapshot at selection
/// time and are not refreshed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExitLine {
    pub product_id: EntityId,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: String,
    pub on_hand: Decimal,
    #[serde(default)]
    pub sale_price: Decimal,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub reason: Option<ExitReason>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ExitLine {
    pub fn for_snapshot(snapshot: &StockSnapshot) -> Self {
        Self {
            product_id: snapshot.product_id.clone(),
            code: snapshot.code.clone(),
            name: snapshot.name.clone(),
            on_hand: snapshot.on_hand,
            sale_price: snapshot.sale_price,
            quantity: Some(Decimal::ONE),
            reason: None,
            notes: None,
        }
    }

    /// Value of the stock leaving, at sale price
    pub fn value(&self) -> Decimal {
        valuation::line_subtotal(self.quantity, Some(self.sale_price))
    }
}

/// Request body for a manual exit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExitSubmission {
    pub line_items: Vec<ExitLinePayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExitLinePayload {
    pub product_id: EntityId,
    pub quantity: Decimal,
    pub reason: ExitReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExitSubmission {
    /// Returns `None` if any line lacks a quantity or reason
    pub fn from_lines(lines: &[ExitLine]) -> Option<Self> {
        let line_items = lines
            .iter()
            .map(|line| {
                Some(ExitLinePayload {
                    product_id: line.product_id.clone(),
                    quantity: line.quantity?,
                    reason: line.reason.clone()?,
                    notes: line.notes.clone().filter(|n| !n.trim().is_empty()),
                })
            })
            .collect::<Option<Vec<_>>>()?;

        Some(Self { line_items })
    }
}

/// Ledger acknowledgement of a manual exit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExitReceipt {
    pub total_products: u32,
    pub total_value: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_wire_format() {
        assert_eq!(serde_json::to_string(&ExitReason::InternalUse).unwrap(), "\"internal_use\"");
        let reason: ExitReason = serde_json::from_str("\"Expired\"").unwrap();
        assert_eq!(reason, ExitReason::Expired);
        let other: ExitReason = serde_json::from_str("\"Broken pallet\"").unwrap();
        assert_eq!(other, ExitReason::Other("Broken pallet".to_string()));
    }

    #[test]
    fn test_blank_other_reason() {
        assert!(ExitReason::Other("  ".to_string()).is_blank());
        assert!(!ExitReason::Damaged.is_blank());
    }

    #[test]
    fn test_bare_other_choice_is_blank() {
        let reason: ExitReason = serde_json::from_str("\"Other\"").unwrap();
        assert_eq!(reason, ExitReason::Other(String::new()));
        assert!(reason.is_blank());
        assert!(ExitReason::from(" other ".to_string()).is_blank());
    }
}
