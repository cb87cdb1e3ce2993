//! CSV export of stock listings

use rust_decimal::Decimal;
use serde::Serialize;
use shared::{round_for_display, StockSnapshot};

use crate::error::{ConsoleError, ConsoleResult};

/// One row of the stock report
#[derive(Debug, Serialize)]
pub struct StockReportRow {
    pub product_id: String,
    pub code: String,
    pub name: String,
    pub category: String,
    pub supplier: String,
    pub on_hand: Decimal,
    pub sale_price: Decimal,
    pub inventory_value: Decimal,
    pub classification: &'static str,
}

impl From<&StockSnapshot> for StockReportRow {
    fn from(snapshot: &StockSnapshot) -> Self {
        Self {
            product_id: snapshot.product_id.to_string(),
            code: snapshot.code.clone().unwrap_or_default(),
            name: snapshot.name.clone(),
            category: snapshot.category.clone().unwrap_or_default(),
            supplier: snapshot.supplier.clone().unwrap_or_default(),
            on_hand: snapshot.on_hand,
            sale_price: round_for_display(snapshot.sale_price),
            inventory_value: round_for_display(snapshot.inventory_value()),
            classification: snapshot.classification().as_str(),
        }
    }
}

/// Stock listing as CSV, header row first
pub fn stock_report(snapshots: &[StockSnapshot]) -> ConsoleResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for snapshot in snapshots {
        writer
            .serialize(StockReportRow::from(snapshot))
            .map_err(|e| ConsoleError::Export(format!("row {}: {}", snapshot.product_id, e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ConsoleError::Export(e.into_error().to_string()))?;
    String::from_utf8(bytes).map_err(|e| ConsoleError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_report_columns() {
        let snapshot: StockSnapshot = serde_json::from_str(
            r#"{"productId": 3, "code": "BEV-003", "name": "Cola 2L", "category": "Soft drinks",
                "onHand": "12", "salePrice": "1.655"}"#,
        )
        .unwrap();

        let csv = stock_report(&[snapshot]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "product_id,code,name,category,supplier,on_hand,sale_price,inventory_value,classification"
        );
        assert_eq!(lines.next().unwrap(), "3,BEV-003,Cola 2L,Soft drinks,,12,1.66,19.86,medium");
    }

    #[test]
    fn test_names_with_commas_are_quoted() {
        let snapshot: StockSnapshot = serde_json::from_str(
            r#"{"productId": 4, "name": "Water, sparkling 1L", "onHand": "0", "salePrice": "0.90"}"#,
        )
        .unwrap();

        let csv = stock_report(&[snapshot]).unwrap();
        assert_eq!(
            csv.lines().nth(1).unwrap(),
            "4,,\"Water, sparkling 1L\",,,0,0.90,0.00,depleted"
        );
    }

    #[test]
    fn test_empty_export_has_no_rows() {
        assert_eq!(stock_report(&[]).unwrap(), "");
    }
}
