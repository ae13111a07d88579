//! Caption texts printed on the invoice

use render_model::TABLE_COLUMNS;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceLabels {
    pub seller: String,
    pub buyer: String,
    pub tax_id: String,
    pub invoice_number: String,
    pub date: String,
    /// Table captions in column order
    pub columns: [String; TABLE_COLUMNS],
    pub grand_total: String,
}

impl Default for InvoiceLabels {
    fn default() -> Self {
        Self {
            seller: "Seller:".to_string(),
            buyer: "Buyer:".to_string(),
            tax_id: "GSTIN:".to_string(),
            invoice_number: "Invoice No:".to_string(),
            date: "Date:".to_string(),
            columns: ["Description", "Qty", "Unit Price", "Discount", "GST", "Total"]
                .map(String::from),
            grand_total: "Grand Total:".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_single_label() {
        let labels: InvoiceLabels = serde_json::from_str(r#"{"taxId": "VAT:"}"#).unwrap();
        assert_eq!(labels.tax_id, "VAT:");
        assert_eq!(labels.columns[4], "GST");
    }
}
