//! Invoice line items

use serde::{Deserialize, Serialize};

/// One invoice row.
///
/// Rates are percentages (`18.0` means 18%). They are expected to lie in
/// `0..=100` but are never clamped; whatever the caller supplies is used
/// verbatim by the calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    pub quantity: u32,
    pub unit_price: f64,
    #[serde(default)]
    pub discount_rate: f64,
    #[serde(default)]
    pub tax_rate: f64,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: u32, unit_price: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
            discount_rate: 0.0,
            tax_rate: 0.0,
        }
    }

    pub fn with_discount_rate(mut self, rate: f64) -> Self {
        self.discount_rate = rate;
        self
    }

    pub fn with_tax_rate(mut self, rate: f64) -> Self {
        self.tax_rate = rate;
        self
    }
}
