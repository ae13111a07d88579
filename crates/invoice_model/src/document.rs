//! Invoice document
//!
//! The fully-populated value the data-entry layer hands to the engine.
//! Nothing in the engine mutates it.

use crate::{compute, LineItem, ModelError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A trading party (seller or buyer).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub name: String,
    /// Tax registration number (GSTIN)
    pub tax_id: String,
}

impl Party {
    pub fn new(name: impl Into<String>, tax_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tax_id: tax_id.into(),
        }
    }
}

/// Complete invoice handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDocument {
    pub seller: Party,
    pub buyer: Party,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub store_name: Option<String>,
    /// Address lines, drawn one per row under the store name
    #[serde(default)]
    pub store_address: Vec<String>,
    /// Raw logo image bytes (PNG, JPEG, ...)
    #[serde(skip)]
    pub logo: Option<Arc<Vec<u8>>>,
    /// Raw signature or hologram image bytes
    #[serde(skip)]
    pub signature: Option<Arc<Vec<u8>>>,
    /// Caller-supplied grand total. Printed as-is; see [`InvoiceDocument::with_computed_total`].
    #[serde(default)]
    pub grand_total: f64,
}

impl InvoiceDocument {
    pub fn new(
        seller: Party,
        buyer: Party,
        invoice_number: impl Into<String>,
        invoice_date: NaiveDate,
    ) -> Self {
        Self {
            seller,
            buyer,
            invoice_number: invoice_number.into(),
            invoice_date,
            items: Vec::new(),
            store_name: None,
            store_address: Vec::new(),
            logo: None,
            signature: None,
            grand_total: 0.0,
        }
    }

    /// Build the invoice date from calendar parts.
    pub fn date_from_ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(ModelError::InvalidDate { year, month, day })
    }

    pub fn with_items(mut self, items: Vec<LineItem>) -> Self {
        self.items = items;
        self
    }

    pub fn with_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_store_name(mut self, name: impl Into<String>) -> Self {
        self.store_name = Some(name.into());
        self
    }

    pub fn with_store_address(mut self, lines: Vec<String>) -> Self {
        self.store_address = lines;
        self
    }

    /// Split a free-form address on `\r\n` / `\n` into address lines.
    pub fn with_store_address_text(mut self, text: &str) -> Self {
        self.store_address = text.lines().map(str::to_string).collect();
        self
    }

    pub fn with_logo(mut self, bytes: Vec<u8>) -> Self {
        self.logo = Some(Arc::new(bytes));
        self
    }

    pub fn with_signature(mut self, bytes: Vec<u8>) -> Self {
        self.signature = Some(Arc::new(bytes));
        self
    }

    pub fn with_grand_total(mut self, total: f64) -> Self {
        self.grand_total = total;
        self
    }

    /// Fill the grand total from the line-item calculator.
    pub fn with_computed_total(mut self) -> Self {
        self.grand_total = compute(&self.items).grand_total;
        self
    }

    /// Store name, ignoring blank values.
    pub fn store_name(&self) -> Option<&str> {
        self.store_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }

    /// Logo bytes, ignoring empty payloads.
    pub fn logo_bytes(&self) -> Option<&[u8]> {
        self.logo.as_deref().map(Vec::as_slice).filter(|b| !b.is_empty())
    }

    /// Signature bytes, ignoring empty payloads.
    pub fn signature_bytes(&self) -> Option<&[u8]> {
        self.signature
            .as_deref()
            .map(Vec::as_slice)
            .filter(|b| !b.is_empty())
    }

    /// Validate item values that would make the arithmetic meaningless.
    pub fn validate(&self) -> Result<()> {
        for (index, item) in self.items.iter().enumerate() {
            let fields = [
                ("unit price", item.unit_price),
                ("discount rate", item.discount_rate),
                ("tax rate", item.tax_rate),
            ];
            for (field, value) in fields {
                if !value.is_finite() {
                    return Err(ModelError::InvalidLineItem {
                        index,
                        reason: format!("{} is not a finite number", field),
                    });
                }
            }
        }
        Ok(())
    }
}
