// 🧾 Receipt Model - Wire format for submitted receipts
// Amounts and dates stay as text; the scorer parses them per rule

use serde::{Deserialize, Serialize};

/// A purchase receipt as submitted by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub retailer: String,

    /// `YYYY-MM-DD`
    pub purchase_date: String,

    /// 24-hour `HH:MM`
    pub purchase_time: String,

    pub items: Vec<Item>,

    /// Decimal amount, e.g. "35.35"
    pub total: String,
}

/// One line entry on a receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub short_description: String,
    pub price: String,
}

impl Item {
    pub fn new(short_description: impl Into<String>, price: impl Into<String>) -> Self {
        Item {
            short_description: short_description.into(),
            price: price.into(),
        }
    }
}

impl Receipt {
    /// Purchase date and time joined the way the date/time rule parses them
    pub fn purchase_datetime_text(&self) -> String {
        format!("{} {}", self.purchase_date, self.purchase_time)
    }
}

// ============================================================================
// TESTS
// ============================================================================
