// ⚠️ Scoring Errors - Receipt fields the scorer could not use

use std::fmt;
use thiserror::Error;

/// Which money amount on the receipt an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountField {
    Price,
    Total,
}

impl AmountField {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmountField::Price => "price",
            AmountField::Total => "total",
        }
    }

    /// Sub-rule that scores this amount
    pub fn rule(&self) -> &'static str {
        match self {
            AmountField::Price => "items",
            AmountField::Total => "total",
        }
    }
}

impl fmt::Display for AmountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A receipt field the scorer could not use
///
/// Under the lenient policy these are logged and the affected rule degrades;
/// under the strict policy the first one rejects the receipt.
#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Invalid price {price:?} for item {description:?}: {source}")]
    InvalidPrice {
        description: String,
        price: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("Invalid total {total:?}: {source}")]
    InvalidTotal {
        total: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("Negative {field} {value:?}")]
    NegativeAmount { field: AmountField, value: String },

    #[error("{field} {value:?} is too large to score")]
    AmountOverflow { field: AmountField, value: String },

    #[error("Purchase date/time {value:?} is not in YYYY-MM-DD HH:MM form")]
    MalformedPurchaseDateTime { value: String },

    #[error("Invalid purchase date/time {value:?}: {source}")]
    InvalidPurchaseDateTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl ScoreError {
    /// Which sub-rule produced the error
    pub fn rule(&self) -> &'static str {
        match self {
            ScoreError::InvalidPrice { .. } => "items",
            ScoreError::InvalidTotal { .. } => "total",
            ScoreError::NegativeAmount { field, .. } | ScoreError::AmountOverflow { field, .. } => {
                field.rule()
            }
            ScoreError::MalformedPurchaseDateTime { .. }
            | ScoreError::InvalidPurchaseDateTime { .. } => "purchase_datetime",
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoreError>;

// ============================================================================
// TESTS
// ============================================================================
