// 🎯 Points Scorer - Loyalty points for a receipt
// Four independent rules, summed: retailer name, items, total, purchase date/time
//
// Each rule returns a Result; the ScoringPolicy decides at aggregation whether
// a field that fails to parse degrades that rule or rejects the receipt.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::{AmountField, Result, ScoreError};
use crate::model::{Item, Receipt};

pub const ITEM_PAIR_POINTS: u64 = 5;
pub const ROUND_DOLLAR_POINTS: u64 = 50;
pub const QUARTER_MULTIPLE_POINTS: u64 = 25;
pub const ODD_DAY_POINTS: u64 = 6;
pub const AFTERNOON_POINTS: u64 = 10;

const DESCRIPTION_LENGTH_MULTIPLE: usize = 3;
const AFTERNOON_START_HOUR: u32 = 14;
const AFTERNOON_END_HOUR: u32 = 16;
const PURCHASE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

// ============================================================================
// POLICY
// ============================================================================

/// What to do when a receipt field cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringPolicy {
    /// Log a warning and score the rule with its degraded value
    #[default]
    Lenient,
    /// Reject the whole receipt
    Strict,
}

impl ScoringPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringPolicy::Lenient => "lenient",
            ScoringPolicy::Strict => "strict",
        }
    }

    /// Decide the points for a rule that failed.
    ///
    /// Lenient keeps the error in `tolerated` and returns `fallback`.
    pub fn resolve(
        &self,
        error: ScoreError,
        fallback: u64,
        tolerated: &mut Vec<ScoreError>,
    ) -> Result<u64> {
        match self {
            ScoringPolicy::Strict => Err(error),
            ScoringPolicy::Lenient => {
                warn!(rule = error.rule(), error = %error, "Scoring with degraded value");
                tolerated.push(error);
                Ok(fallback)
            }
        }
    }
}

impl fmt::Display for ScoringPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(ScoringPolicy::Lenient),
            "strict" => Ok(ScoringPolicy::Strict),
            other => Err(format!(
                "unknown scoring policy {:?} (expected \"lenient\" or \"strict\")",
                other
            )),
        }
    }
}

// ============================================================================
// BREAKDOWN
// ============================================================================

/// Points earned per rule, plus the field errors that were tolerated
#[derive(Debug, Default)]
pub struct ScoreBreakdown {
    pub retailer: u64,
    pub item_pairs: u64,
    pub item_descriptions: u64,
    pub total: u64,
    pub purchase_datetime: u64,
    pub tolerated: Vec<ScoreError>,
}

impl ScoreBreakdown {
    pub fn points(&self) -> u64 {
        [
            self.item_pairs,
            self.item_descriptions,
            self.total,
            self.purchase_datetime,
        ]
        .into_iter()
        .fold(self.retailer, u64::saturating_add)
    }

    pub fn is_degraded(&self) -> bool {
        !self.tolerated.is_empty()
    }
}

// ============================================================================
// SCORER
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct PointsScorer {
    policy: ScoringPolicy,
}

impl PointsScorer {
    pub fn new(policy: ScoringPolicy) -> Self {
        PointsScorer { policy }
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    /// Score every rule and keep the per-rule points
    pub fn breakdown(&self, receipt: &Receipt) -> Result<ScoreBreakdown> {
        let mut tolerated = Vec::new();

        let mut item_descriptions: u64 = 0;
        for item in &receipt.items {
            let running = item_description_points(item).and_then(|points| {
                item_descriptions
                    .checked_add(points)
                    .ok_or_else(|| ScoreError::AmountOverflow {
                        field: AmountField::Price,
                        value: item.price.clone(),
                    })
            });
            item_descriptions = match running {
                Ok(sum) => sum,
                Err(e) => {
                    // An item that cannot be scored adds nothing
                    self.policy.resolve(e, 0, &mut tolerated)?;
                    item_descriptions
                }
            };
        }

        let total = match total_points(&receipt.total) {
            Ok(points) => points,
            Err(e) => self.policy.resolve(e, cents_points(0), &mut tolerated)?,
        };

        let purchase_datetime =
            match parse_purchase_datetime(&receipt.purchase_date, &receipt.purchase_time) {
                Ok(datetime) => datetime_points(&datetime),
                Err(e) => {
                    self.policy
                        .resolve(e, datetime_points(&unparsed_datetime()), &mut tolerated)?
                }
            };

        Ok(ScoreBreakdown {
            retailer: retailer_points(&receipt.retailer),
            item_pairs: item_pair_points(receipt.items.len()),
            item_descriptions,
            total,
            purchase_datetime,
            tolerated,
        })
    }

    pub fn score(&self, receipt: &Receipt) -> Result<u64> {
        Ok(self.breakdown(receipt)?.points())
    }
}

/// Score with the lenient policy, which never rejects a receipt
pub fn score_receipt(receipt: &Receipt) -> u64 {
    PointsScorer::new(ScoringPolicy::Lenient)
        .score(receipt)
        .unwrap_or(0)
}

// ============================================================================
// RULES
// ============================================================================

/// One point per ASCII letter or digit
pub fn retailer_points(retailer: &str) -> u64 {
    retailer.chars().filter(|c| c.is_ascii_alphanumeric()).count() as u64
}

/// Five points for every two items
pub fn item_pair_points(item_count: usize) -> u64 {
    ITEM_PAIR_POINTS * (item_count / 2) as u64
}

/// `ceil(price * 0.2)` when the trimmed description length is a positive multiple of 3
pub fn item_description_points(item: &Item) -> Result<u64> {
    let price = Decimal::from_str(&item.price).map_err(|source| ScoreError::InvalidPrice {
        description: item.short_description.clone(),
        price: item.price.clone(),
        source,
    })?;
    if price < Decimal::ZERO {
        return Err(ScoreError::NegativeAmount {
            field: AmountField::Price,
            value: item.price.clone(),
        });
    }

    // Length in bytes of the trimmed UTF-8 text
    let length = item.short_description.trim().len();
    if length == 0 || length % DESCRIPTION_LENGTH_MULTIPLE != 0 {
        return Ok(0);
    }

    price
        .checked_mul(Decimal::new(2, 1))
        .and_then(|product| product.ceil().to_u64())
        .ok_or_else(|| ScoreError::AmountOverflow {
            field: AmountField::Price,
            value: item.price.clone(),
        })
}

/// Parse the total and score its cents
pub fn total_points(total: &str) -> Result<u64> {
    Ok(cents_points(total_cents(total)?))
}

/// `round(total * 100)`, midpoint away from zero
pub fn total_cents(total: &str) -> Result<i128> {
    let amount = Decimal::from_str(total).map_err(|source| ScoreError::InvalidTotal {
        total: total.to_string(),
        source,
    })?;
    if amount < Decimal::ZERO {
        return Err(ScoreError::NegativeAmount {
            field: AmountField::Total,
            value: total.to_string(),
        });
    }

    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| {
            cents
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i128()
        })
        .ok_or_else(|| ScoreError::AmountOverflow {
            field: AmountField::Total,
            value: total.to_string(),
        })
}

/// 50 for a round dollar amount, 25 for a multiple of 0.25; both can apply
pub fn cents_points(cents: i128) -> u64 {
    let mut points = 0;
    if cents % 100 == 0 {
        points += ROUND_DOLLAR_POINTS;
    }
    if cents % 25 == 0 {
        points += QUARTER_MULTIPLE_POINTS;
    }
    points
}

/// Parse `YYYY-MM-DD` and `HH:MM`; every field must be zero-padded
pub fn parse_purchase_datetime(date: &str, time: &str) -> Result<NaiveDateTime> {
    let value = format!("{} {}", date, time);
    if !matches_shape(date, "dddd-dd-dd") || !matches_shape(time, "dd:dd") {
        return Err(ScoreError::MalformedPurchaseDateTime { value });
    }
    NaiveDateTime::parse_from_str(&value, PURCHASE_DATETIME_FORMAT)
        .map_err(|source| ScoreError::InvalidPurchaseDateTime { value, source })
}

// `d` stands for one ASCII digit; any other byte must match exactly.
fn matches_shape(text: &str, shape: &str) -> bool {
    text.len() == shape.len()
        && text.bytes().zip(shape.bytes()).all(|(c, s)| match s {
            b'd' => c.is_ascii_digit(),
            _ => c == s,
        })
}

/// 6 for an odd day of month, 10 for a purchase strictly between 14:00 and 16:00
pub fn datetime_points(datetime: &NaiveDateTime) -> u64 {
    let mut points = 0;
    if datetime.day() % 2 != 0 {
        points += ODD_DAY_POINTS;
    }
    if in_afternoon_window(datetime.hour(), datetime.minute()) {
        points += AFTERNOON_POINTS;
    }
    points
}

/// 14:00 itself is excluded; every minute of hour 15 is included
pub fn in_afternoon_window(hour: u32, minute: u32) -> bool {
    let after_start = hour > AFTERNOON_START_HOUR || (hour == AFTERNOON_START_HOUR && minute > 0);
    let before_end = hour < AFTERNOON_END_HOUR;
    after_start && before_end
}

// Stand-in for an unparsable date-time: 0001-01-01 00:00.
fn unparsed_datetime() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

// ============================================================================
// TESTS
// ============================================================================
