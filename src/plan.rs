//! Rebalance output: per-position order suggestions and portfolio summary.

use std::cmp::Ordering;
use std::fmt;

use crate::types::Ticker;

/// Direction of a suggested order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl Action {
    /// Classify a signed share delta.
    #[inline]
    pub fn from_delta(quantity_delta: i64) -> Self {
        match quantity_delta.cmp(&0) {
            Ordering::Greater => Action::Buy,
            Ordering::Less => Action::Sell,
            Ordering::Equal => Action::Hold,
        }
    }

    /// Presentation rank: rows that need acting on come first.
    #[inline]
    pub fn rank(self) -> u8 {
        match self {
            Action::Buy => 0,
            Action::Sell => 1,
            Action::Hold => 2,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
            Action::Hold => write!(f, "HOLD"),
        }
    }
}

/// One computed row of a rebalance plan.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanRow {
    pub ticker: Ticker,
    pub price: f64,
    pub quantity: f64,
    pub current_value: f64,
    /// Target as entered by the user (percent points, before normalization)
    pub target_pct: f64,
    /// Normalized target weight in `[0, 1]`
    pub target_weight: f64,
    pub target_value: f64,
    /// `target_value - current_value`
    pub value_delta: f64,
    /// Whole shares to trade: positive buys, negative sells
    pub quantity_delta: i64,
    pub action: Action,
    /// `quantity_delta * price`; negative for sells (cash released)
    pub order_value: f64,
    /// Projected holding after the order, never negative
    pub post_quantity: f64,
    pub post_value: f64,
    pub post_participation_pct: f64,
}

/// Portfolio-level figures for a plan.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioSummary {
    /// Snapshot value before any order
    pub current_total: f64,
    /// Cash added (positive) or withdrawn (negative)
    pub contribution: f64,
    /// `current_total + contribution`
    pub investable_total: f64,
    /// Net cash spent by the suggested orders (sells count negative)
    pub cash_consumed: f64,
    /// `contribution - cash_consumed`; nonzero because of whole-share rounding
    pub cash_remainder: f64,
    /// Sum of post-trade values plus the cash remainder
    pub post_total: f64,
}

/// Cash remainders smaller than this are treated as zero in notices.
pub const REMAINDER_EPSILON: f64 = 1e-6;

/// The full result of one rebalance computation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RebalancePlan {
    pub rows: Vec<PlanRow>,
    pub summary: PortfolioSummary,
}

impl RebalancePlan {
    /// Row for a ticker, if it was part of the working set.
    pub fn row(&self, ticker: &str) -> Option<&PlanRow> {
        self.rows.iter().find(|r| r.ticker.as_str() == ticker)
    }

    /// Rows that require an order (BUY or SELL).
    pub fn orders(&self) -> impl Iterator<Item = &PlanRow> {
        self.rows.iter().filter(|r| r.action != Action::Hold)
    }

    /// Number of BUY and SELL rows.
    pub fn order_count(&self) -> usize {
        self.orders().count()
    }

    /// True when whole-share rounding left cash unallocated (or overdrawn).
    pub fn has_rounding_remainder(&self) -> bool {
        self.summary.cash_remainder.abs() > REMAINDER_EPSILON
    }
}

/// Order rows BUY first, then SELL, then HOLD; ties by ascending ticker.
pub(crate) fn sort_rows(rows: &mut [PlanRow]) {
    rows.sort_by(|a, b| {
        a.action
            .rank()
            .cmp(&b.action.rank())
            .then_with(|| a.ticker.cmp(&b.ticker))
    });
}
