//! A single holding line.

use crate::types::{Ticker, round2};

/// One holding: quantity, cost basis, and a possibly unknown market price.
///
/// `quantity` is a real number because broker exports may carry fractional
/// units, but order suggestions are always whole shares.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Identifier, unique within a snapshot
    pub ticker: Ticker,
    /// Shares held (>= 0)
    pub quantity: f64,
    /// Average acquisition cost per share
    pub avg_cost: f64,
    /// Last known price per share; `None` when the quote is unavailable
    pub price: Option<f64>,
    /// Sector label used for grouping in reports
    #[cfg_attr(feature = "serde", serde(default))]
    pub sector: Option<String>,
}

impl Position {
    /// Create a position with no sector label.
    pub fn new(ticker: impl Into<Ticker>, quantity: f64, avg_cost: f64, price: Option<f64>) -> Self {
        Self {
            ticker: ticker.into(),
            quantity,
            avg_cost,
            price,
            sector: None,
        }
    }

    /// Builder-style sector assignment.
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Price, if known and usable as a number.
    #[inline]
    pub fn known_price(&self) -> Option<f64> {
        self.price.filter(|p| p.is_finite())
    }

    /// Market value at the current price, rounded to cents.
    ///
    /// `None` when the price is unknown.
    #[inline]
    pub fn current_value(&self) -> Option<f64> {
        self.known_price().map(|p| round2(self.quantity * p))
    }

    /// Capital put into the position (`quantity * avg_cost`), rounded to cents.
    #[inline]
    pub fn invested_value(&self) -> f64 {
        round2(self.quantity * self.avg_cost)
    }
}
