//! Portfolio snapshots: the holdings a rebalance is computed against.
//!
//! A [`PortfolioSnapshot`] is a flat, immutable list of [`Position`]s as
//! supplied by a loader and a price source. Positions with an unknown price
//! stay in the snapshot (they are still holdings) but contribute nothing to
//! [`PortfolioSnapshot::total_value`] and are left out of the rebalance
//! working set.
//!
//! # Example
//!
//! ```
//! use goalbook::portfolio::{Position, PortfolioSnapshot};
//!
//! let snapshot = PortfolioSnapshot::new(vec![
//!     Position::new("AAPL", 10.0, 9.0, Some(10.0)),
//!     Position::new("MSFT", 5.0, 20.0, None),
//! ]);
//!
//! assert_eq!(snapshot.total_value(), 100.0);
//! assert_eq!(snapshot.priced().count(), 1);
//! ```

pub mod analysis;
pub mod position;
#[cfg(feature = "parallel")]
pub mod sweep;

pub use analysis::{HoldingRow, PortfolioOverview, SectorRow, UNCLASSIFIED_SECTOR};
pub use position::Position;
#[cfg(feature = "parallel")]
pub use sweep::sweep_contributions;

use crate::types::{Ticker, round2};

/// The set of holdings at one point in time.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioSnapshot {
    positions: Vec<Position>,
}

impl PortfolioSnapshot {
    pub fn new(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    /// All positions, in the order they were supplied.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Look up a position by ticker.
    pub fn position(&self, ticker: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.ticker.as_str() == ticker)
    }

    /// Positions with a usable price (the rebalance working set).
    pub fn priced(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter().filter(|p| p.known_price().is_some())
    }

    /// Tickers whose price is unknown.
    pub fn unpriced_tickers(&self) -> Vec<&Ticker> {
        self.positions
            .iter()
            .filter(|p| p.known_price().is_none())
            .map(|p| &p.ticker)
            .collect()
    }

    /// Total market value of the snapshot.
    ///
    /// Sums every position whose value is known. Unknown-price positions are
    /// counted as holdings but add nothing. This is the total used both for
    /// headline figures and as the base of the investable total.
    pub fn total_value(&self) -> f64 {
        round2(self.positions.iter().filter_map(Position::current_value).sum())
    }

    /// Total capital invested at average cost.
    pub fn total_invested(&self) -> f64 {
        round2(self.positions.iter().map(Position::invested_value).sum())
    }

    /// Current participation of each priced position, in percent points.
    ///
    /// Useful as a default target set: rebalancing against it with zero
    /// contribution is a no-op up to rounding.
    pub fn current_participation(&self) -> Vec<(Ticker, f64)> {
        let total = self.total_value();
        self.priced()
            .map(|p| {
                let value = p.current_value().unwrap_or(0.0);
                let pct = if total > 0.0 {
                    round2(value / total * 100.0)
                } else {
                    0.0
                };
                (p.ticker.clone(), pct)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl FromIterator<Position> for PortfolioSnapshot {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> PortfolioSnapshot {
        PortfolioSnapshot::new(vec![
            Position::new("AAPL", 10.0, 8.0, Some(10.0)),
            Position::new("MSFT", 2.0, 50.0, Some(150.0)),
            Position::new("GONE", 7.0, 3.0, None),
        ])
    }

    #[test]
    fn total_value_skips_unknown_prices() {
        assert_eq!(snapshot().total_value(), 400.0);
    }

    #[test]
    fn total_invested_includes_unknown_prices() {
        assert_eq!(snapshot().total_invested(), 80.0 + 100.0 + 21.0);
    }

    #[test]
    fn priced_working_set() {
        let snap = snapshot();
        let priced: Vec<&str> = snap.priced().map(|p| p.ticker.as_str()).collect();
        assert_eq!(priced, vec!["AAPL", "MSFT"]);
        assert_eq!(snap.unpriced_tickers(), vec![&Ticker::new("GONE")]);
        assert_eq!(snap.len(), 3);
    }

    #[test]
    fn participation_of_priced_positions() {
        let parts = snapshot().current_participation();
        assert_eq!(
            parts,
            vec![(Ticker::new("AAPL"), 25.0), (Ticker::new("MSFT"), 75.0)]
        );
    }

    #[test]
    fn participation_with_zero_total() {
        let snap = PortfolioSnapshot::new(vec![Position::new("AAPL", 0.0, 0.0, Some(10.0))]);
        assert_eq!(snap.current_participation(), vec![(Ticker::new("AAPL"), 0.0)]);
    }

    #[test]
    fn lookup_by_ticker() {
        let snap = snapshot();
        assert_eq!(snap.position("MSFT").map(|p| p.quantity), Some(2.0));
        assert!(snap.position("NVDA").is_none());
    }
}
