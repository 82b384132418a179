//! Price sources and snapshot assembly.
//!
//! The core never fetches prices. A [`PriceSource`] supplies a quote (or
//! nothing) per ticker, and [`build_snapshot`] joins those quotes with the
//! portfolio file into a `PortfolioSnapshot`.

use std::path::Path;

use goalbook::{PortfolioSnapshot, Position, Ticker, round2};
use log::{debug, warn};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result, read_file};
use crate::portfolio::PortfolioFile;

/// Minimal quote API needed to build a snapshot.
pub trait PriceSource {
    /// Last price for `ticker`, or `None` when no usable quote exists.
    fn quote(&self, ticker: &Ticker) -> Option<f64>;
}

/// In-memory quotes, typically loaded from a price snapshot JSON file:
///
/// ```json
/// { "PETR4.SA": 36.12, "ITUB4.SA": 30.4, "DELISTED3.SA": null }
/// ```
///
/// Quotes are rounded to cents on load. Null, negative or non-finite quotes
/// are treated as unavailable.
#[derive(Debug, Clone, Default)]
pub struct PriceFile {
    quotes: FxHashMap<Ticker, f64>,
}

impl PriceFile {
    /// Load a price snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&read_file(path)?)
    }

    /// Parse from a JSON string (useful for testing).
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: FxHashMap<String, Option<f64>> = serde_json::from_str(json)
            .map_err(|e| Error::Prices(format!("expected {{ ticker: price }} object: {e}")))?;
        Ok(raw.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl<T: Into<Ticker>> FromIterator<(T, Option<f64>)> for PriceFile {
    fn from_iter<I: IntoIterator<Item = (T, Option<f64>)>>(iter: I) -> Self {
        let quotes = iter
            .into_iter()
            .filter_map(|(ticker, price)| {
                let ticker = ticker.into();
                match price {
                    Some(p) if p.is_finite() && p >= 0.0 => Some((ticker, round2(p))),
                    _ => {
                        debug!("discarding unusable quote for {ticker}");
                        None
                    }
                }
            })
            .collect();
        Self { quotes }
    }
}

impl PriceSource for PriceFile {
    fn quote(&self, ticker: &Ticker) -> Option<f64> {
        self.quotes.get(ticker).copied()
    }
}

/// Join the portfolio file with quotes into a snapshot.
///
/// Assets without a quote are kept with an unknown price; they show up in
/// holdings reports but not in rebalance plans.
pub fn build_snapshot(
    file: &PortfolioFile,
    prices: &dyn PriceSource,
    suffixes: &FxHashMap<String, String>,
) -> Result<PortfolioSnapshot> {
    let positions: PortfolioSnapshot = file
        .normalized_assets(suffixes)?
        .into_iter()
        .map(|(ticker, asset)| {
            let price = prices.quote(&ticker);
            if price.is_none() {
                warn!("no price for {ticker}; it will be left out of the rebalance");
            }
            Position {
                ticker,
                quantity: asset.quantity,
                avg_cost: asset.avg_price,
                price,
                sector: asset.sector.clone(),
            }
        })
        .collect();
    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffixes() -> FxHashMap<String, String> {
        let mut s = FxHashMap::default();
        s.insert("BRL".to_string(), ".SA".to_string());
        s
    }

    #[test]
    fn parse_price_file() {
        let prices =
            PriceFile::from_json(r#"{ "PETR4.SA": 36.126, "GONE3.SA": null, "BAD": -1 }"#).unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices.quote(&Ticker::new("PETR4.SA")), Some(36.13));
        assert_eq!(prices.quote(&Ticker::new("GONE3.SA")), None);
        assert_eq!(prices.quote(&Ticker::new("BAD")), None);
        assert_eq!(prices.quote(&Ticker::new("MISSING")), None);
    }

    #[test]
    fn reject_non_object() {
        assert!(matches!(PriceFile::from_json("[1, 2]"), Err(Error::Prices(_))));
    }

    #[test]
    fn snapshot_joins_quotes() {
        let file = PortfolioFile::from_json(
            r#"{
                "portfolio": { "name": "x", "base_currency": "BRL" },
                "assets": [
                    { "ticker": "PETR4", "quantity": 10, "avg_price": 30, "currency": "BRL", "sector": "Energy" },
                    { "ticker": "GONE3", "quantity": 5, "avg_price": 2, "currency": "BRL" }
                ]
            }"#,
        )
        .unwrap();
        let prices: PriceFile = [("PETR4.SA", Some(36.0))].into_iter().collect();

        let snapshot = build_snapshot(&file, &prices, &suffixes()).unwrap();
        assert_eq!(snapshot.len(), 2);
        let petr = snapshot.position("PETR4.SA").unwrap();
        assert_eq!(petr.price, Some(36.0));
        assert_eq!(petr.avg_cost, 30.0);
        assert_eq!(petr.sector.as_deref(), Some("Energy"));
        assert_eq!(snapshot.position("GONE3.SA").unwrap().price, None);
        assert_eq!(snapshot.total_value(), 360.0);
    }
}
