//! Portfolio file (portfolio.json) loading, validation and ticker normalization.

use std::collections::HashSet;
use std::path::Path;

use goalbook::Ticker;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::{Error, Result, read_file};

/// A portfolio composition as stored on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioFile {
    pub portfolio: PortfolioInfo,
    pub assets: Vec<AssetEntry>,
}

/// Descriptive header shown alongside reports.
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioInfo {
    pub name: String,
    pub base_currency: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// One asset line: what is held and at what average cost.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetEntry {
    pub ticker: String,
    pub quantity: f64,
    pub avg_price: f64,
    pub currency: String,
    #[serde(default)]
    pub sector: Option<String>,
}

/// Append the market suffix configured for `currency`, unless already present.
///
/// `normalize_ticker("PETR4", "BRL", ..)` with `BRL = ".SA"` gives `PETR4.SA`.
pub fn normalize_ticker(
    ticker: &str,
    currency: &str,
    suffixes: &FxHashMap<String, String>,
) -> Ticker {
    let ticker = ticker.trim();
    match suffixes.get(currency) {
        Some(suffix) if !ticker.ends_with(suffix.as_str()) => Ticker::new(format!("{ticker}{suffix}")),
        _ => Ticker::new(ticker),
    }
}

impl PortfolioFile {
    /// Load and validate a portfolio file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&read_file(path)?)
    }

    /// Parse from a JSON string (useful for testing).
    pub fn from_json(json: &str) -> Result<Self> {
        let file: PortfolioFile = serde_json::from_str(json)?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> Result<()> {
        if self.assets.is_empty() {
            return Err(Error::Portfolio("assets list is empty".into()));
        }

        for a in &self.assets {
            if a.ticker.trim().is_empty() {
                return Err(Error::Portfolio("empty ticker".into()));
            }
            if !a.quantity.is_finite() || a.quantity < 0.0 {
                return Err(Error::Portfolio(format!(
                    "quantity for {} must be >= 0, got {}",
                    a.ticker, a.quantity
                )));
            }
            if !a.avg_price.is_finite() || a.avg_price < 0.0 {
                return Err(Error::Portfolio(format!(
                    "avg_price for {} must be >= 0, got {}",
                    a.ticker, a.avg_price
                )));
            }
        }
        Ok(())
    }

    /// Assets paired with their normalized tickers.
    ///
    /// Fails if two entries collapse to the same ticker after normalization
    /// (e.g. `PETR4` and `PETR4.SA`, both in BRL).
    pub fn normalized_assets(
        &self,
        suffixes: &FxHashMap<String, String>,
    ) -> Result<Vec<(Ticker, &AssetEntry)>> {
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(self.assets.len());
        for asset in &self.assets {
            let ticker = normalize_ticker(&asset.ticker, &asset.currency, suffixes);
            if !seen.insert(ticker.clone()) {
                return Err(Error::Portfolio(format!("duplicate ticker: {ticker}")));
            }
            out.push((ticker, asset));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffixes() -> FxHashMap<String, String> {
        let mut s = FxHashMap::default();
        s.insert("BRL".to_string(), ".SA".to_string());
        s
    }

    fn valid_json() -> &'static str {
        r#"{
            "portfolio": { "name": "Long term", "base_currency": "BRL", "updated_at": "2026-10-01" },
            "assets": [
                { "ticker": "PETR4", "quantity": 100, "avg_price": 30.5, "currency": "BRL", "sector": "Energy" },
                { "ticker": "ITUB4.SA", "quantity": 200, "avg_price": 25.0, "currency": "BRL", "sector": "Banks" },
                { "ticker": "AAPL", "quantity": 3, "avg_price": 150.0, "currency": "USD" }
            ]
        }"#
    }

    #[test]
    fn parse_valid_portfolio() {
        let file = PortfolioFile::from_json(valid_json()).unwrap();
        assert_eq!(file.portfolio.name, "Long term");
        assert_eq!(file.assets.len(), 3);
        assert_eq!(file.assets[0].sector.as_deref(), Some("Energy"));
        assert_eq!(file.assets[2].sector, None);
    }

    #[test]
    fn ticker_suffix_applied_once() {
        assert_eq!(normalize_ticker("PETR4", "BRL", &suffixes()).as_str(), "PETR4.SA");
        assert_eq!(normalize_ticker("PETR4.SA", "BRL", &suffixes()).as_str(), "PETR4.SA");
        assert_eq!(normalize_ticker(" AAPL ", "USD", &suffixes()).as_str(), "AAPL");
    }

    #[test]
    fn normalized_assets_in_file_order() {
        let file = PortfolioFile::from_json(valid_json()).unwrap();
        let assets = file.normalized_assets(&suffixes()).unwrap();
        let tickers: Vec<&str> = assets.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(tickers, vec!["PETR4.SA", "ITUB4.SA", "AAPL"]);
    }

    #[test]
    fn reject_duplicates_after_normalization() {
        let json = r#"{
            "portfolio": { "name": "x", "base_currency": "BRL" },
            "assets": [
                { "ticker": "PETR4", "quantity": 1, "avg_price": 1, "currency": "BRL" },
                { "ticker": "PETR4.SA", "quantity": 1, "avg_price": 1, "currency": "BRL" }
            ]
        }"#;
        let file = PortfolioFile::from_json(json).unwrap();
        assert!(matches!(file.normalized_assets(&suffixes()), Err(Error::Portfolio(_))));
    }

    #[test]
    fn reject_empty_assets() {
        let json = r#"{ "portfolio": { "name": "x", "base_currency": "BRL" }, "assets": [] }"#;
        assert!(PortfolioFile::from_json(json).is_err());
    }

    #[test]
    fn reject_negative_quantity() {
        let json = r#"{
            "portfolio": { "name": "x", "base_currency": "BRL" },
            "assets": [ { "ticker": "A", "quantity": -1, "avg_price": 1, "currency": "BRL" } ]
        }"#;
        assert!(matches!(PortfolioFile::from_json(json), Err(Error::Portfolio(_))));
    }

    #[test]
    fn reject_malformed_json() {
        assert!(matches!(PortfolioFile::from_json("{"), Err(Error::Json(_))));
    }
}
