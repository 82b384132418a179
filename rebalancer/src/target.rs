//! Target allocation (target.json) loading and validation.

use std::path::Path;

use chrono::{DateTime, Utc};
use goalbook::{PortfolioSnapshot, TargetSet};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, read_file};
use crate::portfolio::normalize_ticker;

/// A goal allocation as saved by the user.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetFile {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub targets: Vec<TargetEntry>,
}

/// A single goal: ticker + percent of the portfolio.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetEntry {
    pub ticker: String,
    pub pct: f64,
    /// Currency used to pick the ticker suffix; defaults to the portfolio's
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl TargetFile {
    /// Load and validate a target.json file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&read_file(path)?)
    }

    /// Parse from a JSON string (useful for testing).
    pub fn from_json(json: &str) -> Result<Self> {
        let file: TargetFile = serde_json::from_str(json)?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(Error::Target("targets list is empty".into()));
        }

        let mut seen = std::collections::HashSet::new();
        for t in &self.targets {
            if t.ticker.trim().is_empty() {
                return Err(Error::Target("empty ticker".into()));
            }
            if !seen.insert(t.ticker.trim()) {
                return Err(Error::Target(format!("duplicate ticker: {}", t.ticker)));
            }
            if !t.pct.is_finite() || !(0.0..=100.0).contains(&t.pct) {
                return Err(Error::Target(format!(
                    "pct for {} must be within [0, 100], got {}",
                    t.ticker, t.pct
                )));
            }
        }
        Ok(())
    }

    /// Raw target weights keyed by normalized ticker.
    ///
    /// Fails if two entries collapse to the same ticker once suffixed.
    pub fn to_target_set(
        &self,
        base_currency: &str,
        suffixes: &FxHashMap<String, String>,
    ) -> Result<TargetSet> {
        let mut set = TargetSet::new();
        for t in &self.targets {
            let currency = t.currency.as_deref().unwrap_or(base_currency);
            let ticker = normalize_ticker(&t.ticker, currency, suffixes);
            if set.get(ticker.as_str()).is_some() {
                return Err(Error::Target(format!("duplicate ticker: {ticker}")));
            }
            set.set(ticker, t.pct);
        }
        Ok(set)
    }

    /// Sum of the entered percentages.
    pub fn pct_sum(&self) -> f64 {
        self.targets.iter().map(|t| t.pct).sum()
    }
}

/// Targets equal to the current participation of each priced position.
///
/// Used when no target file is given: the plan then only moves the
/// contribution, keeping today's mix.
pub fn current_targets(snapshot: &PortfolioSnapshot) -> TargetSet {
    snapshot.current_participation().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use goalbook::Position;

    fn suffixes() -> FxHashMap<String, String> {
        let mut s = FxHashMap::default();
        s.insert("BRL".to_string(), ".SA".to_string());
        s
    }

    fn valid_json() -> &'static str {
        r#"{
            "timestamp": "2026-10-01T12:00:00Z",
            "targets": [
                { "ticker": "PETR4", "pct": 40 },
                { "ticker": "ITUB4.SA", "pct": 35 },
                { "ticker": "AAPL", "pct": 25, "currency": "USD" }
            ]
        }"#
    }

    #[test]
    fn parse_valid_target() {
        let file = TargetFile::from_json(valid_json()).unwrap();
        assert_eq!(file.targets.len(), 3);
        assert_eq!(file.targets[0].ticker, "PETR4");
        assert_eq!(file.targets[0].pct, 40.0);
        assert_eq!(file.targets[2].currency.as_deref(), Some("USD"));
        assert!(file.timestamp.is_some());
        assert_eq!(file.pct_sum(), 100.0);
    }

    #[test]
    fn timestamp_is_optional() {
        let file = TargetFile::from_json(r#"{"targets":[{"ticker":"A","pct":10}]}"#).unwrap();
        assert!(file.timestamp.is_none());
    }

    #[test]
    fn target_set_uses_suffixes() {
        let file = TargetFile::from_json(valid_json()).unwrap();
        let set = file.to_target_set("BRL", &suffixes()).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.get("PETR4.SA"), Some(40.0));
        assert_eq!(set.get("ITUB4.SA"), Some(35.0));
        assert_eq!(set.get("AAPL"), Some(25.0));
    }

    #[test]
    fn reject_empty_targets() {
        assert!(TargetFile::from_json(r#"{"targets":[]}"#).is_err());
    }

    #[test]
    fn reject_duplicate_tickers() {
        let json = r#"{"targets":[{"ticker":"A","pct":50},{"ticker":"A","pct":30}]}"#;
        assert!(matches!(TargetFile::from_json(json), Err(Error::Target(_))));
    }

    #[test]
    fn reject_duplicates_after_suffix() {
        let json = r#"{"targets":[{"ticker":"PETR4","pct":50},{"ticker":"PETR4.SA","pct":30}]}"#;
        let file = TargetFile::from_json(json).unwrap();
        assert!(file.to_target_set("BRL", &suffixes()).is_err());
    }

    #[test]
    fn reject_pct_out_of_range() {
        let over = r#"{"targets":[{"ticker":"A","pct":150}]}"#;
        let under = r#"{"targets":[{"ticker":"A","pct":-5}]}"#;
        assert!(TargetFile::from_json(over).is_err());
        assert!(TargetFile::from_json(under).is_err());
    }

    #[test]
    fn zero_pct_is_allowed() {
        let json = r#"{"targets":[{"ticker":"A","pct":0},{"ticker":"B","pct":100}]}"#;
        assert!(TargetFile::from_json(json).is_ok());
    }

    #[test]
    fn defaults_to_current_participation() {
        let snapshot = PortfolioSnapshot::new(vec![
            Position::new("A.SA", 30.0, 10.0, Some(10.0)),
            Position::new("B.SA", 70.0, 10.0, Some(10.0)),
            Position::new("C.SA", 5.0, 10.0, None),
        ]);
        let set = current_targets(&snapshot);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("A.SA"), Some(30.0));
        assert_eq!(set.get("B.SA"), Some(70.0));
        assert_eq!(set.get("C.SA"), None);
    }
}
