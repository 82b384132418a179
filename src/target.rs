//! Target weights and their normalization.
//!
//! Users type target percentages that rarely add up to exactly 100. The
//! normalizer rescales them to fractions summing to 1.0 and reports the raw
//! sum, so a caller can tell the user their targets were adjusted.

use rustc_hash::FxHashMap;

use crate::error::{RebalanceError, Result};
use crate::types::Ticker;

/// Tolerance, in percent points, above which a raw target sum that differs
/// from 100 is worth an informational notice.
pub const DEFAULT_NOTICE_TOLERANCE_PCT: f64 = 0.01;

/// Raw target weights keyed by ticker (typically percent points).
///
/// Not required to sum to 100; see [`normalize`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetSet {
    weights: FxHashMap<Ticker, f64>,
}

impl TargetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw weight for a ticker, replacing any previous value.
    pub fn set(&mut self, ticker: impl Into<Ticker>, weight: f64) {
        self.weights.insert(ticker.into(), weight);
    }

    /// Raw weight for a ticker, if one was given.
    pub fn get(&self, ticker: &str) -> Option<f64> {
        self.weights.get(ticker).copied()
    }

    /// Sum of all raw weights.
    pub fn raw_sum(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ticker, f64)> {
        self.weights.iter().map(|(t, w)| (t, *w))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl<T: Into<Ticker>> FromIterator<(T, f64)> for TargetSet {
    fn from_iter<I: IntoIterator<Item = (T, f64)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().map(|(t, w)| (t.into(), w)).collect(),
        }
    }
}

/// Target weights rescaled to fractions that sum to 1.0.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalizedTargets {
    raw: FxHashMap<Ticker, f64>,
    weights: FxHashMap<Ticker, f64>,
    raw_sum: f64,
}

impl NormalizedTargets {
    /// Normalized weight in `[0, 1]`; 0 for tickers without a target.
    pub fn weight(&self, ticker: &str) -> f64 {
        self.weights.get(ticker).copied().unwrap_or(0.0)
    }

    /// The weight as originally entered; 0 for tickers without a target.
    pub fn raw_weight(&self, ticker: &str) -> f64 {
        self.raw.get(ticker).copied().unwrap_or(0.0)
    }

    /// Sum of the raw weights before rescaling.
    pub fn raw_sum(&self) -> f64 {
        self.raw_sum
    }

    /// How far the raw sum was from 100, in percent points (signed).
    pub fn deviation_pct(&self) -> f64 {
        self.raw_sum - 100.0
    }

    /// True when the raw sum missed 100 by more than `tolerance_pct`.
    pub fn needs_notice(&self, tolerance_pct: f64) -> bool {
        self.deviation_pct().abs() > tolerance_pct
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ticker, f64)> {
        self.weights.iter().map(|(t, w)| (t, *w))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Rescale raw target weights so they sum to 1.0.
///
/// Fails with [`RebalanceError::InvalidTarget`] when the raw sum is not a
/// positive finite number; dividing by it would yield meaningless weights.
///
/// ```
/// use goalbook::{TargetSet, normalize};
///
/// let targets: TargetSet = [("AAPL", 30.0), ("MSFT", 30.0)].into_iter().collect();
/// let normalized = normalize(&targets).unwrap();
///
/// assert_eq!(normalized.weight("AAPL"), 0.5);
/// assert_eq!(normalized.raw_sum(), 60.0);
/// assert!(normalized.needs_notice(0.01));
/// ```
pub fn normalize(targets: &TargetSet) -> Result<NormalizedTargets> {
    let raw_sum = targets.raw_sum();
    if !raw_sum.is_finite() || raw_sum <= 0.0 {
        return Err(RebalanceError::InvalidTarget { raw_sum });
    }

    let weights = targets
        .weights
        .iter()
        .map(|(t, w)| (t.clone(), w / raw_sum))
        .collect();

    Ok(NormalizedTargets {
        raw: targets.weights.clone(),
        weights,
        raw_sum,
    })
}
