//! Core types: Ticker, currency rounding

use std::borrow::Borrow;
use std::fmt;

/// Position identifier (exchange ticker, e.g. `PETR4.SA`).
///
/// Unique within a portfolio snapshot. Ordering is plain string ordering,
/// which is the tie-break used when sorting plan rows.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Ticker(String);

impl Ticker {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Ticker {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Ticker {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for Ticker {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Round a monetary or percentage figure to 2 decimal places.
///
/// Applied at the point of computation, not only at display time, so that
/// downstream sums are reproducible. Halves round away from zero.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
