//! Holdings analysis: per-position P/L and participation, sector rollups.
//!
//! All figures are rounded to cents (or hundredths of a percent) as they are
//! computed. Positions with an unknown price keep their invested value but
//! have no current value, P/L, or participation.

use std::collections::BTreeMap;

use super::{PortfolioSnapshot, Position};
use crate::types::{Ticker, round2};

/// Sector name used for positions without one.
pub const UNCLASSIFIED_SECTOR: &str = "Unclassified";

/// Portfolio-wide headline figures.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioOverview {
    pub total_invested: f64,
    pub total_current: f64,
    pub profit_loss: f64,
    /// Return on invested capital in percent; 0 when nothing was invested
    pub return_pct: f64,
    pub holdings: Vec<HoldingRow>,
    pub sectors: Vec<SectorRow>,
}

/// Per-position figures.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HoldingRow {
    pub ticker: Ticker,
    pub sector: Option<String>,
    pub quantity: f64,
    pub avg_cost: f64,
    pub price: Option<f64>,
    pub invested_value: f64,
    pub current_value: Option<f64>,
    pub profit_loss: Option<f64>,
    pub return_pct: f64,
    pub participation_pct: f64,
}

/// Per-sector rollup.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectorRow {
    pub sector: String,
    pub invested_value: f64,
    pub current_value: f64,
    pub profit_loss: f64,
    pub participation_pct: f64,
}

impl PortfolioOverview {
    /// Analyze a snapshot.
    pub fn from_snapshot(snapshot: &PortfolioSnapshot) -> Self {
        let total_invested = snapshot.total_invested();
        let total_current = snapshot.total_value();
        let profit_loss = round2(total_current - total_invested);

        let holdings = snapshot
            .positions()
            .iter()
            .map(|p| holding_row(p, total_current))
            .collect();

        Self {
            total_invested,
            total_current,
            profit_loss,
            return_pct: pct_of(profit_loss, total_invested),
            holdings,
            sectors: sector_rows(snapshot, total_current),
        }
    }
}

/// `part / whole * 100`, rounded; 0 when `whole` is not positive.
fn pct_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        round2(part / whole * 100.0)
    } else {
        0.0
    }
}

fn holding_row(pos: &Position, total_current: f64) -> HoldingRow {
    let invested_value = pos.invested_value();
    let current_value = pos.current_value();
    let profit_loss = current_value.map(|v| round2(v - invested_value));

    HoldingRow {
        ticker: pos.ticker.clone(),
        sector: pos.sector.clone(),
        quantity: pos.quantity,
        avg_cost: pos.avg_cost,
        price: pos.known_price(),
        invested_value,
        current_value,
        profit_loss,
        return_pct: profit_loss.map_or(0.0, |pl| pct_of(pl, invested_value)),
        participation_pct: current_value.map_or(0.0, |v| pct_of(v, total_current)),
    }
}

fn sector_rows(snapshot: &PortfolioSnapshot, total_current: f64) -> Vec<SectorRow> {
    // BTreeMap keeps sectors sorted by name
    let mut sums: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for pos in snapshot.positions() {
        let key = pos.sector.as_deref().unwrap_or(UNCLASSIFIED_SECTOR);
        let entry = sums.entry(key).or_insert((0.0, 0.0));
        entry.0 += pos.invested_value();
        entry.1 += pos.current_value().unwrap_or(0.0);
    }

    sums.into_iter()
        .map(|(sector, (invested, current))| {
            let invested_value = round2(invested);
            let current_value = round2(current);
            SectorRow {
                sector: sector.to_string(),
                invested_value,
                current_value,
                profit_loss: round2(current_value - invested_value),
                participation_pct: pct_of(current_value, total_current),
            }
        })
        .collect()
}
