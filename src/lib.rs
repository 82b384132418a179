//! # goalbook
//!
//! Goal-based portfolio rebalancing with whole-share order suggestions.
//!
//! Given current holdings, target allocation percentages and an amount of
//! new cash to deploy (or withdraw), goalbook computes how many shares of
//! each position to buy or sell to move toward the targets, and projects the
//! portfolio after those orders.
//!
//! ## Features
//!
//! - **Target normalization**: targets need not sum to 100%, they are rescaled
//! - **Conservative rounding**: buys round down, sells round toward zero
//! - **Post-trade projection**: quantities, values, participation, leftover cash
//! - **Pure and deterministic**: no I/O, no shared state, inputs never mutated
//!
//! ## Quick Start
//!
//! ```
//! use goalbook::{Action, PortfolioSnapshot, Position, TargetSet, normalize, rebalance};
//!
//! let snapshot = PortfolioSnapshot::new(vec![
//!     Position::new("A", 10.0, 9.0, Some(10.0)),  // $100 held
//!     Position::new("B", 0.0, 0.0, Some(20.0)),   // nothing held yet
//! ]);
//!
//! // 50/50 split, no new cash
//! let targets: TargetSet = [("A", 50.0), ("B", 50.0)].into_iter().collect();
//! let normalized = normalize(&targets).unwrap();
//! let plan = rebalance(&snapshot, &normalized, 0.0).unwrap();
//!
//! // Buys are listed first
//! assert_eq!(plan.rows[0].ticker.as_str(), "B");
//! assert_eq!(plan.rows[0].action, Action::Buy);
//! assert_eq!(plan.rows[0].quantity_delta, 2);    // floor(50 / 20)
//!
//! assert_eq!(plan.rows[1].action, Action::Sell);
//! assert_eq!(plan.rows[1].quantity_delta, -5);   // ceil(-50 / 10)
//!
//! // $50 released, $40 spent: $10 stays in cash
//! assert_eq!(plan.summary.cash_remainder, 10.0);
//! assert_eq!(plan.summary.post_total, 100.0);
//! ```
//!
//! ## Rounding
//!
//! | Gap to target | Shares | Effect |
//! |---------------|--------|--------|
//! | positive | `floor(gap / price)` | never spends more than the gap |
//! | negative | `ceil(gap / price)` | never releases more than the gap |
//! | no valid price | 0 | row is HOLD |
//!
//! Money figures are rounded to 2 decimals where they are computed.
//!
//! ## Errors
//!
//! [`normalize`] and [`rebalance`] fail with a [`RebalanceError`] when the
//! computation is ill-posed: targets summing to 0, no priced position, or a
//! non-positive total after the contribution. Bad quotes on individual
//! positions do not fail the plan; those rows are simply HOLD.

mod engine;
mod error;
mod plan;
pub mod portfolio;
mod target;
mod types;

// Re-export public API
pub use engine::{rebalance, suggest_quantity};
pub use error::{RebalanceError, Result};
pub use plan::{Action, PlanRow, PortfolioSummary, REMAINDER_EPSILON, RebalancePlan};
pub use portfolio::{PortfolioSnapshot, Position};
pub use target::{DEFAULT_NOTICE_TOLERANCE_PCT, NormalizedTargets, TargetSet, normalize};
pub use types::{Ticker, round2};
