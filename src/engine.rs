//! Goal-based rebalance engine.
//!
//! Turns a snapshot, normalized targets and a signed contribution into
//! whole-share order suggestions in a single pass. Share counts are rounded
//! conservatively by direction:
//!
//! - buys round down, so suggested purchases never cost more than the gap
//!   to target;
//! - sells round toward zero, so suggested sales never release more value
//!   than the gap to target.
//!
//! Because of that rounding the plan usually leaves a small cash remainder,
//! which is reported in the summary and folded into the post-trade total.

use crate::error::{RebalanceError, Result};
use crate::plan::{Action, PlanRow, PortfolioSummary, RebalancePlan, sort_rows};
use crate::portfolio::{PortfolioSnapshot, Position};
use crate::target::NormalizedTargets;
use crate::types::round2;

/// Compute a rebalance plan.
///
/// # Arguments
/// - `snapshot`: current holdings; positions with unknown price are left out
///   of the working set but their (absent) value does not affect the total
/// - `targets`: normalized weights; tickers not held are ignored, holdings
///   without a target get weight 0
/// - `contribution`: cash to add (positive) or withdraw (negative)
///
/// # Errors
/// - [`RebalanceError::NonPositiveTotal`] if snapshot value plus
///   contribution is not positive
/// - [`RebalanceError::NoInvestablePositions`] if no holding has a price
///
/// ```
/// use goalbook::{PortfolioSnapshot, Position, TargetSet, Action, normalize, rebalance};
///
/// let snapshot = PortfolioSnapshot::new(vec![Position::new("A", 10.0, 10.0, Some(10.0))]);
/// let targets: TargetSet = [("A", 100.0)].into_iter().collect();
///
/// let plan = rebalance(&snapshot, &normalize(&targets).unwrap(), 50.0).unwrap();
/// let row = plan.row("A").unwrap();
///
/// assert_eq!(row.quantity_delta, 5);
/// assert_eq!(row.action, Action::Buy);
/// assert_eq!(row.post_value, 150.0);
/// ```
pub fn rebalance(
    snapshot: &PortfolioSnapshot,
    targets: &NormalizedTargets,
    contribution: f64,
) -> Result<RebalancePlan> {
    let current_total = snapshot.total_value();
    let investable_total = current_total + contribution;
    if !investable_total.is_finite() || investable_total <= 0.0 {
        return Err(RebalanceError::NonPositiveTotal { investable_total });
    }

    let mut rows: Vec<PlanRow> = snapshot
        .priced()
        .map(|pos| plan_row(pos, targets, investable_total))
        .collect();
    if rows.is_empty() {
        return Err(RebalanceError::NoInvestablePositions);
    }

    let cash_consumed = round2(rows.iter().map(|r| r.order_value).sum());
    let cash_remainder = round2(contribution - cash_consumed);
    let post_total = round2(rows.iter().map(|r| r.post_value).sum::<f64>() + cash_remainder);

    for row in &mut rows {
        row.post_participation_pct = if post_total > 0.0 {
            round2(row.post_value / post_total * 100.0)
        } else {
            0.0
        };
    }
    sort_rows(&mut rows);

    Ok(RebalancePlan {
        rows,
        summary: PortfolioSummary {
            current_total,
            contribution,
            investable_total,
            cash_consumed,
            cash_remainder,
            post_total,
        },
    })
}

/// Whole shares to trade to close `value_delta` at `price`.
///
/// Buys (`value_delta >= 0`) round down; sells round toward zero. Returns 0
/// when the price is not positive or either operand is not a number.
pub fn suggest_quantity(value_delta: f64, price: f64) -> i64 {
    if !price.is_finite() || price <= 0.0 || !value_delta.is_finite() {
        return 0;
    }
    let raw = value_delta / price;
    let shares = if raw >= 0.0 { raw.floor() } else { raw.ceil() };
    shares as i64
}

/// Per-position computation; participation is filled in once the post-trade
/// total is known.
fn plan_row(pos: &Position, targets: &NormalizedTargets, investable_total: f64) -> PlanRow {
    let price = pos.known_price().unwrap_or(0.0);
    let current_value = pos.current_value().unwrap_or(0.0);
    let ticker = pos.ticker.as_str();

    let target_weight = targets.weight(ticker);
    let target_value = round2(target_weight * investable_total);
    let value_delta = round2(target_value - current_value);

    let quantity_delta = suggest_quantity(value_delta, price);
    let order_value = round2(quantity_delta as f64 * price);
    // Only the projection is clamped; the order itself may exceed holdings.
    let post_quantity = (pos.quantity + quantity_delta as f64).max(0.0);
    let post_value = round2(post_quantity * price);

    PlanRow {
        ticker: pos.ticker.clone(),
        price,
        quantity: pos.quantity,
        current_value,
        target_pct: targets.raw_weight(ticker),
        target_weight,
        target_value,
        value_delta,
        quantity_delta,
        action: Action::from_delta(quantity_delta),
        order_value,
        post_quantity,
        post_value,
        post_participation_pct: 0.0,
    }
}
