//! Edge-case tests: adversarial inputs to every public API.

use goalbook::portfolio::PortfolioOverview;
use goalbook::{
    Action, PortfolioSnapshot, Position, RebalanceError, TargetSet, normalize, rebalance,
};

fn targets(pairs: &[(&str, f64)]) -> TargetSet {
    pairs.iter().copied().collect()
}

// ============================================================================
// Empty inputs
// ============================================================================

#[test]
fn empty_snapshot_with_cash() {
    let t = normalize(&targets(&[("A", 100.0)])).unwrap();
    let err = rebalance(&PortfolioSnapshot::default(), &t, 100.0).unwrap_err();
    assert_eq!(err, RebalanceError::NoInvestablePositions);
}

#[test]
fn empty_snapshot_without_cash() {
    let t = normalize(&targets(&[("A", 100.0)])).unwrap();
    let err = rebalance(&PortfolioSnapshot::default(), &t, 0.0).unwrap_err();
    assert!(matches!(err, RebalanceError::NonPositiveTotal { .. }));
}

#[test]
fn empty_target_set() {
    let err = normalize(&TargetSet::new()).unwrap_err();
    assert_eq!(err, RebalanceError::InvalidTarget { raw_sum: 0.0 });
}

#[test]
fn empty_snapshot_overview() {
    let overview = PortfolioOverview::from_snapshot(&PortfolioSnapshot::default());
    assert_eq!(overview.total_current, 0.0);
    assert_eq!(overview.return_pct, 0.0);
    assert!(overview.holdings.is_empty());
    assert!(overview.sectors.is_empty());
}

// ============================================================================
// Degenerate targets
// ============================================================================

#[test]
fn all_zero_targets() {
    let err = normalize(&targets(&[("A", 0.0), ("B", 0.0)])).unwrap_err();
    assert!(matches!(err, RebalanceError::InvalidTarget { .. }));
}

#[test]
fn negative_target_sum() {
    assert!(normalize(&targets(&[("A", -10.0)])).is_err());
}

#[test]
fn infinite_target() {
    assert!(normalize(&targets(&[("A", f64::INFINITY), ("B", 10.0)])).is_err());
}

#[test]
fn nan_target() {
    assert!(normalize(&targets(&[("A", f64::NAN)])).is_err());
}

#[test]
fn thirds_within_tolerance() {
    let t = normalize(&targets(&[("A", 33.333), ("B", 33.333), ("C", 33.334)])).unwrap();
    assert!(!t.needs_notice(0.01));
}

#[test]
fn tickers_are_case_sensitive() {
    let snapshot = PortfolioSnapshot::new(vec![Position::new("A", 10.0, 10.0, Some(10.0))]);
    let t = normalize(&targets(&[("a", 100.0)])).unwrap();
    let plan = rebalance(&snapshot, &t, 0.0).unwrap();

    let row = plan.row("A").unwrap();
    assert_eq!(row.target_weight, 0.0);
    assert_eq!(row.action, Action::Sell);
}

// ============================================================================
// Unusable prices
// ============================================================================

#[test]
fn infinite_price_is_unpriced() {
    let snapshot = PortfolioSnapshot::new(vec![
        Position::new("A", 10.0, 10.0, Some(10.0)),
        Position::new("B", 10.0, 10.0, Some(f64::INFINITY)),
    ]);
    assert_eq!(snapshot.total_value(), 100.0);
    assert_eq!(snapshot.unpriced_tickers().len(), 1);

    let t = normalize(&targets(&[("A", 50.0), ("B", 50.0)])).unwrap();
    let plan = rebalance(&snapshot, &t, 0.0).unwrap();
    assert!(plan.row("B").is_none());
}

#[test]
fn nan_price_is_unpriced() {
    let snapshot = PortfolioSnapshot::new(vec![
        Position::new("A", 10.0, 10.0, Some(10.0)),
        Position::new("B", 10.0, 10.0, Some(f64::NAN)),
    ]);
    assert_eq!(snapshot.total_value(), 100.0);
    assert_eq!(snapshot.priced().count(), 1);
}

// ============================================================================
// Quantities and totals
// ============================================================================

#[test]
fn zero_quantity_position_is_bought() {
    let snapshot = PortfolioSnapshot::new(vec![Position::new("A", 0.0, 0.0, Some(10.0))]);
    let t = normalize(&targets(&[("A", 100.0)])).unwrap();
    let plan = rebalance(&snapshot, &t, 100.0).unwrap();

    let row = plan.row("A").unwrap();
    assert_eq!(row.quantity_delta, 10);
    assert_eq!(row.post_value, 100.0);
    assert_eq!(plan.summary.cash_remainder, 0.0);
}

#[test]
fn fractional_holding_on_target_holds() {
    let snapshot = PortfolioSnapshot::new(vec![Position::new("A", 2.5, 10.0, Some(10.0))]);
    let t = normalize(&targets(&[("A", 100.0)])).unwrap();
    let plan = rebalance(&snapshot, &t, 0.0).unwrap();

    let row = plan.row("A").unwrap();
    assert_eq!(row.action, Action::Hold);
    assert_eq!(row.post_quantity, 2.5);
}

#[test]
fn withdrawal_of_everything() {
    let snapshot = PortfolioSnapshot::new(vec![Position::new("A", 10.0, 10.0, Some(10.0))]);
    let t = normalize(&targets(&[("A", 100.0)])).unwrap();
    let err = rebalance(&snapshot, &t, -100.0).unwrap_err();
    assert!(matches!(err, RebalanceError::NonPositiveTotal { .. }));
}

#[test]
fn zero_avg_cost_has_zero_return() {
    let snapshot = PortfolioSnapshot::new(vec![Position::new("A", 10.0, 0.0, Some(10.0))]);
    let overview = PortfolioOverview::from_snapshot(&snapshot);
    assert_eq!(overview.holdings[0].return_pct, 0.0);
    assert_eq!(overview.return_pct, 0.0);
    assert_eq!(overview.profit_loss, 100.0);
}
