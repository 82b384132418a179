//! Parallel evaluation of hypothetical contributions.

use super::PortfolioSnapshot;
use crate::engine::rebalance;
use crate::error::Result;
use crate::plan::RebalancePlan;
use crate::target::NormalizedTargets;

/// Rebalance one snapshot against many contribution amounts in parallel.
///
/// Each computation borrows the same immutable inputs and owns its output,
/// so no coordination is needed. Results are returned in the order of
/// `contributions`; a contribution that leaves a non-positive total yields
/// its own error without affecting the others.
///
/// # Example
///
/// ```ignore
/// use goalbook::portfolio::sweep_contributions;
///
/// let plans = sweep_contributions(&snapshot, &targets, &[0.0, 500.0, 1000.0]);
/// for plan in plans.iter().flatten() {
///     println!("{:.2} left over", plan.summary.cash_remainder);
/// }
/// ```
#[cfg(feature = "parallel")]
pub fn sweep_contributions(
    snapshot: &PortfolioSnapshot,
    targets: &NormalizedTargets,
    contributions: &[f64],
) -> Vec<Result<RebalancePlan>> {
    use rayon::prelude::*;

    contributions
        .par_iter()
        .map(|&contribution| rebalance(snapshot, targets, contribution))
        .collect()
}

#[cfg(test)]
#[cfg(feature = "parallel")]
mod tests {
    use super::*;
    use crate::error::RebalanceError;
    use crate::portfolio::Position;
    use crate::target::{TargetSet, normalize};

    fn setup() -> (PortfolioSnapshot, NormalizedTargets) {
        let snapshot = PortfolioSnapshot::new(vec![
            Position::new("A", 10.0, 10.0, Some(10.0)),
            Position::new("B", 0.0, 0.0, Some(20.0)),
        ]);
        let targets: TargetSet = [("A", 50.0), ("B", 50.0)].into_iter().collect();
        (snapshot, normalize(&targets).unwrap())
    }

    #[test]
    fn sweep_preserves_order() {
        let (snapshot, targets) = setup();
        let results = sweep_contributions(&snapshot, &targets, &[0.0, 100.0, 300.0]);
        assert_eq!(results.len(), 3);

        let investable: Vec<f64> = results
            .iter()
            .map(|r| r.as_ref().unwrap().summary.investable_total)
            .collect();
        assert_eq!(investable, vec![100.0, 200.0, 400.0]);
    }

    #[test]
    fn sweep_isolates_failures() {
        let (snapshot, targets) = setup();
        let results = sweep_contributions(&snapshot, &targets, &[-500.0, 100.0]);
        assert!(matches!(
            results[0],
            Err(RebalanceError::NonPositiveTotal { .. })
        ));
        assert!(results[1].is_ok());
    }

    #[test]
    fn sweep_empty() {
        let (snapshot, targets) = setup();
        assert!(sweep_contributions(&snapshot, &targets, &[]).is_empty());
    }
}
