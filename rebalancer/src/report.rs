//! Plain-text reports for holdings, rebalance plans and contribution sweeps.

use std::fmt;

use goalbook::portfolio::PortfolioOverview;
use goalbook::{NormalizedTargets, RebalancePlan};

/// Holdings overview: headline figures, per-position table, sector rollup.
pub struct HoldingsReport<'a> {
    pub name: &'a str,
    pub currency: &'a str,
    pub overview: &'a PortfolioOverview,
}

impl fmt::Display for HoldingsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = self.overview;
        writeln!(f, "PORTFOLIO: {} ({})", self.name, self.currency)?;
        writeln!(f, "  Invested:      {:>14.2}", o.total_invested)?;
        writeln!(f, "  Current value: {:>14.2}", o.total_current)?;
        writeln!(f, "  P/L:           {:>+14.2}  ({:+.2}%)", o.profit_loss, o.return_pct)?;

        writeln!(f, "\nHOLDINGS:")?;
        writeln!(
            f,
            "  {:10} {:>10} {:>10} {:>10} {:>12} {:>12} {:>12} {:>8} {:>7}",
            "Ticker", "Qty", "AvgCost", "Price", "Invested", "Current", "P/L", "Ret%", "Part%"
        )?;
        for h in &o.holdings {
            writeln!(
                f,
                "  {:10} {:>10} {:>10.2} {:>10} {:>12.2} {:>12} {:>12} {:>+7.2}% {:>6.2}%",
                h.ticker.as_str(),
                h.quantity,
                h.avg_cost,
                opt_money(h.price),
                h.invested_value,
                opt_money(h.current_value),
                opt_money(h.profit_loss),
                h.return_pct,
                h.participation_pct,
            )?;
        }

        writeln!(f, "\nSECTORS:")?;
        writeln!(
            f,
            "  {:20} {:>12} {:>12} {:>12} {:>7}",
            "Sector", "Invested", "Current", "P/L", "Part%"
        )?;
        for s in &o.sectors {
            writeln!(
                f,
                "  {:20} {:>12.2} {:>12.2} {:>+12.2} {:>6.2}%",
                s.sector, s.invested_value, s.current_value, s.profit_loss, s.participation_pct,
            )?;
        }
        Ok(())
    }
}

/// A rebalance plan with its KPI block and user-facing notices.
pub struct PlanReport<'a> {
    pub plan: &'a RebalancePlan,
    pub targets: &'a NormalizedTargets,
    pub notice_tolerance_pct: f64,
}

impl PlanReport<'_> {
    /// Informational notices worth showing alongside the plan.
    pub fn notices(&self) -> Vec<String> {
        let mut notices = Vec::new();
        if self.targets.needs_notice(self.notice_tolerance_pct) {
            notices.push(format!(
                "Target percentages add up to {:.2}%, not 100%; they were normalized proportionally.",
                self.targets.raw_sum()
            ));
        }
        if self.plan.has_rounding_remainder() {
            let remainder = self.plan.summary.cash_remainder;
            let what = if remainder > 0.0 { "left over" } else { "overdrawn" };
            notices.push(format!(
                "Whole-share rounding leaves {:.2} {what} from the contribution.",
                remainder.abs()
            ));
        }
        notices
    }
}

impl fmt::Display for PlanReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.plan.summary;
        writeln!(f, "SUMMARY:")?;
        writeln!(f, "  Current total:   {:>14.2}", s.current_total)?;
        writeln!(f, "  Contribution:    {:>+14.2}", s.contribution)?;
        writeln!(f, "  Investable:      {:>14.2}", s.investable_total)?;
        writeln!(f, "  Cash consumed:   {:>+14.2}", s.cash_consumed)?;
        writeln!(f, "  Cash remainder:  {:>+14.2}", s.cash_remainder)?;
        writeln!(f, "  Post-trade total:{:>14.2}", s.post_total)?;

        writeln!(f, "\nREBALANCE PLAN:")?;
        writeln!(
            f,
            "  {:10} {:>10} {:>10} {:>12} {:>7} {:>12} {:>12} {:>6} {:>8} {:>12} {:>7}",
            "Ticker",
            "Price",
            "Qty",
            "Current",
            "Target%",
            "TargetVal",
            "Delta",
            "Action",
            "Shares",
            "Order",
            "Post%"
        )?;
        for r in &self.plan.rows {
            writeln!(
                f,
                "  {:10} {:>10.2} {:>10} {:>12.2} {:>6.2}% {:>12.2} {:>+12.2} {:>6} {:>+8} {:>+12.2} {:>6.2}%",
                r.ticker.as_str(),
                r.price,
                r.quantity,
                r.current_value,
                r.target_weight * 100.0,
                r.target_value,
                r.value_delta,
                r.action.to_string(),
                r.quantity_delta,
                r.order_value,
                r.post_participation_pct,
            )?;
        }

        let notices = self.notices();
        if !notices.is_empty() {
            writeln!(f)?;
            for n in notices {
                writeln!(f, "Note: {n}")?;
            }
        }
        Ok(())
    }
}

/// One line per hypothetical contribution.
pub struct SweepReport<'a> {
    pub entries: &'a [(f64, goalbook::Result<RebalancePlan>)],
}

impl fmt::Display for SweepReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CONTRIBUTION SWEEP:")?;
        writeln!(
            f,
            "  {:>14} {:>14} {:>7} {:>14} {:>14}",
            "Contribution", "Investable", "Orders", "Consumed", "Remainder"
        )?;
        for (contribution, outcome) in self.entries {
            match outcome {
                Ok(plan) => writeln!(
                    f,
                    "  {:>+14.2} {:>14.2} {:>7} {:>+14.2} {:>+14.2}",
                    contribution,
                    plan.summary.investable_total,
                    plan.order_count(),
                    plan.summary.cash_consumed,
                    plan.summary.cash_remainder,
                )?,
                Err(e) => writeln!(f, "  {contribution:>+14.2}  {e}")?,
            }
        }
        Ok(())
    }
}

fn opt_money(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}
