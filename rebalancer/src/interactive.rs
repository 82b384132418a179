//! Interactive editing of targets and contribution with `dialoguer`.

use dialoguer::Input;
use goalbook::{PortfolioSnapshot, TargetSet};
use log::debug;

use crate::error::{Error, Result};

/// Prompt a target percentage for every priced position.
///
/// Each prompt defaults to the position's value in `defaults` (normally the
/// current participation). Positions without a default start at 0.
pub fn prompt_targets(snapshot: &PortfolioSnapshot, defaults: &TargetSet) -> Result<TargetSet> {
    println!("Target allocation (%). Press Enter to keep the suggested value.");
    let mut targets = TargetSet::new();
    for position in snapshot.priced() {
        let default = defaults.get(position.ticker.as_str()).unwrap_or(0.0);
        let pct: f64 = Input::new()
            .with_prompt(format!("  {}", position.ticker))
            .default(default)
            .validate_with(|v: &f64| -> std::result::Result<(), &str> {
                if v.is_finite() && (0.0..=100.0).contains(v) {
                    Ok(())
                } else {
                    Err("enter a percentage between 0 and 100")
                }
            })
            .interact_text()
            .map_err(|e| Error::Aborted(format!("target prompt failed: {e}")))?;
        debug!("target for {} set to {pct}", position.ticker);
        targets.set(position.ticker.clone(), pct);
    }
    Ok(targets)
}

/// Prompt the contribution amount (negative to withdraw).
pub fn prompt_contribution(default: f64) -> Result<f64> {
    Input::new()
        .with_prompt("Contribution (negative to withdraw)")
        .default(default)
        .validate_with(|v: &f64| -> std::result::Result<(), &str> {
            if v.is_finite() {
                Ok(())
            } else {
                Err("enter a finite amount")
            }
        })
        .interact_text()
        .map_err(|e| Error::Aborted(format!("contribution prompt failed: {e}")))
}
