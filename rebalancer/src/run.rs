//! Command orchestration: load → snapshot → targets → plan → report.
//!
//! This is the main workflow that ties together all components.

use std::path::{Path, PathBuf};

use goalbook::portfolio::{PortfolioOverview, sweep_contributions};
use goalbook::{NormalizedTargets, PortfolioSnapshot, RebalancePlan, TargetSet, normalize};
use log::{info, warn};

use crate::audit::{self, AuditLog};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::interactive;
use crate::portfolio::PortfolioFile;
use crate::prices::{PriceFile, build_snapshot};
use crate::report::{HoldingsReport, PlanReport, SweepReport};
use crate::target::{TargetFile, current_targets};

/// Options for the `plan` command.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    pub target: Option<PathBuf>,
    /// Overrides `[rebalance] contribution` from the config
    pub contribution: Option<f64>,
    pub interactive: bool,
    pub json: bool,
}

/// Portfolio file and priced snapshot loaded from the config's data files.
pub struct Session {
    pub file: PortfolioFile,
    pub snapshot: PortfolioSnapshot,
}

impl Session {
    pub fn load(config: &Config) -> Result<Self> {
        let file = PortfolioFile::load(&config.portfolio.file)?;
        let prices = PriceFile::load(&config.prices.file)?;
        info!(
            "Loaded {} assets from {} and {} quotes from {}",
            file.assets.len(),
            config.portfolio.file.display(),
            prices.len(),
            config.prices.file.display(),
        );
        let snapshot = build_snapshot(&file, &prices, &config.market.suffixes)?;
        Ok(Self { file, snapshot })
    }

    /// Raw targets from `path`, or today's participation when absent.
    pub fn targets(&self, config: &Config, path: Option<&Path>) -> Result<TargetSet> {
        let set = match path {
            Some(path) => TargetFile::load(path)?
                .to_target_set(&self.file.portfolio.base_currency, &config.market.suffixes)?,
            None => {
                info!("No target file given; using current participation");
                current_targets(&self.snapshot)
            }
        };
        for (ticker, _) in set.iter() {
            if self.snapshot.position(ticker.as_str()).is_none() {
                warn!("target {ticker} is not held; its share stays unallocated");
            }
        }
        Ok(set)
    }
}

/// Show the holdings overview.
pub fn show_holdings(config: &Config) -> Result<()> {
    let session = Session::load(config)?;
    let overview = PortfolioOverview::from_snapshot(&session.snapshot);
    print!(
        "{}",
        HoldingsReport {
            name: &session.file.portfolio.name,
            currency: &session.file.portfolio.base_currency,
            overview: &overview,
        }
    );
    Ok(())
}

/// Compute and print one rebalance plan.
pub fn run_plan(config: &Config, opts: &PlanOptions) -> Result<RebalancePlan> {
    let mut audit = AuditLog::open(&config.audit_path())?;
    let target_file = opts.target.as_ref().map(|p| p.display().to_string());
    audit::log_run_started(&mut audit, "plan", target_file.as_deref())?;

    let result = plan_inner(config, opts, &mut audit);
    finish(&mut audit, &result, |plan| (1, plan.order_count()))?;
    result
}

fn plan_inner(config: &Config, opts: &PlanOptions, audit: &mut AuditLog) -> Result<RebalancePlan> {
    let session = Session::load(config)?;
    audit::log_snapshot(audit, &session.snapshot)?;

    let mut raw = session.targets(config, opts.target.as_deref())?;
    let mut contribution = opts.contribution.unwrap_or(config.rebalance.contribution);
    if opts.interactive {
        raw = interactive::prompt_targets(&session.snapshot, &raw)?;
        contribution = interactive::prompt_contribution(contribution)?;
    }
    if !contribution.is_finite() {
        return Err(Error::Config(format!("contribution must be finite, got {contribution}")));
    }

    let targets = normalize(&raw)?;
    audit::log_targets(audit, &targets)?;

    let plan = goalbook::rebalance(&session.snapshot, &targets, contribution)?;
    audit::log_plan(audit, &plan)?;
    info!(
        "Plan computed: {} orders, {:.2} cash remainder",
        plan.order_count(),
        plan.summary.cash_remainder
    );

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!(
            "{}",
            PlanReport {
                plan: &plan,
                targets: &targets,
                notice_tolerance_pct: config.rebalance.notice_tolerance_pct,
            }
        );
    }
    Ok(plan)
}

/// Evaluate several hypothetical contributions against the same targets.
pub fn run_sweep(
    config: &Config,
    contributions: &[f64],
    target: Option<&Path>,
) -> Result<Vec<(f64, goalbook::Result<RebalancePlan>)>> {
    let mut audit = AuditLog::open(&config.audit_path())?;
    let target_file = target.map(|p| p.display().to_string());
    audit::log_run_started(&mut audit, "sweep", target_file.as_deref())?;

    let result = sweep_inner(config, contributions, target, &mut audit);
    finish(&mut audit, &result, |entries| {
        let orders = entries
            .iter()
            .filter_map(|(_, r)| r.as_ref().ok())
            .map(RebalancePlan::order_count)
            .sum();
        (entries.len(), orders)
    })?;
    result
}

fn sweep_inner(
    config: &Config,
    contributions: &[f64],
    target: Option<&Path>,
    audit: &mut AuditLog,
) -> Result<Vec<(f64, goalbook::Result<RebalancePlan>)>> {
    if contributions.is_empty() {
        return Err(Error::Config("at least one contribution is required".into()));
    }
    if let Some(bad) = contributions.iter().find(|c| !c.is_finite()) {
        return Err(Error::Config(format!("contribution must be finite, got {bad}")));
    }

    let session = Session::load(config)?;
    audit::log_snapshot(audit, &session.snapshot)?;

    let targets: NormalizedTargets = normalize(&session.targets(config, target)?)?;
    audit::log_targets(audit, &targets)?;

    let plans = sweep_contributions(&session.snapshot, &targets, contributions);
    let entries: Vec<_> = contributions.iter().copied().zip(plans).collect();
    print!("{}", SweepReport { entries: &entries });
    Ok(entries)
}

/// Close a run in the audit trail with either `run_completed` or `run_failed`.
fn finish<T>(
    audit: &mut AuditLog,
    result: &Result<T>,
    counts: impl FnOnce(&T) -> (usize, usize),
) -> Result<()> {
    match result {
        Ok(value) => {
            let (plans, orders) = counts(value);
            audit::log_run_completed(audit, plans, orders)
        }
        Err(e) => audit::log_run_failed(audit, &e.to_string()),
    }
}
