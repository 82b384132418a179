//! JSONL audit trail logging.
//!
//! Each rebalancer run appends events to an audit.jsonl file,
//! one JSON object per line.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use goalbook::{NormalizedTargets, PortfolioSnapshot, RebalancePlan};
use serde::Serialize;

use crate::error::Result;

/// An audit event written to the JSONL trail.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub event: &'static str,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// Append-only audit logger.
pub struct AuditLog {
    writer: BufWriter<std::fs::File>,
}

impl AuditLog {
    /// Open (or create) the audit log file for appending.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Log an event with arbitrary JSON data.
    pub fn log(&mut self, event: &'static str, data: serde_json::Value) -> Result<()> {
        let entry = AuditEvent {
            event,
            ts: Utc::now(),
            data,
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Convenience: log a run start event.
pub fn log_run_started(audit: &mut AuditLog, command: &str, target_file: Option<&str>) -> Result<()> {
    audit.log(
        "run_started",
        serde_json::json!({
            "command": command,
            "target_file": target_file,
        }),
    )
}

/// Convenience: log the holdings a run works against.
pub fn log_snapshot(audit: &mut AuditLog, snapshot: &PortfolioSnapshot) -> Result<()> {
    let positions: Vec<_> = snapshot
        .positions()
        .iter()
        .map(|p| {
            serde_json::json!({
                "ticker": p.ticker.as_str(),
                "qty": p.quantity,
                "avg_cost": p.avg_cost,
                "price": p.known_price(),
            })
        })
        .collect();

    audit.log(
        "snapshot_loaded",
        serde_json::json!({
            "positions": positions,
            "total_value": snapshot.total_value(),
        }),
    )
}

/// Convenience: log the effective targets.
pub fn log_targets(audit: &mut AuditLog, targets: &NormalizedTargets) -> Result<()> {
    let mut weights: Vec<_> = targets
        .iter()
        .map(|(ticker, weight)| (ticker.as_str(), weight))
        .collect();
    weights.sort_by(|a, b| a.0.cmp(b.0));

    audit.log(
        "targets_normalized",
        serde_json::json!({
            "raw_sum": targets.raw_sum(),
            "weights": weights
                .into_iter()
                .map(|(ticker, weight)| serde_json::json!({ "ticker": ticker, "weight": weight }))
                .collect::<Vec<_>>(),
        }),
    )
}

/// Convenience: log the computed plan.
pub fn log_plan(audit: &mut AuditLog, plan: &RebalancePlan) -> Result<()> {
    let orders: Vec<_> = plan
        .orders()
        .map(|r| {
            serde_json::json!({
                "ticker": r.ticker.as_str(),
                "action": r.action.to_string(),
                "shares": r.quantity_delta.abs(),
                "price": r.price,
                "order_value": r.order_value,
            })
        })
        .collect();

    audit.log(
        "plan_computed",
        serde_json::json!({
            "contribution": plan.summary.contribution,
            "investable_total": plan.summary.investable_total,
            "cash_consumed": plan.summary.cash_consumed,
            "cash_remainder": plan.summary.cash_remainder,
            "orders": orders,
        }),
    )
}

/// Convenience: log a run that stopped on an error.
pub fn log_run_failed(audit: &mut AuditLog, reason: &str) -> Result<()> {
    audit.log("run_failed", serde_json::json!({ "reason": reason }))
}

/// Convenience: log run completion.
pub fn log_run_completed(audit: &mut AuditLog, plans: usize, orders: usize) -> Result<()> {
    audit.log(
        "run_completed",
        serde_json::json!({
            "plans": plans,
            "orders": orders,
        }),
    )
}
