//! goalbook-rebalancer: goal-based rebalancing from the command line.
//!
//! Reads a portfolio file and a price snapshot, combines them into a
//! `goalbook::PortfolioSnapshot`, takes target percentages from a JSON file
//! (or the current mix, or interactive prompts) and prints whole-share
//! BUY/SELL/HOLD suggestions with an audit trail.

pub mod audit;
pub mod config;
pub mod error;
pub mod interactive;
pub mod portfolio;
pub mod prices;
pub mod report;
pub mod run;
pub mod target;
