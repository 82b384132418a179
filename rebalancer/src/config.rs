//! TOML configuration loading and validation.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub portfolio: PortfolioConfig,
    pub prices: PricesConfig,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub rebalance: RebalanceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioConfig {
    /// Path to the portfolio JSON
    pub file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricesConfig {
    /// Path to the price snapshot JSON
    pub file: PathBuf,
}

/// Ticker suffixes appended per asset currency (e.g. `BRL = ".SA"`).
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    #[serde(default = "default_suffixes")]
    pub suffixes: FxHashMap<String, String>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            suffixes: default_suffixes(),
        }
    }
}

fn default_suffixes() -> FxHashMap<String, String> {
    let mut suffixes = FxHashMap::default();
    suffixes.insert("BRL".to_string(), ".SA".to_string());
    suffixes
}

#[derive(Debug, Clone, Deserialize)]
pub struct RebalanceConfig {
    /// Default contribution when none is given on the command line
    #[serde(default)]
    pub contribution: f64,
    #[serde(default = "default_notice_tolerance")]
    pub notice_tolerance_pct: f64,
}

impl Default for RebalanceConfig {
    fn default() -> Self {
        Self {
            contribution: 0.0,
            notice_tolerance_pct: default_notice_tolerance(),
        }
    }
}

fn default_notice_tolerance() -> f64 {
    goalbook::DEFAULT_NOTICE_TOLERANCE_PCT
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            audit_file: default_audit_file(),
        }
    }
}

fn default_log_dir() -> String {
    "./logs".into()
}
fn default_audit_file() -> String {
    "audit.jsonl".into()
}

impl Config {
    /// Load config from a TOML file.
    ///
    /// Relative data paths are resolved against the config file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config = Self::from_toml(&contents)?;
        if let Some(base) = path.parent() {
            config.portfolio.file = base.join(&config.portfolio.file);
            config.prices.file = base.join(&config.prices.file);
        }
        Ok(config)
    }

    /// Parse and validate from a TOML string.
    pub fn from_toml(toml: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        if self.portfolio.file.as_os_str().is_empty() {
            return Err(Error::Config("portfolio.file must not be empty".into()));
        }
        if self.prices.file.as_os_str().is_empty() {
            return Err(Error::Config("prices.file must not be empty".into()));
        }
        if !self.rebalance.contribution.is_finite() {
            return Err(Error::Config("rebalance.contribution must be finite".into()));
        }
        let tol = self.rebalance.notice_tolerance_pct;
        if !tol.is_finite() || tol < 0.0 {
            return Err(Error::Config(format!(
                "notice_tolerance_pct must be >= 0 and finite, got {tol}"
            )));
        }
        for (currency, suffix) in &self.market.suffixes {
            if currency.is_empty() || suffix.is_empty() {
                return Err(Error::Config(
                    "market.suffixes entries must be non-empty".into(),
                ));
            }
        }
        Ok(())
    }

    /// Full path to the audit log file.
    pub fn audit_path(&self) -> PathBuf {
        Path::new(&self.logging.dir).join(&self.logging.audit_file)
    }
}
