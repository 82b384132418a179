//! Error types for the rebalancer.

use std::path::PathBuf;

/// All errors that can occur during a rebalancer run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("portfolio file error: {0}")]
    Portfolio(String),

    #[error("target file error: {0}")]
    Target(String),

    #[error("price file error: {0}")]
    Prices(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot rebalance: {0}")]
    Rebalance(#[from] goalbook::RebalanceError),

    #[error("input aborted: {0}")]
    Aborted(String),

    #[error("audit log error: {0}")]
    Audit(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Read a whole file, tagging failures with the path.
pub(crate) fn read_file(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })
}
