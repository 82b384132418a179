//! Errors that halt a rebalance computation.

/// Precondition violations raised by the normalizer and the engine.
///
/// None of these are transient: the same inputs always produce the same
/// error, so callers should surface them and stop rather than retry.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RebalanceError {
    /// Raw target weights do not sum to a positive, finite number.
    #[error("target weights must sum to more than 0% (got {raw_sum})")]
    InvalidTarget { raw_sum: f64 },

    /// Every position lacks a usable price.
    #[error("no position has a known price to rebalance against")]
    NoInvestablePositions,

    /// Current value plus contribution leaves nothing to allocate.
    #[error("total after contribution must be positive (got {investable_total:.2})")]
    NonPositiveTotal { investable_total: f64 },
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, RebalanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            RebalanceError::InvalidTarget { raw_sum: 0.0 }.to_string(),
            "target weights must sum to more than 0% (got 0)"
        );
        assert_eq!(
            RebalanceError::NonPositiveTotal {
                investable_total: -1000.0
            }
            .to_string(),
            "total after contribution must be positive (got -1000.00)"
        );
        assert!(
            RebalanceError::NoInvestablePositions
                .to_string()
                .contains("known price")
        );
    }

    #[test]
    fn is_error() {
        let err: Box<dyn std::error::Error> = Box::new(RebalanceError::NoInvestablePositions);
        assert!(err.to_string().contains("price"));
    }
}
