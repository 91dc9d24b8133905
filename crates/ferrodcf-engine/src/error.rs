use serde::{Deserialize, Serialize};
use thiserror::Error;

use ferrodcf_core::LineItem;

/// Errors raised by the valuation pipeline.
///
/// `MissingData`, `InvalidAssumption` and `NonFiniteResult` abort a
/// valuation. `InvalidShares` and `MissingBalance` only cost the per-share
/// figure; [`crate::value`] reports them as [`ValuationWarning`]s.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValuationError {
    #[error("required line item '{item}' has no usable periods")]
    MissingData { item: &'static str },

    #[error("invalid assumption '{field}': {reason}")]
    InvalidAssumption { field: &'static str, reason: String },

    #[error("'{quantity}' overflowed to a non-finite number")]
    NonFiniteResult { quantity: &'static str },

    #[error("shares outstanding must be a positive number, got {}", describe_shares(.shares))]
    InvalidShares { shares: Option<f64> },

    #[error("balance sheet item '{item}' is missing")]
    MissingBalance { item: LineItem },
}

fn describe_shares(shares: &Option<f64>) -> String {
    shares.map_or_else(|| String::from("none"), |value| value.to_string())
}

impl ValuationError {
    pub(crate) fn invalid_assumption(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidAssumption {
            field,
            reason: reason.into(),
        }
    }

    /// Stable machine code used in envelopes.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingData { .. } => "valuation.missing_data",
            Self::InvalidAssumption { .. } => "valuation.invalid_assumption",
            Self::NonFiniteResult { .. } => "valuation.non_finite_result",
            Self::InvalidShares { .. } => "valuation.invalid_shares",
            Self::MissingBalance { .. } => "valuation.missing_balance",
        }
    }

    /// Whether the error leaves the enterprise value intact.
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::InvalidShares { .. } | Self::MissingBalance { .. })
    }
}

/// Non-fatal problem attached to a finished valuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationWarning {
    pub code: String,
    pub message: String,
}

impl From<&ValuationError> for ValuationWarning {
    fn from(error: &ValuationError) -> Self {
        Self {
            code: error.code().to_owned(),
            message: error.to_string(),
        }
    }
}
