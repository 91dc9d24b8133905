//! Baseline free cash flow from historical statements.

use serde::{Deserialize, Serialize};

use ferrodcf_core::{FinancialSeries, SeriesPoint};

use crate::ValuationError;

/// Number of most recent aligned periods averaged into the baseline.
pub const BASELINE_WINDOW: usize = 3;

/// Aligned free-cash-flow history and the average it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FcfBaseline {
    /// `ocf + capex` for every period present in both series, most recent first.
    pub history: Vec<SeriesPoint>,
    /// How many of the most recent periods went into `average`.
    pub window: usize,
    pub average: f64,
}

/// Aligns operating cash flow and capital expenditure and averages the most
/// recent periods.
///
/// Capital expenditure must be reported as a negative outflow; the two
/// series are added, never subtracted. When fewer than [`BASELINE_WINDOW`]
/// periods align, all of them are averaged.
///
/// # Errors
///
/// [`ValuationError::MissingData`] when either series is empty or the two
/// share no period. [`ValuationError::NonFiniteResult`] when a period's sum
/// or the average overflows.
pub fn estimate_baseline(
    operating_cash_flow: &FinancialSeries,
    capital_expenditure: &FinancialSeries,
) -> Result<FcfBaseline, ValuationError> {
    if operating_cash_flow.is_empty() {
        return Err(ValuationError::MissingData {
            item: operating_cash_flow.item().as_str(),
        });
    }
    if capital_expenditure.is_empty() {
        return Err(ValuationError::MissingData {
            item: capital_expenditure.item().as_str(),
        });
    }

    let history: Vec<SeriesPoint> = operating_cash_flow
        .points()
        .iter()
        .filter_map(|ocf| {
            capital_expenditure.get(ocf.period).map(|capex| SeriesPoint {
                period: ocf.period,
                value: ocf.value + capex,
            })
        })
        .collect();

    if history.is_empty() {
        return Err(ValuationError::MissingData {
            item: "free_cash_flow",
        });
    }

    if history.iter().any(|point| !point.value.is_finite()) {
        return Err(ValuationError::NonFiniteResult {
            quantity: "free_cash_flow",
        });
    }

    let window = history.len().min(BASELINE_WINDOW);
    let average = history[..window].iter().map(|point| point.value).sum::<f64>() / window as f64;
    if !average.is_finite() {
        return Err(ValuationError::NonFiniteResult {
            quantity: "free_cash_flow",
        });
    }

    tracing::debug!(
        aligned_periods = history.len(),
        window,
        average,
        "estimated free cash flow baseline"
    );

    Ok(FcfBaseline {
        history,
        window,
        average,
    })
}
