//! # ferrodcf Engine
//!
//! Discounted cash flow valuation over in-memory statements.
//!
//! The pipeline has three stages, each usable on its own:
//!
//! | Stage | Function | Output |
//! |-------|----------|--------|
//! | Baseline | [`estimate_baseline`] | [`FcfBaseline`] |
//! | Forecast | [`project`] | [`ForecastResult`] |
//! | Equity bridge | [`bridge`] | [`EquityResult`] |
//!
//! [`value`] runs all three. Inputs are validated before anything is
//! computed; a failure never yields a partial result. The engine performs
//! no I/O and holds no state, so it can be called concurrently.
//!
//! ## Sign convention
//!
//! Capital expenditure must be a negative outflow, as statement providers
//! publish it. Free cash flow is `ocf + capex`.
//!
//! ```rust
//! use ferrodcf_core::{FinancialSeries, FiscalPeriod, LineItem};
//! use ferrodcf_engine::{value, Assumptions, BalanceInputs, EngineOptions, ValuationInput};
//!
//! let period = FiscalPeriod::parse("2024-03-31").unwrap();
//! let input = ValuationInput {
//!     operating_cash_flow: FinancialSeries::from_pairs(
//!         LineItem::OperatingCashFlow,
//!         [(period, 1_500_000.0)],
//!     )
//!     .unwrap(),
//!     capital_expenditure: FinancialSeries::from_pairs(
//!         LineItem::CapitalExpenditure,
//!         [(period, -500_000.0)],
//!     )
//!     .unwrap(),
//!     balance: BalanceInputs::default(),
//! };
//!
//! let valuation = value(&input, &Assumptions::default(), &EngineOptions::default()).unwrap();
//! assert_eq!(valuation.baseline.average, 1_000_000.0);
//! assert!(valuation.equity.is_none());
//! ```

mod assumptions;
mod equity;
mod error;
mod fcf;
mod forecast;

use serde::{Deserialize, Serialize};

use ferrodcf_core::{CompanyFinancials, FinancialSeries, LineItem};

pub use assumptions::{
    Assumptions, EngineOptions, MissingBalancePolicy, DISCOUNT_RATE_RANGE, FORECAST_YEARS_RANGE,
    GROWTH_RATE_RANGE, TERMINAL_GROWTH_RATE_RANGE,
};
pub use equity::{bridge, BalanceInputs, EquityResult};
pub use error::{ValuationError, ValuationWarning};
pub use fcf::{estimate_baseline, FcfBaseline, BASELINE_WINDOW};
pub use forecast::{project, ForecastResult, ForecastYear};

/// Everything the engine reads from a company's statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationInput {
    pub operating_cash_flow: FinancialSeries,
    /// Negative outflows.
    pub capital_expenditure: FinancialSeries,
    pub balance: BalanceInputs,
}

impl ValuationInput {
    /// Picks the cash-flow rows, the latest cash and debt, and the share
    /// count. Absent rows become empty series and absent figures stay `None`.
    pub fn from_financials(financials: &CompanyFinancials) -> Self {
        let series = |item: LineItem| {
            financials
                .series(item)
                .cloned()
                .unwrap_or_else(|| FinancialSeries::empty(item))
        };

        Self {
            operating_cash_flow: series(LineItem::OperatingCashFlow),
            capital_expenditure: series(LineItem::CapitalExpenditure),
            balance: BalanceInputs {
                cash: financials.latest(LineItem::CashAndEquivalents),
                debt: financials.latest(LineItem::TotalDebt),
                shares_outstanding: financials.shares_outstanding,
            },
        }
    }
}

/// A completed valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub assumptions: Assumptions,
    pub baseline: FcfBaseline,
    pub forecast: ForecastResult,
    /// Absent when the equity bridge could not run; see `warnings`.
    pub equity: Option<EquityResult>,
    pub warnings: Vec<ValuationWarning>,
}

impl Valuation {
    pub const fn enterprise_value(&self) -> f64 {
        self.forecast.enterprise_value
    }

    pub fn fair_value_per_share(&self) -> Option<f64> {
        self.equity.map(|equity| equity.fair_value_per_share)
    }
}

/// Runs baseline, forecast and equity bridge.
///
/// # Errors
///
/// [`ValuationError::InvalidAssumption`], [`ValuationError::MissingData`] and
/// [`ValuationError::NonFiniteResult`] abort the valuation. Equity bridge
/// failures do not: they are returned as warnings on an otherwise complete
/// [`Valuation`].
pub fn value(
    input: &ValuationInput,
    assumptions: &Assumptions,
    options: &EngineOptions,
) -> Result<Valuation, ValuationError> {
    assumptions.validate()?;

    let baseline = estimate_baseline(&input.operating_cash_flow, &input.capital_expenditure)?;
    let forecast = project(baseline.average, assumptions)?;

    let mut warnings = Vec::new();
    let equity = match bridge(
        forecast.enterprise_value,
        &input.balance,
        options.missing_balance,
    ) {
        Ok(equity) => Some(equity),
        Err(error) if error.is_warning() => {
            tracing::warn!(code = error.code(), %error, "equity bridge skipped");
            warnings.push(ValuationWarning::from(&error));
            None
        }
        Err(error) => return Err(error),
    };

    Ok(Valuation {
        assumptions: *assumptions,
        baseline,
        forecast,
        equity,
        warnings,
    })
}
