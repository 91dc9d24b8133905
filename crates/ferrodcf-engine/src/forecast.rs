//! Forecast and discounting.

use serde::{Deserialize, Serialize};

use crate::{Assumptions, ValuationError};

/// One explicit forecast year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastYear {
    /// 1-based year offset from the baseline.
    pub year_index: u32,
    pub future_fcf: f64,
    pub discounted_fcf: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub years: Vec<ForecastYear>,
    /// Gordon growth value at the end of the final forecast year.
    pub terminal_value: f64,
    pub discounted_terminal_value: f64,
    pub enterprise_value: f64,
}

impl ForecastResult {
    pub fn sum_discounted_fcf(&self) -> f64 {
        self.years.iter().map(|year| year.discounted_fcf).sum()
    }
}

/// Projects `avg_fcf` over the forecast horizon and discounts it, closing
/// with a Gordon growth terminal value anchored on the last forecast year.
///
/// # Errors
///
/// [`ValuationError::InvalidAssumption`] when `avg_fcf` is not finite or the
/// assumptions fail validation. Nothing is computed in that case.
/// [`ValuationError::NonFiniteResult`] when compounding overflows.
pub fn project(avg_fcf: f64, assumptions: &Assumptions) -> Result<ForecastResult, ValuationError> {
    assumptions.validate()?;
    if !avg_fcf.is_finite() {
        return Err(ValuationError::invalid_assumption(
            "avg_fcf",
            "must be finite",
        ));
    }

    let growth = 1.0 + assumptions.growth_rate();
    let discount = 1.0 + assumptions.discount_rate();
    let horizon = assumptions.forecast_years();

    let years: Vec<ForecastYear> = (1..=horizon)
        .map(|year_index| {
            let exponent = year_index as i32;
            let future_fcf = avg_fcf * growth.powi(exponent);
            ForecastYear {
                year_index,
                future_fcf,
                discounted_fcf: future_fcf / discount.powi(exponent),
            }
        })
        .collect();

    let final_fcf = years.last().map_or(avg_fcf, |year| year.future_fcf);
    let terminal_value = final_fcf * (1.0 + assumptions.terminal_growth_rate())
        / (assumptions.discount_rate() - assumptions.terminal_growth_rate());
    let discounted_terminal_value = terminal_value / discount.powi(horizon as i32);
    let enterprise_value =
        years.iter().map(|year| year.discounted_fcf).sum::<f64>() + discounted_terminal_value;

    for (quantity, value) in [
        ("terminal_value", terminal_value),
        ("discounted_terminal_value", discounted_terminal_value),
        ("enterprise_value", enterprise_value),
    ] {
        if !value.is_finite() {
            return Err(ValuationError::NonFiniteResult { quantity });
        }
    }

    tracing::debug!(
        horizon,
        terminal_value,
        enterprise_value,
        "projected free cash flow"
    );

    Ok(ForecastResult {
        years,
        terminal_value,
        discounted_terminal_value,
        enterprise_value,
    })
}
