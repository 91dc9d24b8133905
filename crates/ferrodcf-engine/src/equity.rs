//! Enterprise value to per-share value.

use serde::{Deserialize, Serialize};

use ferrodcf_core::LineItem;

use crate::{MissingBalancePolicy, ValuationError};

/// Balance-sheet inputs of the equity bridge. Absent figures stay `None`;
/// how they are treated is the caller's [`MissingBalancePolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceInputs {
    pub cash: Option<f64>,
    pub debt: Option<f64>,
    pub shares_outstanding: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityResult {
    pub cash: f64,
    pub debt: f64,
    pub shares_outstanding: f64,
    pub equity_value: f64,
    pub fair_value_per_share: f64,
}

/// `equity = ev + cash - debt`, divided by the share count.
///
/// # Errors
///
/// - [`ValuationError::InvalidShares`] when shares are absent, not finite or
///   not positive.
/// - [`ValuationError::MissingBalance`] when cash or debt is absent and the
///   policy is [`MissingBalancePolicy::SkipEquity`].
pub fn bridge(
    enterprise_value: f64,
    balance: &BalanceInputs,
    policy: MissingBalancePolicy,
) -> Result<EquityResult, ValuationError> {
    let shares_outstanding = match balance.shares_outstanding {
        Some(shares) if shares.is_finite() && shares > 0.0 => shares,
        shares => return Err(ValuationError::InvalidShares { shares }),
    };
    let cash = resolve(balance.cash, LineItem::CashAndEquivalents, policy)?;
    let debt = resolve(balance.debt, LineItem::TotalDebt, policy)?;

    let equity_value = enterprise_value + cash - debt;
    let fair_value_per_share = equity_value / shares_outstanding;
    tracing::debug!(equity_value, fair_value_per_share, "bridged to equity");

    Ok(EquityResult {
        cash,
        debt,
        shares_outstanding,
        equity_value,
        fair_value_per_share,
    })
}

fn resolve(
    value: Option<f64>,
    item: LineItem,
    policy: MissingBalancePolicy,
) -> Result<f64, ValuationError> {
    match (value, policy) {
        (Some(value), _) => Ok(value),
        (None, MissingBalancePolicy::AssumeZero) => Ok(0.0),
        (None, MissingBalancePolicy::SkipEquity) => Err(ValuationError::MissingBalance { item }),
    }
}
