use serde::{Deserialize, Serialize};

use crate::ValuationError;

pub const GROWTH_RATE_RANGE: (f64, f64) = (0.0, 0.20);
pub const TERMINAL_GROWTH_RATE_RANGE: (f64, f64) = (0.0, 0.10);
pub const DISCOUNT_RATE_RANGE: (f64, f64) = (0.0, 0.20);
pub const FORECAST_YEARS_RANGE: (u32, u32) = (3, 10);

/// Scalar inputs of a valuation, validated at construction.
///
/// Rates are fractions (`0.10` is ten percent). `discount_rate` is always
/// strictly greater than `terminal_growth_rate`, so the Gordon growth
/// denominator is positive for every value of this type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAssumptions")]
pub struct Assumptions {
    growth_rate: f64,
    terminal_growth_rate: f64,
    discount_rate: f64,
    forecast_years: u32,
}

/// Missing fields fall back to the defaults, so partial documents are valid.
#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawAssumptions {
    growth_rate: f64,
    terminal_growth_rate: f64,
    discount_rate: f64,
    forecast_years: u32,
}

impl Default for RawAssumptions {
    fn default() -> Self {
        let defaults = Assumptions::default();
        Self {
            growth_rate: defaults.growth_rate,
            terminal_growth_rate: defaults.terminal_growth_rate,
            discount_rate: defaults.discount_rate,
            forecast_years: defaults.forecast_years,
        }
    }
}

impl TryFrom<RawAssumptions> for Assumptions {
    type Error = ValuationError;

    fn try_from(raw: RawAssumptions) -> Result<Self, Self::Error> {
        Self::new(
            raw.growth_rate,
            raw.terminal_growth_rate,
            raw.discount_rate,
            raw.forecast_years,
        )
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            growth_rate: 0.10,
            terminal_growth_rate: 0.04,
            discount_rate: 0.10,
            forecast_years: 5,
        }
    }
}

impl Assumptions {
    pub fn new(
        growth_rate: f64,
        terminal_growth_rate: f64,
        discount_rate: f64,
        forecast_years: u32,
    ) -> Result<Self, ValuationError> {
        let assumptions = Self {
            growth_rate,
            terminal_growth_rate,
            discount_rate,
            forecast_years,
        };
        assumptions.validate()?;
        Ok(assumptions)
    }

    /// Builds assumptions from percentages as entered by a user (`10` for 10%).
    pub fn from_percentages(
        growth_pct: f64,
        terminal_growth_pct: f64,
        discount_pct: f64,
        forecast_years: u32,
    ) -> Result<Self, ValuationError> {
        Self::new(
            growth_pct / 100.0,
            terminal_growth_pct / 100.0,
            discount_pct / 100.0,
            forecast_years,
        )
    }

    pub const fn growth_rate(&self) -> f64 {
        self.growth_rate
    }

    pub const fn terminal_growth_rate(&self) -> f64 {
        self.terminal_growth_rate
    }

    pub const fn discount_rate(&self) -> f64 {
        self.discount_rate
    }

    pub const fn forecast_years(&self) -> u32 {
        self.forecast_years
    }

    /// Checks every field and the discount/terminal-growth ordering.
    pub fn validate(&self) -> Result<(), ValuationError> {
        check_rate("growth_rate", self.growth_rate, GROWTH_RATE_RANGE)?;
        check_rate(
            "terminal_growth_rate",
            self.terminal_growth_rate,
            TERMINAL_GROWTH_RATE_RANGE,
        )?;
        check_rate("discount_rate", self.discount_rate, DISCOUNT_RATE_RANGE)?;

        let (min_years, max_years) = FORECAST_YEARS_RANGE;
        if !(min_years..=max_years).contains(&self.forecast_years) {
            return Err(ValuationError::invalid_assumption(
                "forecast_years",
                format!(
                    "{} is outside [{min_years}, {max_years}]",
                    self.forecast_years
                ),
            ));
        }

        if self.discount_rate <= self.terminal_growth_rate {
            return Err(ValuationError::invalid_assumption(
                "discount_rate",
                format!(
                    "must be greater than terminal_growth_rate ({} <= {})",
                    self.discount_rate, self.terminal_growth_rate
                ),
            ));
        }

        Ok(())
    }
}

fn check_rate(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), ValuationError> {
    if !value.is_finite() {
        return Err(ValuationError::invalid_assumption(field, "must be finite"));
    }
    if value < min || value > max {
        return Err(ValuationError::invalid_assumption(
            field,
            format!("{value} is outside [{min}, {max}]"),
        ));
    }
    Ok(())
}

/// What to do when cash or debt is missing from the balance sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingBalancePolicy {
    /// Treat a missing cash or debt figure as zero.
    #[default]
    AssumeZero,
    /// Skip the equity bridge and report a `MissingBalance` warning.
    SkipEquity,
}

impl MissingBalancePolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AssumeZero => "assume-zero",
            Self::SkipEquity => "skip-equity",
        }
    }
}

/// Knobs of the valuation pipeline that are not financial assumptions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    pub missing_balance: MissingBalancePolicy,
}

impl EngineOptions {
    pub const fn with_missing_balance(mut self, policy: MissingBalancePolicy) -> Self {
        self.missing_balance = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(error: ValuationError) -> &'static str {
        match error {
            ValuationError::InvalidAssumption { field, .. } => field,
            other => panic!("expected invalid assumption, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        let defaults = Assumptions::default();
        assert!(defaults.validate().is_ok());
        assert_eq!(defaults.forecast_years(), 5);
    }

    #[test]
    fn discount_equal_to_terminal_growth_is_rejected() {
        let error = Assumptions::new(0.05, 0.08, 0.08, 5).expect_err("must fail");
        assert_eq!(field_of(error), "discount_rate");
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert_eq!(
            field_of(Assumptions::new(0.25, 0.04, 0.10, 5).expect_err("must fail")),
            "growth_rate"
        );
        assert_eq!(
            field_of(Assumptions::new(0.10, 0.11, 0.20, 5).expect_err("must fail")),
            "terminal_growth_rate"
        );
        assert_eq!(
            field_of(Assumptions::new(0.10, 0.04, 0.10, 2).expect_err("must fail")),
            "forecast_years"
        );
        assert_eq!(
            field_of(Assumptions::new(0.10, 0.04, 0.10, 11).expect_err("must fail")),
            "forecast_years"
        );
    }

    #[test]
    fn nan_is_rejected() {
        let error = Assumptions::new(f64::NAN, 0.04, 0.10, 5).expect_err("must fail");
        assert_eq!(field_of(error), "growth_rate");
    }

    #[test]
    fn percentages_are_scaled() {
        let assumptions = Assumptions::from_percentages(12.0, 3.0, 9.0, 7).expect("valid");
        assert!((assumptions.growth_rate() - 0.12).abs() < 1e-12);
        assert!((assumptions.discount_rate() - 0.09).abs() < 1e-12);
    }

    #[test]
    fn partial_document_falls_back_to_defaults() {
        let assumptions: Assumptions =
            serde_json::from_str(r#"{"discount_rate": 0.12}"#).expect("valid document");
        assert_eq!(assumptions.discount_rate(), 0.12);
        assert_eq!(assumptions.growth_rate(), 0.10);
        assert_eq!(assumptions.forecast_years(), 5);
    }

    #[test]
    fn invalid_document_is_rejected() {
        let result: Result<Assumptions, _> =
            serde_json::from_str(r#"{"discount_rate": 0.03}"#);
        assert!(result.is_err());
    }

    #[test]
    fn policy_serializes_kebab_case() {
        let json = serde_json::to_string(&MissingBalancePolicy::SkipEquity).expect("serialize");
        assert_eq!(json, r#""skip-equity""#);
        assert_eq!(EngineOptions::default().missing_balance, MissingBalancePolicy::AssumeZero);
    }
}
