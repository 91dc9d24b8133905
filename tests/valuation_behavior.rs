//! Behavior-driven tests for the valuation pipeline
//!
//! These tests describe what a caller observes when valuing a company:
//! which inputs abort a valuation, which only cost the per-share figure,
//! and what numbers come out of well-formed statements.

use approx::assert_relative_eq;
use ferrodcf_core::{
    CompanyFinancials, FinancialSeries, FiscalPeriod, LineItem, Statement, StatementKind, Symbol,
    UtcDateTime,
};
use ferrodcf_engine::{
    value, Assumptions, BalanceInputs, EngineOptions, MissingBalancePolicy, ValuationError,
    ValuationInput,
};

fn period(value: &str) -> FiscalPeriod {
    FiscalPeriod::parse(value).expect("valid period")
}

fn series(item: LineItem, points: &[(&str, f64)]) -> FinancialSeries {
    FinancialSeries::from_pairs(
        item,
        points.iter().map(|(p, value)| (period(p), *value)),
    )
    .expect("valid series")
}

/// Three years of FCF averaging exactly 1,000,000.
fn steady_input(balance: BalanceInputs) -> ValuationInput {
    ValuationInput {
        operating_cash_flow: series(
            LineItem::OperatingCashFlow,
            &[
                ("2022-03-31", 1_400_000.0),
                ("2023-03-31", 1_500_000.0),
                ("2024-03-31", 1_600_000.0),
            ],
        ),
        capital_expenditure: series(
            LineItem::CapitalExpenditure,
            &[
                ("2022-03-31", -400_000.0),
                ("2023-03-31", -500_000.0),
                ("2024-03-31", -600_000.0),
            ],
        ),
        balance,
    }
}

// =============================================================================
// Valuation: Well-formed statements
// =============================================================================

#[test]
fn when_growth_matches_discount_each_discounted_year_equals_the_baseline() {
    // Given: A company whose recent FCF averages 1,000,000 and the default sliders
    let input = steady_input(BalanceInputs::default());

    // When: The company is valued
    let valuation = value(&input, &Assumptions::default(), &EngineOptions::default())
        .expect("valuation should succeed");

    // Then: Future FCF compounds at 10% while each discounted year stays at 1,000,000
    assert_eq!(valuation.baseline.window, 3);
    assert_relative_eq!(valuation.baseline.average, 1_000_000.0, max_relative = 1e-12);

    let expected_future = [1_100_000.0, 1_210_000.0, 1_331_000.0, 1_464_100.0, 1_610_510.0];
    assert_eq!(valuation.forecast.years.len(), expected_future.len());
    for (year, expected) in valuation.forecast.years.iter().zip(expected_future) {
        assert_relative_eq!(year.future_fcf, expected, max_relative = 1e-9);
        assert_relative_eq!(year.discounted_fcf, 1_000_000.0, max_relative = 1e-9);
    }
    assert_relative_eq!(
        valuation.forecast.sum_discounted_fcf(),
        5_000_000.0,
        max_relative = 1e-9
    );
    assert_relative_eq!(
        valuation.enterprise_value(),
        5_000_000.0 + 1_610_510.0 * 1.04 / 0.06 / 1.1_f64.powi(5),
        max_relative = 1e-9
    );
}

#[test]
fn when_only_two_periods_align_the_baseline_averages_those_two() {
    // Given: Cash flow statements with only two reported years
    let input = ValuationInput {
        operating_cash_flow: series(
            LineItem::OperatingCashFlow,
            &[("2023-12-31", 300.0), ("2024-12-31", 500.0)],
        ),
        capital_expenditure: series(
            LineItem::CapitalExpenditure,
            &[("2023-12-31", -100.0), ("2024-12-31", -100.0)],
        ),
        balance: BalanceInputs::default(),
    };

    // When: The company is valued
    let valuation = value(&input, &Assumptions::default(), &EngineOptions::default())
        .expect("short history is not an error");

    // Then: The baseline is the mean of the two available years
    assert_eq!(valuation.baseline.window, 2);
    assert_eq!(valuation.baseline.average, 300.0);
}

#[test]
fn when_balance_sheet_is_complete_per_share_value_is_reported() {
    // Given: Cash, debt and a positive share count
    let input = steady_input(BalanceInputs {
        cash: Some(2_000_000.0),
        debt: Some(500_000.0),
        shares_outstanding: Some(1_000.0),
    });

    // When: The company is valued
    let valuation = value(&input, &Assumptions::default(), &EngineOptions::default())
        .expect("valuation should succeed");

    // Then: Equity is EV plus cash minus debt, spread over the shares
    let equity = valuation.equity.expect("equity bridge should run");
    assert_relative_eq!(
        equity.equity_value,
        valuation.enterprise_value() + 1_500_000.0,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        equity.fair_value_per_share,
        equity.equity_value / 1_000.0,
        max_relative = 1e-12
    );
    assert!(valuation.warnings.is_empty());
}

#[test]
fn when_run_twice_with_identical_inputs_results_are_bit_identical() {
    // Given: One input and one set of assumptions
    let input = steady_input(BalanceInputs {
        cash: Some(10.0),
        debt: Some(20.0),
        shares_outstanding: Some(3.0),
    });
    let assumptions = Assumptions::new(0.07, 0.025, 0.09, 8).expect("valid");

    // When: The valuation runs twice
    let first = value(&input, &assumptions, &EngineOptions::default()).expect("first run");
    let second = value(&input, &assumptions, &EngineOptions::default()).expect("second run");

    // Then: Every number matches to the bit
    assert_eq!(
        first.enterprise_value().to_bits(),
        second.enterprise_value().to_bits()
    );
    for (a, b) in first.forecast.years.iter().zip(&second.forecast.years) {
        assert_eq!(a.discounted_fcf.to_bits(), b.discounted_fcf.to_bits());
    }
    assert_eq!(first, second);
}

// =============================================================================
// Valuation: Fatal errors
// =============================================================================

#[test]
fn when_capex_is_missing_valuation_fails_with_missing_data() {
    // Given: Operating cash flow but no capital expenditure row
    let input = ValuationInput {
        operating_cash_flow: series(LineItem::OperatingCashFlow, &[("2024-03-31", 100.0)]),
        capital_expenditure: FinancialSeries::empty(LineItem::CapitalExpenditure),
        balance: BalanceInputs::default(),
    };

    // When: The company is valued
    let error = value(&input, &Assumptions::default(), &EngineOptions::default())
        .expect_err("valuation must fail");

    // Then: No partial result, the missing item is named
    assert_eq!(
        error,
        ValuationError::MissingData {
            item: "capital_expenditure"
        }
    );
}

#[test]
fn when_discount_equals_terminal_growth_valuation_fails_before_computing() {
    // Given: Assumptions where the Gordon denominator would be zero
    let error = Assumptions::new(0.10, 0.05, 0.05, 5).expect_err("must be rejected");

    // Then: The error names the discount rate
    assert!(matches!(
        error,
        ValuationError::InvalidAssumption {
            field: "discount_rate",
            ..
        }
    ));
    assert_eq!(error.code(), "valuation.invalid_assumption");
}

#[test]
fn when_the_forecast_overflows_valuation_fails_instead_of_reporting_infinity() {
    // Given: A baseline so large that the terminal value overflows
    let input = ValuationInput {
        operating_cash_flow: series(LineItem::OperatingCashFlow, &[("2024-03-31", 2e307)]),
        capital_expenditure: series(LineItem::CapitalExpenditure, &[("2024-03-31", -1e307)]),
        balance: BalanceInputs::default(),
    };
    let assumptions = Assumptions::new(0.20, 0.0, 0.01, 10).expect("valid");

    // When: The company is valued
    let error = value(&input, &assumptions, &EngineOptions::default())
        .expect_err("an infinite enterprise value is not a result");

    // Then: The failure is structured and names the overflowing quantity
    assert_eq!(
        error,
        ValuationError::NonFiniteResult {
            quantity: "terminal_value"
        }
    );
    assert!(!error.is_warning());
}

#[test]
fn when_assumption_document_sets_discount_equal_to_terminal_growth_it_is_rejected() {
    // Given: An assumptions document with discount rate equal to terminal growth
    let assumptions: Result<Assumptions, _> =
        serde_json::from_str(r#"{"terminal_growth_rate": 0.10, "discount_rate": 0.10}"#);

    // Then: The document itself is rejected
    assert!(assumptions.is_err());
}

// =============================================================================
// Valuation: Non-fatal equity bridge problems
// =============================================================================

#[test]
fn when_shares_are_zero_enterprise_value_is_still_returned() {
    // Given: A balance sheet with zero shares outstanding
    let input = steady_input(BalanceInputs {
        cash: Some(100.0),
        debt: Some(50.0),
        shares_outstanding: Some(0.0),
    });

    // When: The company is valued
    let valuation = value(&input, &Assumptions::default(), &EngineOptions::default())
        .expect("zero shares must not abort");

    // Then: EV is present, equity is absent, and a warning explains why
    assert!(valuation.enterprise_value() > 0.0);
    assert!(valuation.equity.is_none());
    assert_eq!(valuation.fair_value_per_share(), None);
    assert_eq!(valuation.warnings.len(), 1);
    assert_eq!(valuation.warnings[0].code, "valuation.invalid_shares");
}

#[test]
fn when_debt_is_missing_and_policy_skips_equity_a_warning_is_reported() {
    // Given: No debt figure and the skip-equity policy
    let input = steady_input(BalanceInputs {
        cash: Some(100.0),
        debt: None,
        shares_outstanding: Some(10.0),
    });
    let options = EngineOptions::default().with_missing_balance(MissingBalancePolicy::SkipEquity);

    // When: The company is valued
    let valuation =
        value(&input, &Assumptions::default(), &options).expect("missing debt must not abort");

    // Then: Equity is skipped with a missing-balance warning
    assert!(valuation.equity.is_none());
    assert_eq!(valuation.warnings[0].code, "valuation.missing_balance");
    assert!(valuation.warnings[0].message.contains("total_debt"));
}

#[test]
fn when_debt_is_missing_and_policy_assumes_zero_equity_uses_zero_debt() {
    // Given: No debt figure and the default policy
    let input = steady_input(BalanceInputs {
        cash: Some(100.0),
        debt: None,
        shares_outstanding: Some(10.0),
    });

    // When: The company is valued
    let valuation = value(&input, &Assumptions::default(), &EngineOptions::default())
        .expect("valuation should succeed");

    // Then: Debt is treated as zero
    let equity = valuation.equity.expect("equity");
    assert_eq!(equity.debt, 0.0);
    assert_relative_eq!(
        equity.equity_value,
        valuation.enterprise_value() + 100.0,
        max_relative = 1e-12
    );
}

// =============================================================================
// Valuation: Inputs from provider statements
// =============================================================================

#[test]
fn when_built_from_company_financials_latest_balance_figures_are_used() {
    // Given: A provider bundle with cash flow, balance sheet and share count
    let cash_flow = Statement::new(
        StatementKind::CashFlow,
        vec![
            series(
                LineItem::OperatingCashFlow,
                &[("2023-03-31", 90.0), ("2024-03-31", 110.0)],
            ),
            series(
                LineItem::CapitalExpenditure,
                &[("2023-03-31", -30.0), ("2024-03-31", -10.0)],
            ),
        ],
    )
    .expect("cash flow");
    let balance_sheet = Statement::new(
        StatementKind::BalanceSheet,
        vec![series(
            LineItem::CashAndEquivalents,
            &[("2023-03-31", 5.0), ("2024-03-31", 7.0)],
        )],
    )
    .expect("balance sheet");
    let financials = CompanyFinancials::new(
        Symbol::parse("MRF.NS").expect("symbol"),
        "INR",
        UtcDateTime::now(),
        cash_flow,
    )
    .expect("financials")
    .with_statement(balance_sheet)
    .with_shares_outstanding(Some(4.0))
    .expect("shares");

    // When: Valuation inputs are extracted
    let input = ValuationInput::from_financials(&financials);

    // Then: Latest cash is used and missing debt stays absent
    assert_eq!(input.balance.cash, Some(7.0));
    assert_eq!(input.balance.debt, None);
    assert_eq!(input.balance.shares_outstanding, Some(4.0));
    assert_eq!(input.operating_cash_flow.len(), 2);

    let valuation =
        value(&input, &Assumptions::default(), &EngineOptions::default()).expect("valuation");
    assert_eq!(valuation.baseline.average, 80.0);
}
