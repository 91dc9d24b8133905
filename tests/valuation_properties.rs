//! Property tests for the forecast engine.

use ferrodcf_engine::{project, Assumptions};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

/// Maps an arbitrary integer onto `[0, max]` in basis-point steps.
fn rate(raw: u16, max: f64) -> f64 {
    let steps = (max * 10_000.0) as u16;
    f64::from(raw % (steps + 1)) / 10_000.0
}

fn years(raw: u8) -> u32 {
    3 + u32::from(raw % 8)
}

fn baseline(raw: i32) -> f64 {
    f64::from(raw) * 1_000.0
}

#[quickcheck]
fn enterprise_value_is_finite_for_valid_assumptions(
    avg: i32,
    growth: u16,
    terminal: u16,
    discount: u16,
    horizon: u8,
) -> TestResult {
    let Ok(assumptions) = Assumptions::new(
        rate(growth, 0.20),
        rate(terminal, 0.10),
        rate(discount, 0.20),
        years(horizon),
    ) else {
        return TestResult::discard();
    };

    let result = project(baseline(avg), &assumptions).expect("valid inputs project");
    TestResult::from_bool(
        result.enterprise_value.is_finite()
            && result.years.len() == assumptions.forecast_years() as usize,
    )
}

#[quickcheck]
fn raising_growth_never_lowers_enterprise_value(
    avg: u32,
    low: u16,
    high: u16,
    terminal: u16,
    discount: u16,
    horizon: u8,
) -> TestResult {
    let (low, high) = {
        let (a, b) = (rate(low, 0.20), rate(high, 0.20));
        (a.min(b), a.max(b))
    };
    let terminal = rate(terminal, 0.10);
    let discount = rate(discount, 0.20);
    let horizon = years(horizon);

    let (Ok(slow), Ok(fast)) = (
        Assumptions::new(low, terminal, discount, horizon),
        Assumptions::new(high, terminal, discount, horizon),
    ) else {
        return TestResult::discard();
    };

    let avg = f64::from(avg % 1_000_000_000);
    let slow = project(avg, &slow).expect("slow projection");
    let fast = project(avg, &fast).expect("fast projection");
    TestResult::from_bool(fast.enterprise_value >= slow.enterprise_value)
}

#[quickcheck]
fn discount_at_or_below_terminal_growth_is_always_rejected(terminal: u16, gap: u16) -> bool {
    let terminal = rate(terminal, 0.10);
    let discount = (terminal - rate(gap, 0.05)).max(0.0);
    Assumptions::new(0.10, terminal, discount, 5).is_err()
}

#[quickcheck]
fn zero_baseline_always_values_at_zero(growth: u16, horizon: u8) -> bool {
    let assumptions =
        Assumptions::new(rate(growth, 0.20), 0.03, 0.12, years(horizon)).expect("valid");
    let result = project(0.0, &assumptions).expect("projection");
    result.enterprise_value == 0.0 && result.years.iter().all(|year| year.future_fcf == 0.0)
}
