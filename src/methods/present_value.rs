//! Present value of a level annual cash flow

/// Rates closer to zero than this take the undiscounted branch
const ZERO_RATE_TOLERANCE: f64 = 1e-10;

/// PV of `cash_flow` paid at the end of each of `years` years, rounded to
/// the nearest whole currency unit
///
/// Computed as the explicit sum Σ cash_flow / (1 + rate)^t for t = 1..=years.
/// A zero rate is the finite sum `cash_flow × years`.
pub fn present_value(cash_flow: f64, years: u32, rate: f64) -> f64 {
    if rate.abs() < ZERO_RATE_TOLERANCE {
        return (cash_flow * years as f64).round();
    }

    let v = 1.0 / (1.0 + rate);
    let mut discount = 1.0;
    let mut pv = 0.0;
    for _ in 0..years {
        discount *= v;
        pv += cash_flow * discount;
    }

    pv.round()
}

/// Closed-form annuity-immediate factor a(n) at `rate`
pub fn annuity_factor(years: u32, rate: f64) -> f64 {
    if rate.abs() < ZERO_RATE_TOLERANCE {
        return years as f64;
    }

    (1.0 - (1.0 + rate).powi(-(years as i32))) / rate
}
