//! Money-weighted annualized return (IRR) solver
//!
//! Finds the daily growth factor `r` that zeroes the net present value
//! f(r) = Σ value·r^days of a signed cash-flow table, then annualizes it.

use super::cashflow::CashFlowEntry;

/// Starting guess for the daily factor: just above break-even
const INITIAL_GUESS: f64 = 1.01;

/// Bounds on the daily factor; ±10% per day is ±3650%/yr annualized and
/// also keeps r^days representable for multi-year day offsets
const RATE_MIN: f64 = 0.9;
const RATE_MAX: f64 = 1.1;

const MAX_ITERATIONS: u32 = 200;

/// Convergence tolerance on the daily factor
const RATE_TOLERANCE: f64 = 1e-12;

/// A root is only accepted when |f(r)| is within this tolerance relative to
/// the table's total absolute flow
const RESIDUAL_TOLERANCE: f64 = 1e-6;

/// Derivative magnitudes below this switch Newton over to bisection
const DERIVATIVE_FLOOR: f64 = 1e-20;

/// Solve for the annualized money-weighted return of a cash-flow table,
/// as a percentage (`365·100·(r−1)`)
///
/// Returns None when the table is empty, when every flow has the same sign
/// (no root can meaningfully exist), or when the iteration fails to
/// converge on a finite root within bounds. A None result means "IRR
/// unavailable" and must not be treated as zero.
pub fn solve_irr(cashflow: &[CashFlowEntry]) -> Option<f64> {
    if cashflow.is_empty() {
        return None;
    }

    // A root only exists with flows on both sides of zero
    let has_positive = cashflow.iter().any(|e| e.value > 1e-10);
    let has_negative = cashflow.iter().any(|e| e.value < -1e-10);
    if !has_positive || !has_negative {
        return None;
    }

    let scale: f64 = cashflow.iter().map(|e| e.value.abs()).sum();

    // Newton-Raphson on the daily factor
    let mut rate = INITIAL_GUESS;
    for _ in 0..MAX_ITERATIONS {
        let (npv, dnpv) = npv_and_derivative(cashflow, rate);

        if !npv.is_finite() || !dnpv.is_finite() || dnpv.abs() < DERIVATIVE_FLOOR {
            return solve_bisection(cashflow, scale);
        }

        let next = (rate - npv / dnpv).clamp(RATE_MIN, RATE_MAX);

        if (next - rate).abs() < RATE_TOLERANCE {
            return accept(cashflow, next, scale).or_else(|| solve_bisection(cashflow, scale));
        }

        rate = next;
    }

    // Newton didn't converge, try bisection
    solve_bisection(cashflow, scale)
}

/// Evaluate f(r) = Σ value·r^days and its derivative Σ value·days·r^(days-1)
fn npv_and_derivative(cashflow: &[CashFlowEntry], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for entry in cashflow {
        let days = entry.days as i32;
        npv += entry.value * rate.powi(days);
        if days != 0 {
            dnpv += entry.value * days as f64 * rate.powi(days - 1);
        }
    }

    (npv, dnpv)
}

fn npv_at_rate(cashflow: &[CashFlowEntry], rate: f64) -> f64 {
    cashflow
        .iter()
        .map(|e| e.value * rate.powi(e.days as i32))
        .sum()
}

/// Validate a candidate root and annualize it
fn accept(cashflow: &[CashFlowEntry], rate: f64, scale: f64) -> Option<f64> {
    let npv = npv_at_rate(cashflow, rate);
    if npv.is_finite() && npv.abs() <= RESIDUAL_TOLERANCE * scale {
        Some(annualize(rate))
    } else {
        None
    }
}

fn annualize(rate: f64) -> f64 {
    365.0 * 100.0 * (rate - 1.0)
}

/// Fallback bisection over the bounded factor bracket
fn solve_bisection(cashflow: &[CashFlowEntry], scale: f64) -> Option<f64> {
    let mut low = RATE_MIN;
    let mut high = RATE_MAX;

    let npv_low = npv_at_rate(cashflow, low);
    let npv_high = npv_at_rate(cashflow, high);

    // Check that the bracket actually straddles a root
    if npv_low * npv_high > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at_rate(cashflow, mid);

        if npv_mid.abs() <= RESIDUAL_TOLERANCE * scale || (high - low) / 2.0 < RATE_TOLERANCE {
            return accept(cashflow, mid, scale);
        }

        if npv_mid * npv_at_rate(cashflow, low) < 0.0 {
            high = mid;
        } else {
            low = mid;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_one_year_gain() {
        // Invest 1000, worth 1100 a year later: r = 1.1^(1/365)
        let table = vec![
            CashFlowEntry { days: 365, value: 1000.0 },
            CashFlowEntry { days: 0, value: -1100.0 },
        ];

        let irr = solve_irr(&table).unwrap();
        let expected = 365.0 * 100.0 * (1.1_f64.powf(1.0 / 365.0) - 1.0);
        assert_relative_eq!(irr, expected, max_relative = 1e-6);
    }

    #[test]
    fn test_one_year_loss_is_negative() {
        let table = vec![
            CashFlowEntry { days: 365, value: 1000.0 },
            CashFlowEntry { days: 0, value: -900.0 },
        ];

        let irr = solve_irr(&table).unwrap();
        let expected = 365.0 * 100.0 * (0.9_f64.powf(1.0 / 365.0) - 1.0);
        assert!(irr < 0.0);
        assert_relative_eq!(irr, expected, max_relative = 1e-6);
    }

    #[test]
    fn test_root_zeroes_npv() {
        // Staggered buys, one dividend, terminal valuation
        let table = vec![
            CashFlowEntry { days: 730, value: 1000.0 },
            CashFlowEntry { days: 365, value: 500.0 },
            CashFlowEntry { days: 180, value: -30.0 },
            CashFlowEntry { days: 0, value: -1700.0 },
        ];

        let irr = solve_irr(&table).unwrap();
        assert!(irr.is_finite());

        let rate = irr / (365.0 * 100.0) + 1.0;
        let scale: f64 = table.iter().map(|e| e.value.abs()).sum();
        assert!(npv_at_rate(&table, rate).abs() <= 1e-6 * scale);
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(solve_irr(&[]), None);
    }

    #[test]
    fn test_same_sign_flows_have_no_irr() {
        let buys_only = vec![
            CashFlowEntry { days: 365, value: 1000.0 },
            CashFlowEntry { days: 100, value: 500.0 },
        ];
        assert_eq!(solve_irr(&buys_only), None);

        let sells_only = vec![
            CashFlowEntry { days: 365, value: -1000.0 },
            CashFlowEntry { days: 0, value: -500.0 },
        ];
        assert_eq!(solve_irr(&sells_only), None);
    }

    #[test]
    fn test_same_day_flows_degenerate() {
        // All offsets zero: f is constant and can have no root
        let table = vec![
            CashFlowEntry { days: 0, value: 1000.0 },
            CashFlowEntry { days: 0, value: -1100.0 },
        ];
        assert_eq!(solve_irr(&table), None);
    }

    #[test]
    fn test_break_even_is_near_zero() {
        let table = vec![
            CashFlowEntry { days: 365, value: 1000.0 },
            CashFlowEntry { days: 0, value: -1000.0 },
        ];
        let irr = solve_irr(&table).unwrap();
        assert_relative_eq!(irr, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_long_holding_period() {
        // Ten years, doubled: well inside the factor bounds
        let table = vec![
            CashFlowEntry { days: 3650, value: 1000.0 },
            CashFlowEntry { days: 0, value: -2000.0 },
        ];
        let irr = solve_irr(&table).unwrap();
        let expected = 365.0 * 100.0 * (2.0_f64.powf(1.0 / 3650.0) - 1.0);
        assert_relative_eq!(irr, expected, max_relative = 1e-6);
    }
}
