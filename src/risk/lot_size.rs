//! Forex lot sizing from account balance, risk percentage and stop distance.

use std::fmt;

/// Smallest tradable size; results below it are raised to it.
pub const MIN_LOTS: f64 = 0.01;

/// Floor applied to balance and stop-loss before computing.
pub const MIN_INPUT: f64 = 0.01;

/// Approximate value of one pip on one standard lot, in account currency.
const PIP_VALUE_PER_LOT: f64 = 10.0;

/// Result of a lot-size calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LotSize {
    /// Money at risk if the stop is hit.
    pub risk_amount: f64,
    /// Position size in standard lots, never below [`MIN_LOTS`].
    pub lots: f64,
}

impl fmt::Display for LotSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} lots (risk amount: ${:.2})", self.lots, self.risk_amount)
    }
}

/// Compute the safe lot size.
///
/// `balance` and `stop_loss_pips` are raised to [`MIN_INPUT`] first, so zero,
/// negative or NaN entries cannot produce negative or infinite sizes.
pub fn calculate(balance: f64, risk_percent: f64, stop_loss_pips: f64) -> LotSize {
    let balance = balance.max(MIN_INPUT);
    let stop_loss_pips = stop_loss_pips.max(MIN_INPUT);

    let risk_amount = balance * (risk_percent / 100.0);
    let lots = (risk_amount / (stop_loss_pips * PIP_VALUE_PER_LOT)).max(MIN_LOTS);

    LotSize { risk_amount, lots }
}

/// Risk percentage moved by a ±0.5 stepper within `[0.5, 5.0]`.
///
/// Stored in tenths of a percent so repeated steps never drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RiskPercent {
    tenths: u16,
}

impl RiskPercent {
    const MIN_TENTHS: u16 = 5;
    const MAX_TENTHS: u16 = 50;
    const STEP_TENTHS: u16 = 5;

    pub const MIN: RiskPercent = RiskPercent { tenths: Self::MIN_TENTHS };
    pub const MAX: RiskPercent = RiskPercent { tenths: Self::MAX_TENTHS };

    /// Snap an arbitrary percentage to the closest stepper value.
    pub fn nearest(percent: f64) -> Self {
        let steps = if percent.is_nan() {
            1.0
        } else {
            (percent / 0.5).round().clamp(1.0, 10.0)
        };
        Self {
            tenths: steps as u16 * Self::STEP_TENTHS,
        }
    }

    pub fn value(&self) -> f64 {
        f64::from(self.tenths) / 10.0
    }

    /// Step up by 0.5. Returns false (and leaves the value alone) at the top.
    pub fn increment(&mut self) -> bool {
        self.step(Self::STEP_TENTHS as i32)
    }

    /// Step down by 0.5. Returns false (and leaves the value alone) at the bottom.
    pub fn decrement(&mut self) -> bool {
        self.step(-(Self::STEP_TENTHS as i32))
    }

    fn step(&mut self, delta: i32) -> bool {
        let next = i32::from(self.tenths) + delta;
        if next < i32::from(Self::MIN_TENTHS) || next > i32::from(Self::MAX_TENTHS) {
            return false;
        }
        self.tenths = next as u16;
        true
    }
}

impl Default for RiskPercent {
    fn default() -> Self {
        Self { tenths: 10 }
    }
}

impl fmt::Display for RiskPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_standard_case() {
        let size = calculate(5000.0, 1.0, 20.0);
        assert!(close(size.risk_amount, 50.0));
        assert!(close(size.lots, 0.25));
        assert_eq!(size.to_string(), "0.25 lots (risk amount: $50.00)");
    }

    #[test]
    fn test_tiny_size_floored() {
        let size = calculate(100.0, 0.5, 500.0);
        assert!(close(size.risk_amount, 0.5));
        assert_eq!(size.lots, MIN_LOTS);
    }

    #[test]
    fn test_large_size_not_floored() {
        let size = calculate(5000.0, 1.0, 1.0);
        assert!(close(size.lots, 5.0));
    }

    #[test]
    fn test_degenerate_inputs_clamped() {
        // Zero stop would otherwise divide by zero.
        let size = calculate(5000.0, 1.0, 0.0);
        assert!(size.lots.is_finite());
        assert!(close(size.lots, 500.0));

        let size = calculate(-1000.0, 1.0, 20.0);
        assert!(size.risk_amount > 0.0);
        assert_eq!(size.lots, MIN_LOTS);

        let size = calculate(f64::NAN, 1.0, f64::NAN);
        assert!(close(size.risk_amount, 0.0001));
        assert_eq!(size.lots, MIN_LOTS);
    }

    #[test]
    fn test_stepper_bounds() {
        let mut risk = RiskPercent::default();
        assert_eq!(risk.value(), 1.0);

        for _ in 0..100 {
            risk.increment();
        }
        assert_eq!(risk, RiskPercent::MAX);
        assert!(!risk.increment());
        assert_eq!(risk.value(), 5.0);

        for _ in 0..100 {
            risk.decrement();
        }
        assert_eq!(risk, RiskPercent::MIN);
        assert!(!risk.decrement());
        assert_eq!(risk.value(), 0.5);
    }

    #[test]
    fn test_stepper_exact_values() {
        let mut risk = RiskPercent::MIN;
        let mut seen = vec![risk.value()];
        while risk.increment() {
            seen.push(risk.value());
        }
        assert_eq!(
            seen,
            vec![0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0]
        );
    }

    #[test]
    fn test_nearest() {
        assert_eq!(RiskPercent::nearest(1.2).value(), 1.0);
        assert_eq!(RiskPercent::nearest(1.3).value(), 1.5);
        assert_eq!(RiskPercent::nearest(0.0), RiskPercent::MIN);
        assert_eq!(RiskPercent::nearest(42.0), RiskPercent::MAX);
        assert_eq!(RiskPercent::nearest(f64::NAN), RiskPercent::MIN);
        assert_eq!(RiskPercent::nearest(f64::INFINITY), RiskPercent::MAX);
        assert_eq!(RiskPercent::nearest(2.5).to_string(), "2.5%");
    }
}
