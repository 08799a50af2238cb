//! Portfolio growth curve at the standard timeframes

use super::calculator::compound_factor;
use serde::Serialize;

/// A selectable projection horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Timeframe {
    pub months: u32,
    pub label: &'static str,
}

/// Horizons offered to investors, shortest first
pub const STANDARD_TIMEFRAMES: [Timeframe; 6] = [
    Timeframe { months: 1, label: "1 Month" },
    Timeframe { months: 3, label: "3 Months" },
    Timeframe { months: 6, label: "6 Months" },
    Timeframe { months: 12, label: "1 Year" },
    Timeframe { months: 24, label: "2 Years" },
    Timeframe { months: 36, label: "3 Years" },
];

/// Value of the initial amount at one timeframe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthPoint {
    pub months: u32,
    pub label: &'static str,
    pub value: f64,
    pub earnings: f64,
}

/// Compound the initial amount at the portfolio's average yield
///
/// Contributions are ignored; this is the headline curve for the blended rate.
pub fn growth_curve(initial_amount: f64, average_yield: f64, timeframes: &[Timeframe]) -> Vec<GrowthPoint> {
    let monthly_rate = average_yield / 100.0 / 12.0;
    timeframes
        .iter()
        .map(|tf| {
            let value = initial_amount * compound_factor(monthly_rate, tf.months);
            GrowthPoint {
                months: tf.months,
                label: tf.label,
                value,
                earnings: value - initial_amount,
            }
        })
        .collect()
}
