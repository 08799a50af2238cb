//! Monthly-discrete compounding calculator

use super::plan::ContributionPlan;
use super::result::{MonthRow, ProjectionResult};
use crate::error::Result;
use crate::protocol::ProtocolSpec;
use log::debug;
use serde::{Deserialize, Serialize};

/// Longest horizon for which the month-by-month trajectory is kept
pub const MAX_TRAJECTORY_MONTHS: u32 = 1200;

/// Configuration for a projection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Whether to keep the month-by-month trajectory (up to `MAX_TRAJECTORY_MONTHS`)
    pub detailed_output: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            detailed_output: true,
        }
    }
}

/// How contributions interact with growth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompoundingRegime {
    /// Each month: contribution lands first, then the whole balance grows.
    /// balance = (balance + contribution) * (1 + r)
    Reinvested,
    /// Only the initial amount compounds; contributions are added uncompounded.
    /// fv = initial * (1 + r)^n + contribution * n
    LumpSum,
}

impl CompoundingRegime {
    /// Reinvestment only applies when there is something to reinvest
    pub fn for_plan(plan: &ContributionPlan) -> Self {
        if plan.reinvest && plan.monthly_contribution > 0.0 {
            CompoundingRegime::Reinvested
        } else {
            CompoundingRegime::LumpSum
        }
    }
}

/// Projects a contribution plan against one protocol's yield
#[derive(Debug, Clone, Default)]
pub struct ProjectionCalculator {
    config: ProjectionConfig,
}

impl ProjectionCalculator {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run projection for a single protocol
    pub fn project(&self, spec: &ProtocolSpec, plan: &ContributionPlan) -> Result<ProjectionResult> {
        plan.validate()?;
        spec.validate()?;

        let monthly_rate = spec.monthly_rate();
        let regime = CompoundingRegime::for_plan(plan);

        let (future_value, trajectory) = match regime {
            CompoundingRegime::Reinvested => self.project_reinvested(plan, monthly_rate),
            CompoundingRegime::LumpSum => self.project_lump_sum(plan, monthly_rate),
        };

        debug!(
            "Projected {} over {} months ({:?}): future value {:.2}",
            spec.name, plan.horizon_months, regime, future_value
        );

        Ok(ProjectionResult::from_future_value(spec, plan, regime, future_value, trajectory))
    }

    fn project_reinvested(&self, plan: &ContributionPlan, monthly_rate: f64) -> (f64, Vec<MonthRow>) {
        let contribution = plan.monthly_contribution;
        let keep_rows = self.keeps_trajectory(plan);
        let mut trajectory = self.trajectory_buffer(plan);
        let mut balance = plan.initial_amount;

        for month in 1..=plan.horizon_months {
            let opening = balance;
            // Contribution precedes growth within the same month
            balance = (balance + contribution) * (1.0 + monthly_rate);

            if keep_rows {
                trajectory.push(MonthRow {
                    month,
                    opening_balance: opening,
                    contribution,
                    growth: balance - opening - contribution,
                    closing_balance: balance,
                    cumulative_contributed: plan.initial_amount + contribution * month as f64,
                });
            }
        }

        (balance, trajectory)
    }

    fn project_lump_sum(&self, plan: &ContributionPlan, monthly_rate: f64) -> (f64, Vec<MonthRow>) {
        let contribution = plan.monthly_contribution;
        let value_at = |month: u32| {
            plan.initial_amount * compound_factor(monthly_rate, month) + contribution * month as f64
        };

        let mut trajectory = self.trajectory_buffer(plan);
        if self.keeps_trajectory(plan) {
            let mut opening = plan.initial_amount;
            for month in 1..=plan.horizon_months {
                let closing = value_at(month);
                trajectory.push(MonthRow {
                    month,
                    opening_balance: opening,
                    contribution,
                    growth: closing - opening - contribution,
                    closing_balance: closing,
                    cumulative_contributed: plan.initial_amount + contribution * month as f64,
                });
                opening = closing;
            }
        }

        (value_at(plan.horizon_months), trajectory)
    }

    fn keeps_trajectory(&self, plan: &ContributionPlan) -> bool {
        self.config.detailed_output && plan.horizon_months <= MAX_TRAJECTORY_MONTHS
    }

    fn trajectory_buffer(&self, plan: &ContributionPlan) -> Vec<MonthRow> {
        if self.keeps_trajectory(plan) {
            Vec::with_capacity(plan.horizon_months as usize)
        } else {
            Vec::new()
        }
    }
}

/// (1 + r)^months, falling back to `powf` past the `i32` exponent range
pub(crate) fn compound_factor(monthly_rate: f64, months: u32) -> f64 {
    match i32::try_from(months) {
        Ok(n) => (1.0 + monthly_rate).powi(n),
        Err(_) => (1.0 + monthly_rate).powf(f64::from(months)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::protocol::{LiquidityTier, RiskTier};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn aave() -> ProtocolSpec {
        ProtocolSpec::new("Aave V3", 4.2, RiskTier::Low, LiquidityTier::High, "Lending").unwrap()
    }

    #[test]
    fn test_lump_sum_one_year() {
        let plan = ContributionPlan::new(10_000.0, 0.0, 12, false).unwrap();
        let result = ProjectionCalculator::default().project(&aave(), &plan).unwrap();

        assert_eq!(result.regime, CompoundingRegime::LumpSum);
        // 10000 * 1.0035^12
        assert_abs_diff_eq!(result.future_value, 10_428.18, epsilon = 0.01);
        assert_abs_diff_eq!(result.total_earnings, 428.18, epsilon = 0.01);
        assert_abs_diff_eq!(result.roi.unwrap(), 4.28, epsilon = 0.01);
        assert_abs_diff_eq!(result.monthly_earnings, 428.18 / 12.0, epsilon = 0.001);
    }

    #[test]
    fn test_reinvested_matches_manual_unrolling() {
        let plan = ContributionPlan::new(10_000.0, 100.0, 3, true).unwrap();
        let result = ProjectionCalculator::default().project(&aave(), &plan).unwrap();

        let mut expected = 10_000.0;
        expected = (expected + 100.0) * 1.0035;
        expected = (expected + 100.0) * 1.0035;
        expected = (expected + 100.0) * 1.0035;

        assert_eq!(result.regime, CompoundingRegime::Reinvested);
        assert_relative_eq!(result.future_value, expected, max_relative = 1e-12);
        assert_relative_eq!(result.future_value, 10_407.472_833_037_5, max_relative = 1e-9);
        assert_eq!(result.total_contributed, 10_300.0);
    }

    #[test]
    fn test_zero_contribution_ignores_reinvest_flag() {
        let spec = aave();
        let rate: f64 = 4.2 / 100.0 / 12.0;
        let expected = 10_000.0 * (1.0 + rate).powi(24);
        let calc = ProjectionCalculator::default();

        for reinvest in [true, false] {
            let plan = ContributionPlan::new(10_000.0, 0.0, 24, reinvest).unwrap();
            let result = calc.project(&spec, &plan).unwrap();
            assert_eq!(result.future_value, expected);
        }
    }

    #[test]
    fn test_reinvest_dominates_lump_sum() {
        let spec = aave();
        let calc = ProjectionCalculator::default();
        for months in [1, 6, 12, 36] {
            let reinvested = calc
                .project(&spec, &ContributionPlan::new(1_000.0, 50.0, months, true).unwrap())
                .unwrap();
            let lump = calc
                .project(&spec, &ContributionPlan::new(1_000.0, 50.0, months, false).unwrap())
                .unwrap();
            assert!(reinvested.future_value > lump.future_value, "months={}", months);
        }
    }

    #[test]
    fn test_lump_sum_contributions_earn_nothing() {
        let plan = ContributionPlan::new(0.0, 250.0, 12, false).unwrap();
        let result = ProjectionCalculator::default().project(&aave(), &plan).unwrap();
        assert_eq!(result.future_value, 3_000.0);
        assert_eq!(result.total_earnings, 0.0);
        assert_relative_eq!(result.roi.unwrap(), 0.0);
    }

    #[test]
    fn test_earnings_identity_and_trajectory() {
        let calc = ProjectionCalculator::default();
        let spec = aave();
        for reinvest in [true, false] {
            let plan = ContributionPlan::new(5_000.0, 75.0, 18, reinvest).unwrap();
            let result = calc.project(&spec, &plan).unwrap();

            assert_eq!(result.total_earnings, result.future_value - result.total_contributed);
            assert_eq!(result.trajectory.len(), 18);

            let last = result.trajectory.last().unwrap();
            assert_eq!(last.closing_balance, result.future_value);
            assert_relative_eq!(last.cumulative_contributed, result.total_contributed);

            for pair in result.trajectory.windows(2) {
                assert_eq!(pair[0].closing_balance, pair[1].opening_balance);
                assert!(pair[1].growth >= 0.0);
            }
        }
    }

    #[test]
    fn test_detailed_output_off() {
        let calc = ProjectionCalculator::new(ProjectionConfig { detailed_output: false });
        let plan = ContributionPlan::new(1_000.0, 10.0, 12, true).unwrap();
        let result = calc.project(&aave(), &plan).unwrap();
        assert!(result.trajectory.is_empty());
        assert!(result.future_value > result.total_contributed);
    }

    #[test]
    fn test_zero_yield() {
        let spec = ProtocolSpec::new("Cash", 0.0, RiskTier::Low, LiquidityTier::High, "Cash").unwrap();
        let plan = ContributionPlan::new(1_000.0, 100.0, 12, true).unwrap();
        let result = ProjectionCalculator::default().project(&spec, &plan).unwrap();
        assert_relative_eq!(result.future_value, 2_200.0);
        assert_abs_diff_eq!(result.total_earnings, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_horizon_past_trajectory_limit() {
        let plan = ContributionPlan {
            initial_amount: 1_000.0,
            monthly_contribution: 0.0,
            horizon_months: MAX_TRAJECTORY_MONTHS + 1,
            reinvest: false,
        };
        let result = ProjectionCalculator::default().project(&aave(), &plan).unwrap();

        let expected = 1_000.0 * (1.0 + aave().monthly_rate()).powi(1_201);
        assert_relative_eq!(result.future_value, expected, max_relative = 1e-12);
        assert_eq!(result.horizon_months, 1_201);
        assert!(result.trajectory.is_empty());

        let reinvested = ContributionPlan { monthly_contribution: 10.0, reinvest: true, ..plan };
        let result = ProjectionCalculator::default().project(&aave(), &reinvested).unwrap();
        assert!(result.future_value > expected);
        assert!(result.trajectory.is_empty());
    }

    #[test]
    fn test_trajectory_kept_at_limit() {
        let plan = ContributionPlan::new(100.0, 0.0, MAX_TRAJECTORY_MONTHS, false).unwrap();
        let result = ProjectionCalculator::default().project(&aave(), &plan).unwrap();
        assert_eq!(result.trajectory.len(), MAX_TRAJECTORY_MONTHS as usize);
    }

    #[test]
    fn test_compound_factor_beyond_i32() {
        let months = i32::MAX as u32 + 1;
        assert_relative_eq!(compound_factor(0.0, months), 1.0);
        assert_eq!(compound_factor(0.01, 12), (1.0 + 0.01_f64).powi(12));
    }

    #[test]
    fn test_invalid_plan_rejected() {
        let plan = ContributionPlan {
            initial_amount: -10.0,
            monthly_contribution: 0.0,
            horizon_months: 12,
            reinvest: false,
        };
        let err = ProjectionCalculator::default().project(&aave(), &plan).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { field: "initial_amount", .. }));

        let plan = ContributionPlan { horizon_months: 0, initial_amount: 10.0, ..plan };
        let err = ProjectionCalculator::default().project(&aave(), &plan).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { field: "horizon_months", .. }));
    }
}
