//! Projection output structures

use super::{CompoundingRegime, ContributionPlan};
use crate::protocol::{LiquidityTier, ProtocolSpec, RiskTier};
use serde::{Deserialize, Serialize};

/// Balance movement for one month of a projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthRow {
    /// Projection month (1-indexed)
    pub month: u32,
    pub opening_balance: f64,
    pub contribution: f64,
    /// Yield credited this month
    pub growth: f64,
    pub closing_balance: f64,
    /// initial amount + contributions to date
    pub cumulative_contributed: f64,
}

/// Projection of one protocol under one contribution plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    // Protocol echo
    pub name: String,
    pub annual_yield: f64,
    pub risk_tier: RiskTier,
    pub liquidity_tier: LiquidityTier,
    pub category: String,

    pub horizon_months: u32,
    pub regime: CompoundingRegime,

    // Outcome
    pub future_value: f64,
    pub total_contributed: f64,
    pub total_earnings: f64,
    pub monthly_earnings: f64,
    /// Earnings as a percentage of contributions; None when nothing was contributed
    pub roi: Option<f64>,

    /// Month-by-month balances (empty unless detailed output is on)
    pub trajectory: Vec<MonthRow>,
}

impl ProjectionResult {
    /// Derive every metric from the single projected future value
    pub fn from_future_value(
        spec: &ProtocolSpec,
        plan: &ContributionPlan,
        regime: CompoundingRegime,
        future_value: f64,
        trajectory: Vec<MonthRow>,
    ) -> Self {
        let total_contributed = plan.total_contributed();
        let total_earnings = future_value - total_contributed;
        let roi = if total_contributed > 0.0 {
            Some(total_earnings / total_contributed * 100.0)
        } else {
            None
        };

        Self {
            name: spec.name.clone(),
            annual_yield: spec.annual_yield,
            risk_tier: spec.risk_tier,
            liquidity_tier: spec.liquidity_tier,
            category: spec.category.clone(),
            horizon_months: plan.horizon_months,
            regime,
            future_value,
            total_contributed,
            total_earnings,
            monthly_earnings: total_earnings / plan.horizon_months as f64,
            roi,
            trajectory,
        }
    }
}

/// Totals across every projected protocol
///
/// Each protocol is projected with the full plan, so totals count the plan
/// once per protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub protocol_count: usize,
    pub total_future_value: f64,
    pub total_earnings: f64,
    pub total_contributed: f64,
    /// Mean annual yield; None for an empty selection
    pub average_yield: Option<f64>,
    /// Total earnings over the initial amount in percent; None when nothing was invested up front
    pub roi_on_initial: Option<f64>,
}

impl PortfolioSummary {
    pub fn from_results(results: &[ProjectionResult], plan: &ContributionPlan) -> Self {
        let total_future_value: f64 = results.iter().map(|r| r.future_value).sum();
        let total_earnings: f64 = results.iter().map(|r| r.total_earnings).sum();
        let total_contributed: f64 = results.iter().map(|r| r.total_contributed).sum();

        let average_yield = mean_yield(results);
        let roi_on_initial = if plan.initial_amount > 0.0 {
            Some(total_earnings / plan.initial_amount * 100.0)
        } else {
            None
        };

        Self {
            protocol_count: results.len(),
            total_future_value,
            total_earnings,
            total_contributed,
            average_yield,
            roi_on_initial,
        }
    }
}

/// Arithmetic mean of annual yields
pub fn mean_yield(results: &[ProjectionResult]) -> Option<f64> {
    if results.is_empty() {
        return None;
    }
    Some(results.iter().map(|r| r.annual_yield).sum::<f64>() / results.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn spec(name: &str, apy: f64) -> ProtocolSpec {
        ProtocolSpec::new(name, apy, RiskTier::Low, LiquidityTier::High, "Lending").unwrap()
    }

    #[test]
    fn test_derived_metrics() {
        let plan = ContributionPlan::new(1_000.0, 100.0, 10, false).unwrap();
        let result = ProjectionResult::from_future_value(
            &spec("A", 5.0),
            &plan,
            CompoundingRegime::LumpSum,
            2_200.0,
            Vec::new(),
        );

        assert_eq!(result.total_contributed, 2_000.0);
        assert_eq!(result.total_earnings, 200.0);
        assert_eq!(result.monthly_earnings, 20.0);
        assert_relative_eq!(result.roi.unwrap(), 10.0);
    }

    #[test]
    fn test_roi_sentinel_when_nothing_contributed() {
        let plan = ContributionPlan::new(0.0, 0.0, 6, true).unwrap();
        let result = ProjectionResult::from_future_value(
            &spec("A", 5.0),
            &plan,
            CompoundingRegime::LumpSum,
            0.0,
            Vec::new(),
        );
        assert_eq!(result.roi, None);
        assert_eq!(result.total_earnings, 0.0);
    }

    #[test]
    fn test_portfolio_summary() {
        let plan = ContributionPlan::new(1_000.0, 0.0, 12, false).unwrap();
        let results = vec![
            ProjectionResult::from_future_value(&spec("A", 4.0), &plan, CompoundingRegime::LumpSum, 1_040.0, Vec::new()),
            ProjectionResult::from_future_value(&spec("B", 6.0), &plan, CompoundingRegime::LumpSum, 1_060.0, Vec::new()),
        ];

        let summary = PortfolioSummary::from_results(&results, &plan);
        assert_eq!(summary.protocol_count, 2);
        assert_relative_eq!(summary.total_future_value, 2_100.0);
        assert_relative_eq!(summary.total_earnings, 100.0);
        assert_relative_eq!(summary.average_yield.unwrap(), 5.0);
        assert_relative_eq!(summary.roi_on_initial.unwrap(), 10.0);
    }

    #[test]
    fn test_empty_summary() {
        let plan = ContributionPlan::new(0.0, 10.0, 12, false).unwrap();
        let summary = PortfolioSummary::from_results(&[], &plan);
        assert_eq!(summary.protocol_count, 0);
        assert_eq!(summary.average_yield, None);
        assert_eq!(summary.roi_on_initial, None);
    }
}
