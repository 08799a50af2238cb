//! Risk-adjusted allocation targets and portfolio health score

use super::recommendation::{recommend, AllocationRecommendation};
use super::RiskProfile;
use crate::projection::{mean_yield, ProjectionResult};
use crate::protocol::RiskTier;
use log::debug;
use serde::{Deserialize, Serialize};

/// Lowest (and empty-portfolio) health score
pub const HEALTH_SCORE_FLOOR: u32 = 60;
pub const HEALTH_SCORE_CEILING: u32 = 100;

/// Thresholds for the recommendation rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Mean annual yield (percent) below which yield enhancement is suggested
    pub yield_enhancement_threshold: f64,

    /// Distinct categories needed before diversification stops being suggested
    pub min_distinct_categories: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            yield_enhancement_threshold: 5.0,
            min_distinct_categories: 3,
        }
    }
}

/// Current and suggested share of one protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationTarget {
    pub protocol_name: String,
    /// Share of total future value; None when the portfolio is worth nothing
    pub current_allocation_pct: Option<f64>,
    /// Tilted and clamped share; not normalised across protocols
    pub optimal_allocation_pct: Option<f64>,
    pub risk_tier: RiskTier,
    pub annual_yield: f64,
}

/// Everything the optimizer produces for one portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub risk_profile: RiskProfile,
    pub recommendations: Vec<AllocationRecommendation>,
    pub targets: Vec<AllocationTarget>,
    pub health_score: u32,
}

/// Maps projection results to recommendations and target allocations
#[derive(Debug, Clone, Default)]
pub struct AllocationOptimizer {
    config: OptimizerConfig,
}

impl AllocationOptimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Optimise a portfolio; an empty selection yields an empty report at the floor score
    pub fn optimize(&self, results: &[ProjectionResult], profile: RiskProfile) -> OptimizationReport {
        if results.is_empty() {
            return OptimizationReport {
                risk_profile: profile,
                recommendations: Vec::new(),
                targets: Vec::new(),
                health_score: HEALTH_SCORE_FLOOR,
            };
        }

        let recommendations = recommend(results, profile, &self.config);
        let targets = allocation_targets(results, profile);
        let low_risk = results.iter().filter(|r| r.risk_tier == RiskTier::Low).count();
        let health_score = health_score(results.len(), low_risk, profile);

        debug!(
            "Optimised {} protocols ({}): {} recommendations, health score {}",
            results.len(),
            profile,
            recommendations.len(),
            health_score
        );

        OptimizationReport {
            risk_profile: profile,
            recommendations,
            targets,
            health_score,
        }
    }
}

/// Current share of future value, tilted by risk profile and relative yield
pub fn allocation_targets(results: &[ProjectionResult], profile: RiskProfile) -> Vec<AllocationTarget> {
    let total_future_value: f64 = results.iter().map(|r| r.future_value).sum();
    let avg_yield = mean_yield(results).unwrap_or(0.0);

    results
        .iter()
        .map(|r| {
            let current = if total_future_value > 0.0 {
                Some(r.future_value / total_future_value * 100.0)
            } else {
                None
            };
            let optimal = current.map(|pct| {
                let tilted = pct * risk_tilt(profile, r.risk_tier) * yield_tilt(r.annual_yield, avg_yield);
                tilted.clamp(0.0, 100.0)
            });

            AllocationTarget {
                protocol_name: r.name.clone(),
                current_allocation_pct: current,
                optimal_allocation_pct: optimal,
                risk_tier: r.risk_tier,
                annual_yield: r.annual_yield,
            }
        })
        .collect()
}

/// Multiplier applied for the protocol's risk tier under a profile
pub fn risk_tilt(profile: RiskProfile, tier: RiskTier) -> f64 {
    match (profile, tier) {
        (RiskProfile::Conservative, RiskTier::Low) => 1.2,
        (RiskProfile::Conservative, RiskTier::High) => 0.7,
        (RiskProfile::Aggressive, RiskTier::High) => 1.3,
        (RiskProfile::Aggressive, RiskTier::Low) => 0.9,
        _ => 1.0,
    }
}

/// Multiplier for yielding above or below the portfolio mean
pub fn yield_tilt(annual_yield: f64, mean_yield: f64) -> f64 {
    if annual_yield > mean_yield {
        1.1
    } else if annual_yield < mean_yield {
        0.9
    } else {
        1.0
    }
}

/// Additive health heuristic, clamped to [60, 100]
pub fn health_score(protocol_count: usize, low_risk_count: usize, profile: RiskProfile) -> u32 {
    let count = u32::try_from(protocol_count).unwrap_or(u32::MAX);
    let low = u32::try_from(low_risk_count).unwrap_or(u32::MAX);

    let raw = HEALTH_SCORE_FLOOR
        .saturating_add(count.saturating_mul(5))
        .saturating_add(profile.risk_bonus())
        .saturating_add(low.saturating_mul(3));

    raw.clamp(HEALTH_SCORE_FLOOR, HEALTH_SCORE_CEILING)
}

/// Opt-in transform scaling optimal percentages to sum to 100
///
/// `AllocationOptimizer::optimize` never applies this. Targets without an
/// optimal percentage, or a set whose optimal percentages sum to zero, are
/// returned unchanged.
pub fn renormalize_targets(targets: &[AllocationTarget]) -> Vec<AllocationTarget> {
    let sum: f64 = targets.iter().filter_map(|t| t.optimal_allocation_pct).sum();
    if sum <= 0.0 {
        return targets.to_vec();
    }

    targets
        .iter()
        .map(|t| AllocationTarget {
            optimal_allocation_pct: t.optimal_allocation_pct.map(|pct| pct / sum * 100.0),
            ..t.clone()
        })
        .collect()
}
