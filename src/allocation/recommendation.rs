//! Qualitative portfolio recommendations

use super::{OptimizerConfig, RiskProfile};
use crate::projection::{mean_yield, ProjectionResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Share of the portfolio conservative investors should hold in low-risk protocols
pub const CONSERVATIVE_LOW_RISK_TARGET_PCT: f64 = 70.0;

/// Cap on high-yield exposure suggested to aggressive investors
pub const AGGRESSIVE_HIGH_YIELD_CAP_PCT: f64 = 40.0;

/// Recommendation taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendationCategory {
    #[serde(rename = "Risk Management")]
    RiskManagement,
    #[serde(rename = "Yield Optimization")]
    YieldOptimization,
    Diversification,
    #[serde(rename = "Yield Enhancement")]
    YieldEnhancement,
}

impl RecommendationCategory {
    pub fn label(&self) -> &'static str {
        match self {
            RecommendationCategory::RiskManagement => "Risk Management",
            RecommendationCategory::YieldOptimization => "Yield Optimization",
            RecommendationCategory::Diversification => "Diversification",
            RecommendationCategory::YieldEnhancement => "Yield Enhancement",
        }
    }

    /// Display colour hint
    pub fn severity_color(&self) -> &'static str {
        match self {
            RecommendationCategory::RiskManagement => "green",
            RecommendationCategory::YieldOptimization => "yellow",
            RecommendationCategory::Diversification => "blue",
            RecommendationCategory::YieldEnhancement => "purple",
        }
    }
}

/// Advisory produced for a portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecommendation {
    pub category: RecommendationCategory,
    pub title: String,
    pub description: String,
    pub action_text: String,
    pub severity_color: String,
}

impl AllocationRecommendation {
    fn new(category: RecommendationCategory, title: &str, description: &str, action_text: String) -> Self {
        Self {
            category,
            title: title.to_string(),
            description: description.to_string(),
            action_text,
            severity_color: category.severity_color().to_string(),
        }
    }
}

/// Evaluate the recommendation rules in display order
///
/// 1. conservative: risk management; else aggressive: yield optimization
/// 2. fewer distinct categories than configured: diversification
/// 3. mean yield under the threshold: yield enhancement
pub fn recommend(
    results: &[ProjectionResult],
    profile: RiskProfile,
    config: &OptimizerConfig,
) -> Vec<AllocationRecommendation> {
    let mut recommendations = Vec::new();
    if results.is_empty() {
        return recommendations;
    }

    match profile {
        RiskProfile::Conservative => recommendations.push(AllocationRecommendation::new(
            RecommendationCategory::RiskManagement,
            "Increase Low-Risk Protocols",
            "Consider allocating more to established low-risk lending protocols for stability",
            format!("Target {:.0}% in low-risk protocols", CONSERVATIVE_LOW_RISK_TARGET_PCT),
        )),
        RiskProfile::Aggressive => recommendations.push(AllocationRecommendation::new(
            RecommendationCategory::YieldOptimization,
            "High-Yield Opportunities",
            "Consider high-yield protocols for maximum returns",
            format!("Allocate up to {:.0}% in high-yield protocols", AGGRESSIVE_HIGH_YIELD_CAP_PCT),
        )),
        RiskProfile::Moderate => {}
    }

    let categories: HashSet<&str> = results.iter().map(|r| r.category.as_str()).collect();
    if categories.len() < config.min_distinct_categories {
        recommendations.push(AllocationRecommendation::new(
            RecommendationCategory::Diversification,
            "Increase Category Diversity",
            "Spread investments across different protocol categories",
            "Add protocols from missing categories".to_string(),
        ));
    }

    if mean_yield(results).is_some_and(|avg| avg < config.yield_enhancement_threshold) {
        recommendations.push(AllocationRecommendation::new(
            RecommendationCategory::YieldEnhancement,
            "Optimize for Higher Yields",
            "Current portfolio yield is below market average",
            "Consider higher-yield protocols within risk tolerance".to_string(),
        ));
    }

    recommendations
}
