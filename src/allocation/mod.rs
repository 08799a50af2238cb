//! Allocation optimizer: recommendations, target percentages and health score

mod profile;
mod optimizer;
pub mod recommendation;

pub use profile::RiskProfile;
pub use optimizer::{
    AllocationOptimizer, OptimizerConfig, OptimizationReport, AllocationTarget,
    allocation_targets, health_score, renormalize_targets, risk_tilt, yield_tilt,
    HEALTH_SCORE_FLOOR, HEALTH_SCORE_CEILING,
};
pub use recommendation::{AllocationRecommendation, RecommendationCategory, recommend};
