//! Yield Projection - compounding projections and risk-adjusted allocation
//!
//! This library provides:
//! - A protocol catalog (built-in or loaded from CSV) with risk-profile filtering
//! - Monthly-discrete growth projections with or without reinvested contributions
//! - Allocation recommendations, target percentages and a portfolio health score
//! - A scenario runner for batch and multi-profile evaluation

pub mod error;
pub mod protocol;
pub mod projection;
pub mod allocation;
pub mod scenario;
pub mod config;

// Re-export commonly used types
pub use error::{EngineError, Result};
pub use protocol::{ProtocolSpec, ProtocolCatalog, RiskTier, LiquidityTier};
pub use projection::{ContributionPlan, ProjectionCalculator, ProjectionConfig, ProjectionResult, PortfolioSummary};
pub use allocation::{AllocationOptimizer, AllocationRecommendation, AllocationTarget, OptimizationReport, RiskProfile};
pub use scenario::{PortfolioAnalysis, ScenarioRunner};
pub use config::AnalysisRequest;
