//! Compounding projections for individual protocols

mod plan;
mod calculator;
mod result;
mod growth;

pub use plan::ContributionPlan;
pub use calculator::{ProjectionCalculator, ProjectionConfig, CompoundingRegime, MAX_TRAJECTORY_MONTHS};
pub use result::{MonthRow, ProjectionResult, PortfolioSummary, mean_yield};
pub use growth::{growth_curve, GrowthPoint, Timeframe, STANDARD_TIMEFRAMES};
