//! Scenario runner composing projections and allocation
//!
//! Holds the catalog once, then evaluates any number of selections, plans
//! and risk profiles against it. Independent scenarios run in parallel.

use crate::allocation::{AllocationOptimizer, OptimizationReport, OptimizerConfig, RiskProfile};
use crate::error::Result;
use crate::projection::{
    growth_curve, ContributionPlan, GrowthPoint, PortfolioSummary, ProjectionCalculator,
    ProjectionConfig, ProjectionResult, STANDARD_TIMEFRAMES,
};
use crate::protocol::ProtocolCatalog;
use rayon::prelude::*;
use serde::Serialize;

/// Complete evaluation of one selection under one plan and profile
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioAnalysis {
    pub plan: ContributionPlan,
    pub results: Vec<ProjectionResult>,
    pub summary: PortfolioSummary,
    pub optimization: OptimizationReport,
    /// Initial amount compounded at the average yield; empty for an empty selection
    pub growth_curve: Vec<GrowthPoint>,
}

/// Pre-loaded scenario runner for batch evaluation
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(ProtocolCatalog::default_defi());
/// let plan = ContributionPlan::new(10_000.0, 100.0, 12, true)?;
/// let analysis = runner.analyze(&["Aave V3", "Curve Finance"], &plan, RiskProfile::Moderate)?;
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    catalog: ProtocolCatalog,
    calculator: ProjectionCalculator,
    optimizer: AllocationOptimizer,
}

impl ScenarioRunner {
    /// Create runner with default calculator and optimizer settings
    pub fn new(catalog: ProtocolCatalog) -> Self {
        Self::with_config(catalog, ProjectionConfig::default(), OptimizerConfig::default())
    }

    pub fn with_config(
        catalog: ProtocolCatalog,
        projection: ProjectionConfig,
        optimizer: OptimizerConfig,
    ) -> Self {
        Self {
            catalog,
            calculator: ProjectionCalculator::new(projection),
            optimizer: AllocationOptimizer::new(optimizer),
        }
    }

    pub fn catalog(&self) -> &ProtocolCatalog {
        &self.catalog
    }

    /// Project every selected protocol; unknown names are skipped
    pub fn run<S: AsRef<str>>(&self, names: &[S], plan: &ContributionPlan) -> Result<Vec<ProjectionResult>> {
        plan.validate()?;
        self.catalog
            .select(names)
            .into_iter()
            .map(|spec| self.calculator.project(spec, plan))
            .collect()
    }

    /// Project and optimise a selection
    pub fn analyze<S: AsRef<str>>(
        &self,
        names: &[S],
        plan: &ContributionPlan,
        profile: RiskProfile,
    ) -> Result<PortfolioAnalysis> {
        let results = self.run(names, plan)?;
        Ok(self.analyze_results(results, plan, profile))
    }

    /// Optimise already projected results
    pub fn analyze_results(
        &self,
        results: Vec<ProjectionResult>,
        plan: &ContributionPlan,
        profile: RiskProfile,
    ) -> PortfolioAnalysis {
        let summary = PortfolioSummary::from_results(&results, plan);
        let optimization = self.optimizer.optimize(&results, profile);
        let growth_curve = summary
            .average_yield
            .map(|avg| growth_curve(plan.initial_amount, avg, &STANDARD_TIMEFRAMES))
            .unwrap_or_default();

        PortfolioAnalysis {
            plan: *plan,
            results,
            summary,
            optimization,
            growth_curve,
        }
    }

    /// Run one selection under several plans in parallel
    pub fn run_scenarios<S: AsRef<str> + Sync>(
        &self,
        names: &[S],
        plans: &[ContributionPlan],
    ) -> Result<Vec<Vec<ProjectionResult>>> {
        plans.par_iter().map(|plan| self.run(names, plan)).collect()
    }

    /// Analyse one selection under each risk profile in parallel
    ///
    /// Projections do not depend on the profile, so they are computed once.
    pub fn analyze_profiles<S: AsRef<str>>(
        &self,
        names: &[S],
        plan: &ContributionPlan,
        profiles: &[RiskProfile],
    ) -> Result<Vec<PortfolioAnalysis>> {
        let results = self.run(names, plan)?;
        Ok(profiles
            .par_iter()
            .map(|&profile| self.analyze_results(results.clone(), plan, profile))
            .collect())
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new(ProtocolCatalog::default_defi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::RecommendationCategory;
    use crate::error::EngineError;
    use approx::assert_abs_diff_eq;

    fn plan() -> ContributionPlan {
        ContributionPlan::new(10_000.0, 0.0, 12, true).unwrap()
    }

    #[test]
    fn test_default_selection() {
        let runner = ScenarioRunner::default();
        let analysis = runner
            .analyze(&["Aave V3", "Compound V3"], &plan(), RiskProfile::Moderate)
            .unwrap();

        assert_eq!(analysis.results.len(), 2);
        assert_abs_diff_eq!(analysis.results[0].future_value, 10_428.18, epsilon = 0.01);
        assert_abs_diff_eq!(analysis.summary.average_yield.unwrap(), 4.0, epsilon = 1e-12);
        assert_eq!(analysis.growth_curve.len(), STANDARD_TIMEFRAMES.len());

        // Both Lending, mean yield 4.0
        let cats: Vec<_> = analysis.optimization.recommendations.iter().map(|r| r.category).collect();
        assert_eq!(
            cats,
            vec![RecommendationCategory::Diversification, RecommendationCategory::YieldEnhancement]
        );
        // 60 + 10 + 10 + 6
        assert_eq!(analysis.optimization.health_score, 86);
    }

    #[test]
    fn test_unknown_names_skipped() {
        let runner = ScenarioRunner::default();
        let results = runner.run(&["Aave V3", "Missing"], &plan()).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_empty_selection() {
        let runner = ScenarioRunner::default();
        let names: [&str; 0] = [];
        let analysis = runner.analyze(&names, &plan(), RiskProfile::Aggressive).unwrap();
        assert!(analysis.results.is_empty());
        assert!(analysis.growth_curve.is_empty());
        assert!(analysis.optimization.targets.is_empty());
        assert_eq!(analysis.optimization.health_score, 60);
    }

    #[test]
    fn test_invalid_plan_propagates() {
        let runner = ScenarioRunner::default();
        let bad = ContributionPlan {
            initial_amount: 100.0,
            monthly_contribution: -1.0,
            horizon_months: 12,
            reinvest: true,
        };
        assert!(matches!(
            runner.run(&["Aave V3"], &bad),
            Err(EngineError::InvalidInput { field: "monthly_contribution", .. })
        ));
    }

    #[test]
    fn test_run_scenarios_in_parallel() {
        let runner = ScenarioRunner::default();
        let plans: Vec<_> = STANDARD_TIMEFRAMES
            .iter()
            .map(|tf| plan().with_horizon(tf.months))
            .collect();

        let batches = runner.run_scenarios(&["Uniswap V3"], &plans).unwrap();
        assert_eq!(batches.len(), plans.len());

        // Longer horizons grow more
        for pair in batches.windows(2) {
            assert!(pair[1][0].future_value > pair[0][0].future_value);
        }
    }

    #[test]
    fn test_analyze_profiles() {
        let runner = ScenarioRunner::default();
        let names = ["Aave V3", "Uniswap V3", "Curve Finance"];
        let analyses = runner.analyze_profiles(&names, &plan(), &RiskProfile::ALL).unwrap();

        assert_eq!(analyses.len(), 3);
        for (analysis, profile) in analyses.iter().zip(RiskProfile::ALL) {
            assert_eq!(analysis.optimization.risk_profile, profile);
            assert_eq!(analysis.results, analyses[0].results);
        }
        assert!(analyses[0].optimization.health_score > analyses[2].optimization.health_score);
    }
}
