//! Evaluate a selection across every standard timeframe and risk profile
//!
//! Reads the selection and plan from the YIELD_* environment variables and
//! writes one row per (timeframe, profile, protocol) to scenario_grid_output.csv

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;
use yield_projection::projection::STANDARD_TIMEFRAMES;
use yield_projection::protocol::load_catalog;
use yield_projection::{AnalysisRequest, PortfolioAnalysis, ProtocolCatalog, RiskProfile, ScenarioRunner};

#[derive(Debug, Serialize)]
struct GridRow<'a> {
    months: u32,
    timeframe: &'a str,
    risk_profile: RiskProfile,
    protocol: &'a str,
    annual_yield: f64,
    future_value: f64,
    total_earnings: f64,
    roi_pct: Option<f64>,
    current_allocation_pct: Option<f64>,
    optimal_allocation_pct: Option<f64>,
    health_score: u32,
}

fn main() -> Result<()> {
    env_logger::init();

    let start = Instant::now();
    let request = AnalysisRequest::from_env();
    let catalog = match &request.catalog_path {
        Some(path) => load_catalog(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => ProtocolCatalog::default_defi(),
    };
    let base_plan = request.plan().context("Invalid contribution plan")?;
    let runner = ScenarioRunner::new(catalog);

    println!(
        "Evaluating {} protocols over {} timeframes x {} profiles...",
        request.protocols.len(),
        STANDARD_TIMEFRAMES.len(),
        RiskProfile::ALL.len()
    );

    // (timeframe label, analyses per profile)
    let grid: Vec<(&str, Vec<PortfolioAnalysis>)> = STANDARD_TIMEFRAMES
        .par_iter()
        .map(|tf| {
            let plan = base_plan.with_horizon(tf.months);
            runner
                .analyze_profiles(request.protocols.as_slice(), &plan, &RiskProfile::ALL)
                .map(|analyses| (tf.label, analyses))
        })
        .collect::<yield_projection::Result<_>>()?;

    println!("Projections complete in {:?}", start.elapsed());

    let output_path = "scenario_grid_output.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("Failed to create {}", output_path))?;

    let mut rows = 0usize;
    for (label, analyses) in &grid {
        for analysis in analyses {
            let optimization = &analysis.optimization;
            for (result, target) in analysis.results.iter().zip(&optimization.targets) {
                writer.serialize(GridRow {
                    months: result.horizon_months,
                    timeframe: label,
                    risk_profile: optimization.risk_profile,
                    protocol: &result.name,
                    annual_yield: result.annual_yield,
                    future_value: result.future_value,
                    total_earnings: result.total_earnings,
                    roi_pct: result.roi,
                    current_allocation_pct: target.current_allocation_pct,
                    optimal_allocation_pct: target.optimal_allocation_pct,
                    health_score: optimization.health_score,
                })?;
                rows += 1;
            }
        }
    }
    writer.flush()?;

    println!("{} rows written to {}", rows, output_path);
    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
