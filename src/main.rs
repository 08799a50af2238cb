//! Yield Projection CLI
//!
//! Projects the selected protocols and prints the recommended allocation.
//! Flags override the YIELD_* environment variables read by `AnalysisRequest`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use yield_projection::allocation::renormalize_targets;
use yield_projection::protocol::load_catalog;
use yield_projection::{AnalysisRequest, PortfolioAnalysis, ProtocolCatalog, RiskProfile, ScenarioRunner};

#[derive(Parser, Debug)]
#[command(name = "yield_projection", version, about = "Project protocol yields and recommend a risk-adjusted allocation")]
struct Cli {
    /// Initial investment
    #[arg(long)]
    investment: Option<f64>,

    /// Monthly contribution
    #[arg(long)]
    monthly: Option<f64>,

    /// Projection horizon in months
    #[arg(long)]
    months: Option<u32>,

    /// Add contributions without compounding them
    #[arg(long)]
    no_reinvest: bool,

    /// conservative, moderate or aggressive
    #[arg(long)]
    risk: Option<RiskProfile>,

    /// Protocol to include (repeatable)
    #[arg(long = "protocol", short = 'p')]
    protocols: Vec<String>,

    /// CSV catalog (Name,APY,Risk,Liquidity,Category)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Scale optimal allocations to sum to 100
    #[arg(long)]
    renormalize: bool,

    /// Print protocols available for the risk profile and exit
    #[arg(long)]
    list: bool,

    /// Emit JSON instead of tables
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn apply(&self, mut request: AnalysisRequest) -> AnalysisRequest {
        if let Some(amount) = self.investment {
            request.initial_amount = amount;
        }
        if let Some(monthly) = self.monthly {
            request.monthly_contribution = monthly;
        }
        if let Some(months) = self.months {
            request.horizon_months = months;
        }
        if self.no_reinvest {
            request.reinvest = false;
        }
        if let Some(risk) = self.risk {
            request.risk_profile = risk;
        }
        if !self.protocols.is_empty() {
            request.protocols = self.protocols.clone();
        }
        if self.catalog.is_some() {
            request.catalog_path = self.catalog.clone();
        }
        request.renormalize |= self.renormalize;
        request
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    request: &'a AnalysisRequest,
    analysis: &'a PortfolioAnalysis,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let request = cli.apply(AnalysisRequest::from_env());

    let catalog = match &request.catalog_path {
        Some(path) => load_catalog(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => ProtocolCatalog::default_defi(),
    };

    if cli.list {
        print_catalog(&catalog, request.risk_profile);
        return Ok(());
    }

    let plan = request.plan().context("Invalid contribution plan")?;
    let runner = ScenarioRunner::new(catalog);
    let mut analysis = runner.analyze(request.protocols.as_slice(), &plan, request.risk_profile)?;
    if request.renormalize {
        analysis.optimization.targets = renormalize_targets(&analysis.optimization.targets);
    }

    if cli.json {
        let report = JsonReport {
            generated_at: Utc::now(),
            request: &request,
            analysis: &analysis,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_analysis(&analysis);
    }

    Ok(())
}

fn print_catalog(catalog: &ProtocolCatalog, profile: RiskProfile) {
    println!("Protocols for a {} investor:", profile);
    println!("{:<18} {:>7} {:>7} {:>10}  {}", "Protocol", "APY", "Risk", "Liquidity", "Category");
    println!("{}", "-".repeat(64));
    for p in catalog.filter_for(profile) {
        println!(
            "{:<18} {:>6.1}% {:>7} {:>10}  {}",
            p.name, p.annual_yield, p.risk_tier, p.liquidity_tier, p.category
        );
    }
}

fn print_analysis(analysis: &PortfolioAnalysis) {
    let plan = &analysis.plan;
    println!("Yield Projection");
    println!("================\n");
    println!(
        "Initial: ${:.2}  Monthly: ${:.2}  Horizon: {} months  Reinvest: {}",
        plan.initial_amount, plan.monthly_contribution, plan.horizon_months, plan.reinvest
    );
    println!("Risk profile: {}\n", analysis.optimization.risk_profile);

    if analysis.results.is_empty() {
        println!("No protocols selected.");
        return;
    }

    println!(
        "{:<18} {:>6} {:>7} {:<18} {:>14} {:>12} {:>8}",
        "Protocol", "APY", "Risk", "Category", "Future Value", "Earnings", "ROI"
    );
    println!("{}", "-".repeat(90));
    for r in &analysis.results {
        let roi = r.roi.map(|v| format!("{:.1}%", v)).unwrap_or_else(|| "n/a".to_string());
        println!(
            "{:<18} {:>5.1}% {:>7} {:<18} {:>14.2} {:>12.2} {:>8}",
            r.name, r.annual_yield, r.risk_tier, r.category, r.future_value, r.total_earnings, roi
        );
    }

    let summary = &analysis.summary;
    println!("\nSummary:");
    println!("  Total Future Value: ${:.2}", summary.total_future_value);
    println!("  Total Earnings: ${:.2}", summary.total_earnings);
    if let Some(avg) = summary.average_yield {
        println!("  Average APY: {:.1}%", avg);
    }
    if let Some(roi) = summary.roi_on_initial {
        println!("  Total ROI: {:.1}%", roi);
    }

    println!("\nGrowth at average APY:");
    for point in &analysis.growth_curve {
        println!("  {:<9} {:>14.2} (+{:.2})", point.label, point.value, point.earnings);
    }

    let optimization = &analysis.optimization;
    if !optimization.recommendations.is_empty() {
        println!("\nRecommendations:");
        for rec in &optimization.recommendations {
            println!("  [{}] {}", rec.category.label(), rec.title);
            println!("      {}", rec.description);
            println!("      -> {}", rec.action_text);
        }
    }

    println!("\nAllocation:");
    println!("  {:<18} {:>9} {:>9} {:>7}", "Protocol", "Current", "Optimal", "Risk");
    for t in &optimization.targets {
        let pct = |v: Option<f64>| v.map(|p| format!("{:.1}%", p)).unwrap_or_else(|| "n/a".to_string());
        println!(
            "  {:<18} {:>9} {:>9} {:>7}",
            t.protocol_name,
            pct(t.current_allocation_pct),
            pct(t.optimal_allocation_pct),
            t.risk_tier
        );
    }

    println!("\nPortfolio Health Score: {}%", optimization.health_score);
}
