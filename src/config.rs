//! Analysis request configuration
//!
//! A request can come from JSON (every field optional), from environment
//! variables, or from CLI flags layered on top of either:
//!   YIELD_INITIAL_AMOUNT, YIELD_MONTHLY_CONTRIBUTION, YIELD_HORIZON_MONTHS,
//!   YIELD_REINVEST, YIELD_RISK_PROFILE, YIELD_PROTOCOLS (comma separated),
//!   YIELD_RENORMALIZE, YIELD_CATALOG_PATH

use crate::allocation::RiskProfile;
use crate::error::Result;
use crate::projection::ContributionPlan;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Input for one portfolio analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Initial investment (default: 10,000)
    #[serde(default = "default_initial_amount")]
    pub initial_amount: f64,

    /// Monthly contribution (default: 0)
    #[serde(default)]
    pub monthly_contribution: f64,

    /// Projection horizon in months (default: 12)
    #[serde(default = "default_horizon_months")]
    pub horizon_months: u32,

    /// Compound contributions (default: true)
    #[serde(default = "default_true")]
    pub reinvest: bool,

    /// Risk profile (default: moderate)
    #[serde(default)]
    pub risk_profile: RiskProfile,

    /// Protocol names to evaluate (default: Aave V3, Compound V3)
    #[serde(default = "default_protocols")]
    pub protocols: Vec<String>,

    /// Scale optimal allocations to sum to 100 (default: false)
    #[serde(default)]
    pub renormalize: bool,

    /// Optional CSV catalog replacing the built-in list
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

fn default_initial_amount() -> f64 { 10_000.0 }
fn default_horizon_months() -> u32 { 12 }
fn default_true() -> bool { true }
fn default_protocols() -> Vec<String> {
    vec!["Aave V3".to_string(), "Compound V3".to_string()]
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        Self {
            initial_amount: default_initial_amount(),
            monthly_contribution: 0.0,
            horizon_months: default_horizon_months(),
            reinvest: true,
            risk_profile: RiskProfile::default(),
            protocols: default_protocols(),
            renormalize: false,
            catalog_path: None,
        }
    }
}

impl AnalysisRequest {
    /// Read the request from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a request from any key lookup; unparsable values keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let protocols = lookup("YIELD_PROTOCOLS")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|names| !names.is_empty())
            .unwrap_or(defaults.protocols);

        Self {
            initial_amount: parse_var(&lookup, "YIELD_INITIAL_AMOUNT").unwrap_or(defaults.initial_amount),
            monthly_contribution: parse_var(&lookup, "YIELD_MONTHLY_CONTRIBUTION")
                .unwrap_or(defaults.monthly_contribution),
            horizon_months: parse_var(&lookup, "YIELD_HORIZON_MONTHS").unwrap_or(defaults.horizon_months),
            reinvest: parse_var(&lookup, "YIELD_REINVEST").unwrap_or(defaults.reinvest),
            risk_profile: parse_var(&lookup, "YIELD_RISK_PROFILE").unwrap_or(defaults.risk_profile),
            protocols,
            renormalize: parse_var(&lookup, "YIELD_RENORMALIZE").unwrap_or(defaults.renormalize),
            catalog_path: lookup("YIELD_CATALOG_PATH").map(PathBuf::from),
        }
    }

    /// Validated contribution plan for this request
    pub fn plan(&self) -> Result<ContributionPlan> {
        ContributionPlan::new(
            self.initial_amount,
            self.monthly_contribution,
            self.horizon_months,
            self.reinvest,
        )
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|s| s.trim().parse().ok())
}
