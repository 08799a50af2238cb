//! Contribution plan input for a projection

use crate::error::{ensure_non_negative, EngineError, Result};
use serde::{Deserialize, Serialize};

/// Investment amounts and schedule for one projection request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributionPlan {
    /// Amount invested at month 0
    pub initial_amount: f64,

    /// Amount added every month
    pub monthly_contribution: f64,

    /// Projection length in whole months
    pub horizon_months: u32,

    /// Whether contributions compound (see `CompoundingRegime`)
    pub reinvest: bool,
}

impl ContributionPlan {
    /// Create a validated plan
    pub fn new(
        initial_amount: f64,
        monthly_contribution: f64,
        horizon_months: u32,
        reinvest: bool,
    ) -> Result<Self> {
        let plan = Self {
            initial_amount,
            monthly_contribution,
            horizon_months,
            reinvest,
        };
        plan.validate()?;
        Ok(plan)
    }

    /// Check amounts and horizon; fields are public so this runs again on use
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("initial_amount", self.initial_amount)?;
        ensure_non_negative("monthly_contribution", self.monthly_contribution)?;
        if self.horizon_months == 0 {
            return Err(EngineError::invalid_input("horizon_months", "must be at least 1 month"));
        }
        Ok(())
    }

    /// initial + monthly contribution x horizon
    pub fn total_contributed(&self) -> f64 {
        self.initial_amount + self.monthly_contribution * self.horizon_months as f64
    }

    /// Same plan over a different horizon
    pub fn with_horizon(&self, horizon_months: u32) -> Self {
        Self { horizon_months, ..*self }
    }
}
