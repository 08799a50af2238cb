//! Protocol reference data

use crate::error::{ensure_non_negative, EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Risk classification of a protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

/// Liquidity classification of a protocol (only used for catalog filtering)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum LiquidityTier {
    Low,
    Medium,
    High,
}

macro_rules! tier_labels {
    ($tier:ident) => {
        impl $tier {
            /// Lowercase label as used in catalog files
            pub fn as_str(&self) -> &'static str {
                match self {
                    $tier::Low => "low",
                    $tier::Medium => "medium",
                    $tier::High => "high",
                }
            }
        }

        impl fmt::Display for $tier {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $tier {
            type Err = EngineError;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim().to_ascii_lowercase().as_str() {
                    "low" => Ok($tier::Low),
                    "medium" => Ok($tier::Medium),
                    "high" => Ok($tier::High),
                    other => Err(EngineError::UnknownTier(other.to_string())),
                }
            }
        }

        impl TryFrom<String> for $tier {
            type Error = EngineError;

            fn try_from(s: String) -> Result<Self> {
                s.parse()
            }
        }
    };
}

tier_labels!(RiskTier);
tier_labels!(LiquidityTier);

/// A yield-bearing protocol from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolSpec {
    /// Unique protocol name
    pub name: String,

    /// Annual yield in percent (4.2 = 4.2%/year)
    pub annual_yield: f64,

    pub risk_tier: RiskTier,

    pub liquidity_tier: LiquidityTier,

    /// Free-text classification ("Lending", "DEX", ...)
    pub category: String,
}

impl ProtocolSpec {
    /// Create a validated protocol record
    pub fn new(
        name: impl Into<String>,
        annual_yield: f64,
        risk_tier: RiskTier,
        liquidity_tier: LiquidityTier,
        category: impl Into<String>,
    ) -> Result<Self> {
        let spec = Self {
            name: name.into(),
            annual_yield,
            risk_tier,
            liquidity_tier,
            category: category.into(),
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check the invariants a deserialized record may have skipped
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::invalid_input("name", "protocol name is empty"));
        }
        ensure_non_negative("annual_yield", self.annual_yield)
    }

    /// Monthly compounding rate derived from the annual percentage yield
    pub fn monthly_rate(&self) -> f64 {
        self.annual_yield / 100.0 / 12.0
    }
}
