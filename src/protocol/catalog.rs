//! Immutable protocol catalog

use super::{LiquidityTier, ProtocolSpec, RiskTier};
use crate::allocation::RiskProfile;
use crate::error::{EngineError, Result};
use log::warn;
use std::collections::HashSet;

/// Ordered, name-unique collection of protocols
///
/// Built once and only read afterwards, so it can be shared across threads
/// by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolCatalog {
    protocols: Vec<ProtocolSpec>,
}

impl ProtocolCatalog {
    /// Build a catalog, validating every entry and rejecting duplicate names
    pub fn new(protocols: Vec<ProtocolSpec>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(protocols.len());
        for spec in &protocols {
            spec.validate()?;
            if !seen.insert(spec.name.as_str()) {
                return Err(EngineError::DuplicateProtocol(spec.name.clone()));
            }
        }
        Ok(Self { protocols })
    }

    /// The built-in DeFi protocol list
    pub fn default_defi() -> Self {
        use LiquidityTier as L;
        use RiskTier as R;

        let entry = |name: &str, apy: f64, risk: R, liquidity: L, category: &str| ProtocolSpec {
            name: name.to_string(),
            annual_yield: apy,
            risk_tier: risk,
            liquidity_tier: liquidity,
            category: category.to_string(),
        };

        Self {
            protocols: vec![
                entry("Aave V3", 4.2, R::Low, L::High, "Lending"),
                entry("Compound V3", 3.8, R::Low, L::High, "Lending"),
                entry("Yearn Finance", 7.2, R::Medium, L::Medium, "Yield Aggregator"),
                entry("Lido Finance", 3.5, R::Low, L::High, "Staking"),
                entry("Curve Finance", 5.8, R::Medium, L::High, "DEX"),
                entry("Convex Finance", 6.1, R::Medium, L::Medium, "Yield Optimizer"),
                entry("Uniswap V3", 8.5, R::High, L::High, "DEX"),
                entry("Balancer", 6.8, R::Medium, L::High, "DEX"),
                entry("Synthetix", 9.2, R::High, L::Medium, "Synthetic Assets"),
                entry("MakerDAO", 2.8, R::Low, L::High, "Lending"),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&ProtocolSpec> {
        self.protocols.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProtocolSpec> {
        self.protocols.iter()
    }

    pub fn len(&self) -> usize {
        self.protocols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.protocols.iter().map(|p| p.name.as_str()).collect()
    }

    /// Protocols offered to an investor with the given profile
    ///
    /// Conservative: low risk with high liquidity. Moderate: anything but high
    /// risk. Aggressive: the whole catalog.
    pub fn filter_for(&self, profile: RiskProfile) -> Vec<&ProtocolSpec> {
        self.protocols
            .iter()
            .filter(|p| match profile {
                RiskProfile::Conservative => {
                    p.risk_tier == RiskTier::Low && p.liquidity_tier == LiquidityTier::High
                }
                RiskProfile::Moderate => p.risk_tier != RiskTier::High,
                RiskProfile::Aggressive => true,
            })
            .collect()
    }

    /// Resolve a selection in caller order, skipping names the catalog lacks
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Vec<&ProtocolSpec> {
        names
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                let found = self.get(name);
                if found.is_none() {
                    warn!("Skipping unknown protocol '{}'", name);
                }
                found
            })
            .collect()
    }

    /// Resolve a selection, failing on the first unknown name
    pub fn select_strict<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&ProtocolSpec>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.get(name)
                    .ok_or_else(|| EngineError::UnknownProtocol(name.to_string()))
            })
            .collect()
    }
}

impl Default for ProtocolCatalog {
    fn default() -> Self {
        Self::default_defi()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = ProtocolCatalog::default_defi();
        assert_eq!(catalog.len(), 10);
        assert!(ProtocolCatalog::new(catalog.iter().cloned().collect()).is_ok());

        let aave = catalog.get("Aave V3").unwrap();
        assert_eq!(aave.annual_yield, 4.2);
        assert_eq!(aave.risk_tier, RiskTier::Low);
        assert_eq!(aave.category, "Lending");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let aave = ProtocolCatalog::default_defi().get("Aave V3").cloned().unwrap();
        let err = ProtocolCatalog::new(vec![aave.clone(), aave]).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateProtocol(name) if name == "Aave V3"));
    }

    #[test]
    fn test_filter_for_profiles() {
        let catalog = ProtocolCatalog::default_defi();

        let conservative = catalog.filter_for(RiskProfile::Conservative);
        assert_eq!(conservative.len(), 4);
        assert!(conservative
            .iter()
            .all(|p| p.risk_tier == RiskTier::Low && p.liquidity_tier == LiquidityTier::High));

        let moderate = catalog.filter_for(RiskProfile::Moderate);
        assert_eq!(moderate.len(), 8);
        assert!(moderate.iter().all(|p| p.risk_tier != RiskTier::High));

        assert_eq!(catalog.filter_for(RiskProfile::Aggressive).len(), 10);
    }

    #[test]
    fn test_select_keeps_order_and_skips_unknown() {
        let catalog = ProtocolCatalog::default_defi();
        let picked = catalog.select(&["Synthetix", "Nope", "Aave V3"]);
        let names: Vec<_> = picked.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Synthetix", "Aave V3"]);

        let err = catalog.select_strict(&["Aave V3", "Nope"]).unwrap_err();
        assert!(matches!(err, EngineError::UnknownProtocol(name) if name == "Nope"));
    }
}
