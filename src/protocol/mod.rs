//! Protocol reference data and catalog loading

mod data;
mod catalog;
pub mod loader;

pub use data::{ProtocolSpec, RiskTier, LiquidityTier};
pub use catalog::ProtocolCatalog;
pub use loader::{load_catalog, load_catalog_from_reader};
