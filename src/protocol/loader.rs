//! Load a protocol catalog from CSV
//!
//! Expected headers: `Name,APY,Risk,Liquidity,Category`

use super::{ProtocolCatalog, ProtocolSpec};
use crate::error::Result;
use csv::Reader;
use std::path::Path;

/// Raw CSV row matching the catalog columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "APY")]
    apy: f64,
    #[serde(rename = "Risk")]
    risk: String,
    #[serde(rename = "Liquidity")]
    liquidity: String,
    #[serde(rename = "Category")]
    category: String,
}

impl CsvRow {
    fn into_spec(self) -> Result<ProtocolSpec> {
        ProtocolSpec::new(
            self.name.trim(),
            self.apy,
            self.risk.parse()?,
            self.liquidity.parse()?,
            self.category.trim(),
        )
    }
}

/// Load a catalog from a CSV file
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<ProtocolCatalog> {
    let reader = Reader::from_path(path)?;
    collect(reader)
}

/// Load a catalog from any reader (string buffer, request body)
pub fn load_catalog_from_reader<R: std::io::Read>(reader: R) -> Result<ProtocolCatalog> {
    collect(Reader::from_reader(reader))
}

fn collect<R: std::io::Read>(mut reader: Reader<R>) -> Result<ProtocolCatalog> {
    let mut protocols = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        protocols.push(row.into_spec()?);
    }
    log::debug!("Loaded {} protocols from CSV", protocols.len());
    ProtocolCatalog::new(protocols)
}
