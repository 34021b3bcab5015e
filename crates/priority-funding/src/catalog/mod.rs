//! Region data sources feeding the funding engine.
//!
//! Region tables are fixture data: the engine only sees [`RegionSet`]s handed
//! out by a [`RegionSource`], whether the regions came from the bundled sample
//! or a CSV export.

mod importer;
mod memory;
mod sample;

pub use importer::{CsvRegionImporter, ImportedRegion, RegionImportError};
pub use memory::InMemoryRegionCatalog;

use crate::funding::{GeoPoint, RegionError, RegionSet};
use serde::Serialize;

/// Lookup abstraction so the service can be exercised against any data set.
pub trait RegionSource: Send + Sync {
    fn countries(&self) -> Vec<CountrySummary>;
    fn center(&self, country: &str) -> Option<GeoPoint>;
    fn regions(&self, country: &str) -> Result<RegionSet, CatalogError>;
}

/// Country entry as shown in a selector, with the map centre to pan to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<GeoPoint>,
    pub region_count: usize,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown country '{0}'")]
    UnknownCountry(String),
    #[error(transparent)]
    Region(#[from] RegionError),
}
