use super::memory::InMemoryRegionCatalog;
use super::CatalogError;
use crate::funding::{GeoPoint, IndicatorValues, Region, RegionDetails, RegionError};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug)]
pub enum RegionImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Region { line: u64, source: RegionError },
    Catalog(CatalogError),
}

impl std::fmt::Display for RegionImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionImportError::Io(err) => write!(f, "failed to read region file: {}", err),
            RegionImportError::Csv(err) => write!(f, "invalid region CSV data: {}", err),
            RegionImportError::Region { line, source } => {
                write!(f, "invalid region on line {}: {}", line, source)
            }
            RegionImportError::Catalog(err) => {
                write!(f, "could not add imported region to catalog: {}", err)
            }
        }
    }
}

impl std::error::Error for RegionImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegionImportError::Io(err) => Some(err),
            RegionImportError::Csv(err) => Some(err),
            RegionImportError::Region { source, .. } => Some(source),
            RegionImportError::Catalog(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RegionImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RegionImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<CatalogError> for RegionImportError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

/// A region read from CSV together with the country it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedRegion {
    pub country: String,
    pub region: Region,
}

/// Reads region tables exported as CSV.
///
/// Required columns: `id`, `name`, `latitude`, `longitude`,
/// `land_degradation`, `wealth`, `population_trend`, `luminosity`.
/// Optional columns: `country`, `area_km2`, `population`, `ndvi`,
/// `night_lights`.
pub struct CsvRegionImporter;

impl CsvRegionImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        default_country: &str,
    ) -> Result<Vec<ImportedRegion>, RegionImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, default_country)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        default_country: &str,
    ) -> Result<Vec<ImportedRegion>, RegionImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut imported = Vec::new();

        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map(|pos| pos.line()).unwrap_or_default();
            let row: RegionRow = record.deserialize(Some(&headers))?;
            let country = row
                .country
                .clone()
                .unwrap_or_else(|| default_country.to_string());
            let region = row
                .into_region()
                .map_err(|source| RegionImportError::Region { line, source })?;

            imported.push(ImportedRegion { country, region });
        }

        Ok(imported)
    }

    /// Import `path` and merge every row into `catalog`, returning the count.
    pub fn load_into<P: AsRef<Path>>(
        path: P,
        default_country: &str,
        catalog: &mut InMemoryRegionCatalog,
    ) -> Result<usize, RegionImportError> {
        let path = path.as_ref();
        let imported = Self::from_path(path, default_country)?;
        let count = imported.len();

        for ImportedRegion { country, region } in imported {
            catalog.insert_region(country, region)?;
        }

        info!(path = %path.display(), regions = count, "imported region table");
        Ok(count)
    }
}

#[derive(Debug, Deserialize)]
struct RegionRow {
    id: String,
    name: String,
    latitude: f64,
    longitude: f64,
    land_degradation: f64,
    wealth: f64,
    population_trend: f64,
    luminosity: f64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    country: Option<String>,
    #[serde(default)]
    area_km2: Option<f64>,
    #[serde(default)]
    population: Option<u64>,
    #[serde(default)]
    ndvi: Option<f64>,
    #[serde(default)]
    night_lights: Option<f64>,
}

impl RegionRow {
    fn into_region(self) -> Result<Region, RegionError> {
        let region = Region::new(
            self.id,
            self.name,
            GeoPoint::new(self.latitude, self.longitude),
            IndicatorValues::new(
                self.land_degradation,
                self.wealth,
                self.population_trend,
                self.luminosity,
            ),
        )?;

        Ok(region.with_details(RegionDetails {
            area_km2: self.area_km2,
            population: self.population,
            ndvi: self.ndvi,
            night_lights: self.night_lights,
        }))
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
