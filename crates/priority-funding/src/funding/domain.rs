use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier for a funding candidate, unique within a region set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub String);

impl RegionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The four scoring dimensions shared by regions and weight vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    LandDegradation,
    Wealth,
    PopulationTrend,
    Luminosity,
}

impl Indicator {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::LandDegradation,
            Self::Wealth,
            Self::PopulationTrend,
            Self::Luminosity,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LandDegradation => "Land Degradation",
            Self::Wealth => "Wealth",
            Self::PopulationTrend => "Population Trend",
            Self::Luminosity => "Luminosity",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::LandDegradation => "land_degradation",
            Self::Wealth => "wealth",
            Self::PopulationTrend => "population_trend",
            Self::Luminosity => "luminosity",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown indicator '{0}' (expected land_degradation, wealth, population_trend, or luminosity)")]
pub struct UnknownIndicator(pub String);

impl FromStr for Indicator {
    type Err = UnknownIndicator;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "land_degradation" | "ld" => Ok(Self::LandDegradation),
            "wealth" => Ok(Self::Wealth),
            "population_trend" | "pop" => Ok(Self::PopulationTrend),
            "luminosity" | "lum" => Ok(Self::Luminosity),
            _ => Err(UnknownIndicator(value.to_string())),
        }
    }
}

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Normalized indicator readings, conventionally in `[0, 1]` but never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorValues {
    pub land_degradation: f64,
    pub wealth: f64,
    pub population_trend: f64,
    pub luminosity: f64,
}

impl IndicatorValues {
    pub const fn new(
        land_degradation: f64,
        wealth: f64,
        population_trend: f64,
        luminosity: f64,
    ) -> Self {
        Self {
            land_degradation,
            wealth,
            population_trend,
            luminosity,
        }
    }

    pub const fn get(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::LandDegradation => self.land_degradation,
            Indicator::Wealth => self.wealth,
            Indicator::PopulationTrend => self.population_trend,
            Indicator::Luminosity => self.luminosity,
        }
    }
}

/// Display-only attributes carried through scoring untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_km2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
    /// Vegetation index shown alongside the economic-activity reading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndvi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub night_lights: Option<f64>,
}

/// A funding candidate. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RegionRecord")]
pub struct Region {
    id: RegionId,
    name: String,
    position: GeoPoint,
    indicators: IndicatorValues,
    details: RegionDetails,
}

impl Region {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: GeoPoint,
        indicators: IndicatorValues,
    ) -> Result<Self, RegionError> {
        let id = RegionId(id.into().trim().to_string());
        if id.0.is_empty() {
            return Err(RegionError::MissingId);
        }

        for indicator in Indicator::ordered() {
            let value = indicators.get(indicator);
            if !value.is_finite() {
                return Err(RegionError::NonFiniteIndicator {
                    region: id,
                    indicator,
                    value,
                });
            }
        }

        Ok(Self {
            id,
            name: name.into(),
            position,
            indicators,
            details: RegionDetails::default(),
        })
    }

    /// Constructor for compiled-in tables whose values are known to be finite.
    pub(crate) fn from_parts(
        id: &str,
        name: &str,
        position: GeoPoint,
        indicators: IndicatorValues,
        details: RegionDetails,
    ) -> Self {
        debug_assert!(Indicator::ordered()
            .into_iter()
            .all(|indicator| indicators.get(indicator).is_finite()));
        Self {
            id: RegionId::from(id),
            name: name.to_string(),
            position,
            indicators,
            details,
        }
    }

    pub fn with_details(mut self, details: RegionDetails) -> Self {
        self.details = details;
        self
    }

    pub fn id(&self) -> &RegionId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> GeoPoint {
        self.position
    }

    pub fn indicators(&self) -> &IndicatorValues {
        &self.indicators
    }

    pub fn indicator(&self, indicator: Indicator) -> f64 {
        self.indicators.get(indicator)
    }

    pub fn details(&self) -> &RegionDetails {
        &self.details
    }
}

#[derive(Debug, Deserialize)]
struct RegionRecord {
    id: String,
    name: String,
    position: GeoPoint,
    indicators: IndicatorValues,
    #[serde(default)]
    details: RegionDetails,
}

impl TryFrom<RegionRecord> for Region {
    type Error = RegionError;

    fn try_from(record: RegionRecord) -> Result<Self, Self::Error> {
        Ok(Region::new(record.id, record.name, record.position, record.indicators)?
            .with_details(record.details))
    }
}

/// Ordered regions with unique identifiers. Replaced wholesale, never edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegionSet {
    label: String,
    regions: Vec<Region>,
}

impl RegionSet {
    pub fn new(label: impl Into<String>, regions: Vec<Region>) -> Result<Self, RegionError> {
        let mut seen = std::collections::HashSet::with_capacity(regions.len());
        for region in &regions {
            if !seen.insert(region.id()) {
                return Err(RegionError::DuplicateRegionId(region.id().clone()));
            }
        }

        Ok(Self {
            label: label.into(),
            regions,
        })
    }

    pub fn empty(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            regions: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, id: &RegionId) -> Option<&Region> {
        self.regions.iter().find(|region| region.id() == id)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegionError {
    #[error("region id must not be blank")]
    MissingId,
    #[error("region {region} has a non-finite {indicator} value ({value})")]
    NonFiniteIndicator {
        region: RegionId,
        indicator: Indicator,
        value: f64,
    },
    #[error("region id {0} appears more than once in the region set")]
    DuplicateRegionId(RegionId),
}
