use super::{CatalogError, CountrySummary, RegionSource};
use crate::funding::{GeoPoint, Region, RegionError, RegionSet};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
struct CountryEntry {
    center: Option<GeoPoint>,
    regions: Vec<Region>,
}

impl CountryEntry {
    fn resolved_center(&self) -> Option<GeoPoint> {
        if self.center.is_some() || self.regions.is_empty() {
            return self.center;
        }

        let count = self.regions.len() as f64;
        let (lat, lon) = self.regions.iter().fold((0.0, 0.0), |(lat, lon), region| {
            let position = region.position();
            (lat + position.latitude, lon + position.longitude)
        });
        Some(GeoPoint::new(lat / count, lon / count))
    }
}

/// Country-keyed region tables held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegionCatalog {
    countries: BTreeMap<String, CountryEntry>,
}

impl InMemoryRegionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a country, or move the map centre of an existing one.
    pub fn insert_country(&mut self, name: impl Into<String>, center: GeoPoint) {
        let name = name.into();
        let key = self.canonical_name(&name).unwrap_or(name);
        self.countries.entry(key).or_default().center = Some(center);
    }

    pub fn insert_region(
        &mut self,
        country: impl Into<String>,
        region: Region,
    ) -> Result<(), CatalogError> {
        let country = country.into();
        let key = self.canonical_name(&country).unwrap_or(country);
        let entry = self.countries.entry(key).or_default();

        if entry
            .regions
            .iter()
            .any(|existing| existing.id() == region.id())
        {
            return Err(RegionError::DuplicateRegionId(region.id().clone()).into());
        }

        entry.regions.push(region);
        Ok(())
    }

    pub(super) fn push_trusted(&mut self, country: &str, region: Region) {
        self.countries
            .entry(country.to_string())
            .or_default()
            .regions
            .push(region);
    }

    fn canonical_name(&self, country: &str) -> Option<String> {
        let wanted = country.trim();
        self.countries
            .keys()
            .find(|name| name.eq_ignore_ascii_case(wanted))
            .cloned()
    }

    fn entry(&self, country: &str) -> Option<(&String, &CountryEntry)> {
        let key = self.canonical_name(country)?;
        self.countries.get_key_value(&key)
    }
}

impl RegionSource for InMemoryRegionCatalog {
    fn countries(&self) -> Vec<CountrySummary> {
        self.countries
            .iter()
            .map(|(name, entry)| CountrySummary {
                name: name.clone(),
                center: entry.resolved_center(),
                region_count: entry.regions.len(),
            })
            .collect()
    }

    fn center(&self, country: &str) -> Option<GeoPoint> {
        self.entry(country)
            .and_then(|(_, entry)| entry.resolved_center())
    }

    fn regions(&self, country: &str) -> Result<RegionSet, CatalogError> {
        let (name, entry) = self
            .entry(country)
            .ok_or_else(|| CatalogError::UnknownCountry(country.trim().to_string()))?;
        Ok(RegionSet::new(name.clone(), entry.regions.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funding::IndicatorValues;

    fn region(id: &str, lat: f64, lon: f64) -> Region {
        Region::new(
            id,
            format!("Region {id}"),
            GeoPoint::new(lat, lon),
            IndicatorValues::new(0.5, 0.5, 0.5, 0.5),
        )
        .expect("valid region")
    }

    #[test]
    fn sample_catalog_lists_all_countries() {
        let catalog = InMemoryRegionCatalog::african_sample();
        let countries = catalog.countries();
        assert_eq!(countries.len(), 19);
        assert_eq!(countries[0].name, "Algeria");
        assert_eq!(countries[0].region_count, 3);
        assert!(countries.iter().all(|country| country.center.is_some()));

        let mali = catalog.regions("mali").expect("lookup is case-insensitive");
        assert_eq!(mali.label(), "Mali");
        assert!(mali.is_empty());
        assert_eq!(
            catalog.center("Mali"),
            Some(GeoPoint::new(17.5707, -3.9962))
        );
    }

    #[test]
    fn unknown_country_is_reported() {
        let catalog = InMemoryRegionCatalog::african_sample();
        assert_eq!(
            catalog.regions("Atlantis"),
            Err(CatalogError::UnknownCountry("Atlantis".to_string()))
        );
    }

    #[test]
    fn center_falls_back_to_region_centroid() {
        let mut catalog = InMemoryRegionCatalog::new();
        catalog
            .insert_region("Testland", region("a", 10.0, 20.0))
            .expect("insert a");
        catalog
            .insert_region("testland", region("b", 20.0, 40.0))
            .expect("insert b");

        assert_eq!(catalog.center("Testland"), Some(GeoPoint::new(15.0, 30.0)));
        assert_eq!(catalog.regions("Testland").expect("known").len(), 2);
    }

    #[test]
    fn duplicate_region_ids_are_rejected() {
        let mut catalog = InMemoryRegionCatalog::new();
        catalog
            .insert_region("Testland", region("a", 0.0, 0.0))
            .expect("first insert");
        assert!(matches!(
            catalog.insert_region("Testland", region("a", 1.0, 1.0)),
            Err(CatalogError::Region(RegionError::DuplicateRegionId(_)))
        ));
    }
}
