use super::memory::InMemoryRegionCatalog;
use crate::funding::{GeoPoint, IndicatorValues, Region, RegionDetails};

const COUNTRY_CENTERS: [(&str, f64, f64); 19] = [
    ("Algeria", 28.0339, 1.6596),
    ("Angola", -11.2027, 17.8739),
    ("Benin", 9.3077, 2.3158),
    ("Botswana", -22.3285, 24.6849),
    ("Burkina Faso", 12.2383, -1.5616),
    ("Burundi", -3.3731, 29.9189),
    ("Cameroon", 3.848, 11.5021),
    ("Chad", 15.4542, 18.7322),
    ("Democratic Republic of the Congo", -4.0383, 21.7587),
    ("Egypt", 26.8206, 30.8025),
    ("Ethiopia", 9.145, 40.4897),
    ("Ghana", 7.9465, -1.0232),
    ("Kenya", -1.2921, 36.8219),
    ("Madagascar", -18.7669, 46.8691),
    ("Malawi", -13.2543, 34.3015),
    ("Mali", 17.5707, -3.9962),
    ("Morocco", 31.7917, -7.0926),
    ("Mozambique", -18.6657, 35.5296),
    ("Namibia", -22.9576, 18.4904),
];

struct SampleCity {
    id: &'static str,
    name: &'static str,
    position: GeoPoint,
    indicators: IndicatorValues,
    ndvi: f64,
    night_lights: f64,
}

const ALGERIA_CITIES: [SampleCity; 3] = [
    SampleCity {
        id: "1",
        name: "Algiers",
        position: GeoPoint::new(36.7538, 3.0588),
        indicators: IndicatorValues::new(0.7, 0.3, 0.5, 0.2),
        ndvi: 0.6,
        night_lights: 0.4,
    },
    SampleCity {
        id: "2",
        name: "Oran",
        position: GeoPoint::new(35.6969, -0.6331),
        indicators: IndicatorValues::new(0.6, 0.4, 0.4, 0.3),
        ndvi: 0.7,
        night_lights: 0.5,
    },
    SampleCity {
        id: "3",
        name: "Constantine",
        position: GeoPoint::new(36.3650, 6.6147),
        indicators: IndicatorValues::new(0.8, 0.2, 0.6, 0.5),
        ndvi: 0.5,
        night_lights: 0.6,
    },
];

impl InMemoryRegionCatalog {
    /// Sample table of African countries. Only Algeria carries city-level
    /// indicator data; the other countries yield empty region sets.
    pub fn african_sample() -> Self {
        let mut catalog = Self::new();
        for (name, latitude, longitude) in COUNTRY_CENTERS {
            catalog.insert_country(name, GeoPoint::new(latitude, longitude));
        }

        for city in &ALGERIA_CITIES {
            let region = Region::from_parts(
                city.id,
                city.name,
                city.position,
                city.indicators,
                RegionDetails {
                    ndvi: Some(city.ndvi),
                    night_lights: Some(city.night_lights),
                    ..RegionDetails::default()
                },
            );
            catalog.push_trusted("Algeria", region);
        }

        catalog
    }
}
