use super::domain::{Indicator, Region};
use super::weights::WeightVector;
use serde::{Deserialize, Serialize};

/// Guard added to luminosity before it is used as a divisor.
pub const LUMINOSITY_EPSILON: f64 = 0.0001;

/// Composite priority score for one region.
///
/// Land degradation counts directly, wealth and population trend count
/// inverted, and luminosity divides its weight so that near-dark regions are
/// sharply amplified. The result is unclamped and unbounded above.
pub fn score(region: &Region, weights: &WeightVector) -> f64 {
    let values = region.indicators();
    weights.land_degradation * values.land_degradation
        + weights.wealth * (1.0 - values.wealth)
        + weights.population_trend * (1.0 - values.population_trend)
        + weights.luminosity / (values.luminosity + LUMINOSITY_EPSILON)
}

fn contribution(indicator: Indicator, raw: f64, weights: &WeightVector) -> f64 {
    let weight = weights.get(indicator);
    match indicator {
        Indicator::LandDegradation => weight * raw,
        Indicator::Wealth | Indicator::PopulationTrend => weight * (1.0 - raw),
        Indicator::Luminosity => weight / (raw + LUMINOSITY_EPSILON),
    }
}

/// A region paired with its derived priority score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRegion {
    pub region: Region,
    pub score: f64,
}

impl ScoredRegion {
    pub fn new(region: Region, weights: &WeightVector) -> Self {
        let score = score(&region, weights);
        Self { region, score }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("cannot score an empty region set")]
    EmptyRegionSet,
}

/// Score every region, preserving input order.
pub fn score_regions(
    regions: &[Region],
    weights: &WeightVector,
) -> Result<Vec<ScoredRegion>, ScoringError> {
    if regions.is_empty() {
        return Err(ScoringError::EmptyRegionSet);
    }

    Ok(regions
        .iter()
        .cloned()
        .map(|region| ScoredRegion::new(region, weights))
        .collect())
}

/// Per-indicator share of a score, for audit and detail views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub indicator: Indicator,
    pub weight: f64,
    pub raw_value: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub components: Vec<ScoreComponent>,
    pub total: f64,
}

pub fn explain(region: &Region, weights: &WeightVector) -> ScoreBreakdown {
    let components = Indicator::ordered()
        .into_iter()
        .map(|indicator| {
            let raw_value = region.indicator(indicator);
            ScoreComponent {
                indicator,
                weight: weights.get(indicator),
                raw_value,
                contribution: contribution(indicator, raw_value, weights),
            }
        })
        .collect();

    ScoreBreakdown {
        components,
        total: score(region, weights),
    }
}
