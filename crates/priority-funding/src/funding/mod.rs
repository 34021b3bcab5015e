//! Priority scoring, ranking, and funding allocation across regions.
//!
//! Weight edits flow into the [`WeightVectorManager`]; every scoring pass pulls
//! a fresh copy of the weights, scores the active [`RegionSet`], ranks the
//! result, and splits the funding pool in proportion to the scores.

pub mod allocation;
pub mod domain;
pub mod ranking;
pub mod router;
pub mod scoring;
pub mod service;
pub mod weights;

#[cfg(test)]
mod tests;

pub use allocation::{
    allocate, round_currency, validate_pool, AllocationError, DegenerateReason, FundingAllocation,
    FundingShare, MAX_FUNDING_POOL,
};
pub use domain::{
    GeoPoint, Indicator, IndicatorValues, Region, RegionDetails, RegionError, RegionId,
    RegionSet, UnknownIndicator,
};
pub use ranking::{rank, RankedRegion, RankedRegions};
pub use router::funding_router;
pub use scoring::{
    explain, score, score_regions, ScoreBreakdown, ScoreComponent, ScoredRegion, ScoringError,
    LUMINOSITY_EPSILON,
};
pub use service::{
    FundingError, FundingSnapshot, PriorityFundingService, RankedRegionView, RegionDetailView,
};
pub use weights::{InvalidWeightError, ScoringPolicy, WeightVector, WeightVectorManager};
