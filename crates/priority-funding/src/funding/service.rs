use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::allocation::{allocate, validate_pool, AllocationError, FundingAllocation};
use super::domain::{GeoPoint, Indicator, IndicatorValues, RegionDetails, RegionId, RegionSet};
use super::ranking::{rank, RankedRegion, RankedRegions};
use super::scoring::{explain, score_regions, ScoreBreakdown, ScoringError};
use super::weights::{InvalidWeightError, ScoringPolicy, WeightVector, WeightVectorManager};
use crate::catalog::{CatalogError, CountrySummary, RegionSource};
use crate::config::FundingConfig;

/// Service composing the weight manager, the active region set, and the
/// configured funding pool.
///
/// Every computation pulls a fresh weight snapshot, so recomputing after an
/// edit is just another call to [`snapshot`](Self::snapshot).
pub struct PriorityFundingService<S> {
    source: Arc<S>,
    weights: WeightVectorManager,
    active: RwLock<Arc<RegionSet>>,
    total_pool: f64,
}

impl<S> PriorityFundingService<S>
where
    S: RegionSource + 'static,
{
    pub fn new(source: Arc<S>, config: &FundingConfig) -> Result<Self, FundingError> {
        validate_pool(config.total_pool)?;

        let initial = source.regions(&config.default_country)?;
        info!(
            country = initial.label(),
            regions = initial.len(),
            pool = config.total_pool,
            policy = %config.policy,
            "funding service initialised"
        );

        Ok(Self {
            source,
            weights: WeightVectorManager::new(config.policy),
            active: RwLock::new(Arc::new(initial)),
            total_pool: config.total_pool,
        })
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.weights.policy()
    }

    pub fn total_pool(&self) -> f64 {
        self.total_pool
    }

    pub fn weights(&self) -> WeightVector {
        self.weights.weights()
    }

    pub fn weight_revision(&self) -> u64 {
        self.weights.revision()
    }

    /// Current weights paired with their revision, read atomically.
    pub fn weight_snapshot(&self) -> (WeightVector, u64) {
        self.weights.snapshot()
    }

    pub fn set_weight(
        &self,
        indicator: Indicator,
        value: f64,
    ) -> Result<WeightVector, FundingError> {
        Ok(self.weights.set_weight(indicator, value)?)
    }

    pub fn reset_weights(&self) -> WeightVector {
        self.weights.reset()
    }

    pub fn region_set(&self) -> Arc<RegionSet> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn countries(&self) -> Vec<CountrySummary> {
        self.source.countries()
    }

    /// Swap the active region set for the named country's regions.
    pub fn select_country(&self, country: &str) -> Result<Arc<RegionSet>, FundingError> {
        let set = self.source.regions(country)?;
        Ok(self.replace_region_set(set))
    }

    /// Install an externally supplied region set, replacing the current one.
    pub fn replace_region_set(&self, set: RegionSet) -> Arc<RegionSet> {
        let set = Arc::new(set);
        info!(label = set.label(), regions = set.len(), "active region set replaced");
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = set.clone();
        set
    }

    /// Score, rank, and allocate the active region set under current weights.
    pub fn snapshot(&self) -> Result<FundingSnapshot, FundingError> {
        let (weights, weight_revision) = self.weights.snapshot();
        let set = self.region_set();

        let scored = score_regions(set.regions(), &weights)?;
        let allocation = allocate(&scored, self.total_pool, self.policy())?;
        let ranked = rank(scored);

        let regions = ranked
            .iter()
            .map(|entry| RankedRegionView::from_entry(entry, &allocation))
            .collect();

        debug!(
            label = set.label(),
            regions = ranked.len(),
            weight_revision,
            total_score = allocation.total_score,
            "funding snapshot computed"
        );

        Ok(FundingSnapshot {
            computed_at: Utc::now(),
            label: set.label().to_string(),
            center: self.source.center(set.label()),
            weights,
            weight_revision,
            policy: self.policy(),
            total_pool: self.total_pool,
            total_score: allocation.total_score,
            rounded_total: allocation.rounded_total(),
            regions,
            ranked,
            allocation,
        })
    }

    /// Detail panel data for one region of the active set.
    ///
    /// The score breakdown is always available; funding figures are omitted
    /// when the set as a whole cannot be allocated.
    pub fn region_detail(&self, id: &RegionId) -> Result<RegionDetailView, FundingError> {
        let set = self.region_set();
        let region = set
            .get(id)
            .ok_or_else(|| FundingError::RegionNotFound(id.clone()))?;
        let weights = self.weights.weights();
        let breakdown = explain(region, &weights);

        let (rank, funding, allocation_error) = match self.snapshot() {
            Ok(snapshot) => {
                let rank = snapshot.ranked.position(id);
                let funding = snapshot
                    .allocation
                    .share_for(id)
                    .map(|share| (share.amount, share.rounded_amount));
                (rank, funding, None)
            }
            Err(err) => (None, None, Some(err.to_string())),
        };

        Ok(RegionDetailView {
            id: region.id().clone(),
            name: region.name().to_string(),
            position: region.position(),
            indicators: *region.indicators(),
            details: region.details().clone(),
            score: breakdown.total,
            breakdown,
            rank,
            funding: funding.map(|(amount, _)| amount),
            funding_display: funding.map(|(_, rounded)| rounded),
            allocation_error,
        })
    }
}

/// Scored, ranked, and allocated view of the active region set.
#[derive(Debug, Clone, Serialize)]
pub struct FundingSnapshot {
    pub computed_at: DateTime<Utc>,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<GeoPoint>,
    pub weights: WeightVector,
    pub weight_revision: u64,
    pub policy: ScoringPolicy,
    pub total_pool: f64,
    pub total_score: f64,
    pub rounded_total: i64,
    pub regions: Vec<RankedRegionView>,
    #[serde(skip)]
    pub ranked: RankedRegions,
    #[serde(skip)]
    pub allocation: FundingAllocation,
}

/// One row of the ranked listing, as consumed by map and chart layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRegionView {
    pub rank: usize,
    pub id: RegionId,
    pub name: String,
    pub position: GeoPoint,
    pub indicators: IndicatorValues,
    pub details: RegionDetails,
    pub score: f64,
    pub funding: f64,
    pub funding_display: i64,
}

impl RankedRegionView {
    fn from_entry(entry: &RankedRegion, allocation: &FundingAllocation) -> Self {
        let region = &entry.scored.region;
        let (funding, funding_display) = allocation
            .share_for(region.id())
            .map(|share| (share.amount, share.rounded_amount))
            .unwrap_or_default();

        Self {
            rank: entry.rank,
            id: region.id().clone(),
            name: region.name().to_string(),
            position: region.position(),
            indicators: *region.indicators(),
            details: region.details().clone(),
            score: entry.scored.score,
            funding,
            funding_display,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionDetailView {
    pub id: RegionId,
    pub name: String,
    pub position: GeoPoint,
    pub indicators: IndicatorValues,
    pub details: RegionDetails,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_display: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocation_error: Option<String>,
}

/// Error raised by the funding service.
#[derive(Debug, thiserror::Error)]
pub enum FundingError {
    #[error(transparent)]
    Weight(#[from] InvalidWeightError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("region {0} is not part of the active region set")]
    RegionNotFound(RegionId),
}
