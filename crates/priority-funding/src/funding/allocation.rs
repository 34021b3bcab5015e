use super::domain::RegionId;
use super::scoring::ScoredRegion;
use super::weights::ScoringPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Largest accepted pool: 2^53, the last point where every whole currency
/// unit is representable and rounded totals fit an `i64`.
pub const MAX_FUNDING_POOL: f64 = 9_007_199_254_740_992.0;

/// Check that `pool` is positive, finite, and no larger than
/// [`MAX_FUNDING_POOL`].
pub fn validate_pool(pool: f64) -> Result<(), AllocationError> {
    if pool.is_finite() && pool > 0.0 && pool <= MAX_FUNDING_POOL {
        Ok(())
    } else {
        Err(AllocationError::InvalidPool { pool })
    }
}

/// Round to the nearest whole currency unit, halves away from zero.
///
/// Each region is rounded independently, so the rounded total may drift from
/// the pool by up to half a unit per region. Amounts beyond the `i64` range
/// saturate.
pub fn round_currency(amount: f64) -> i64 {
    amount.round() as i64
}

/// One region's share of the pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingShare {
    pub region_id: RegionId,
    pub score: f64,
    pub amount: f64,
    pub rounded_amount: i64,
}

/// Proportional split of a funding pool, in the order regions were supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingAllocation {
    pub total_pool: f64,
    pub total_score: f64,
    pub shares: Vec<FundingShare>,
}

impl FundingAllocation {
    pub fn amount_for(&self, id: &RegionId) -> Option<f64> {
        self.share_for(id).map(|share| share.amount)
    }

    pub fn share_for(&self, id: &RegionId) -> Option<&FundingShare> {
        self.shares.iter().find(|share| &share.region_id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FundingShare> {
        self.shares.iter()
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Sum of unrounded amounts; equals the pool up to floating-point error.
    pub fn allocated_total(&self) -> f64 {
        self.shares.iter().map(|share| share.amount).sum()
    }

    /// Sum of displayed amounts, saturating at the `i64` bounds.
    ///
    /// Under the pass-through policy a negative score total can push single
    /// shares well past the pool, so the sum is carried in `i128`.
    pub fn rounded_total(&self) -> i64 {
        let total: i128 = self
            .shares
            .iter()
            .map(|share| i128::from(share.rounded_amount))
            .sum();
        i64::try_from(total).unwrap_or(if total < 0 { i64::MIN } else { i64::MAX })
    }

    /// Difference between the displayed total and the pool.
    pub fn rounding_drift(&self) -> i64 {
        self.rounded_total()
            .saturating_sub(round_currency(self.total_pool))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateReason {
    ZeroTotal,
    NegativeTotal,
    NonFiniteTotal,
    AmountOverflow,
}

impl fmt::Display for DegenerateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ZeroTotal => "scores sum to zero",
            Self::NegativeTotal => "scores sum to a negative total",
            Self::NonFiniteTotal => "scores do not sum to a finite total",
            Self::AmountOverflow => "a region's share overflows the currency range",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AllocationError {
    #[error("cannot allocate funding across an empty region set")]
    EmptyRegionSet,
    #[error("funding pool must be positive, finite, and at most 2^53 (got {pool})")]
    InvalidPool { pool: f64 },
    #[error("degenerate allocation: {reason} (total score {total_score})")]
    Degenerate {
        reason: DegenerateReason,
        total_score: f64,
    },
}

/// Split `total_pool` proportionally to each region's score.
pub fn allocate(
    scored: &[ScoredRegion],
    total_pool: f64,
    policy: ScoringPolicy,
) -> Result<FundingAllocation, AllocationError> {
    if scored.is_empty() {
        return Err(AllocationError::EmptyRegionSet);
    }
    validate_pool(total_pool)?;

    let total_score: f64 = scored.iter().map(|entry| entry.score).sum();
    let degenerate = if !total_score.is_finite() {
        Some(DegenerateReason::NonFiniteTotal)
    } else if total_score == 0.0 {
        Some(DegenerateReason::ZeroTotal)
    } else if total_score < 0.0 && policy == ScoringPolicy::Strict {
        Some(DegenerateReason::NegativeTotal)
    } else {
        None
    };

    if let Some(reason) = degenerate {
        warn!(%reason, total_score, regions = scored.len(), "allocation refused");
        return Err(AllocationError::Degenerate {
            reason,
            total_score,
        });
    }

    let mut shares = Vec::with_capacity(scored.len());
    for entry in scored {
        let amount = total_pool * (entry.score / total_score);
        if !amount.is_finite() {
            warn!(region = %entry.region.id(), total_score, "allocation overflowed");
            return Err(AllocationError::Degenerate {
                reason: DegenerateReason::AmountOverflow,
                total_score,
            });
        }

        shares.push(FundingShare {
            region_id: entry.region.id().clone(),
            score: entry.score,
            amount,
            rounded_amount: round_currency(amount),
        });
    }

    Ok(FundingAllocation {
        total_pool,
        total_score,
        shares,
    })
}
