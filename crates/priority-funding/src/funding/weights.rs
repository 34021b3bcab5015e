use super::domain::Indicator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};

/// Operator emphasis across the four scoring dimensions.
///
/// Weights are not required to sum to one, so scores are not normalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub land_degradation: f64,
    pub wealth: f64,
    pub population_trend: f64,
    pub luminosity: f64,
}

impl Default for WeightVector {
    fn default() -> Self {
        Self {
            land_degradation: 0.4,
            wealth: 0.25,
            population_trend: 0.2,
            luminosity: 0.15,
        }
    }
}

impl WeightVector {
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

    /// Copy of this vector with exactly one dimension replaced.
    pub fn with(mut self, indicator: Indicator, value: f64) -> Self {
        match indicator {
            Indicator::LandDegradation => self.land_degradation = value,
            Indicator::Wealth => self.wealth = value,
            Indicator::PopulationTrend => self.population_trend = value,
            Indicator::Luminosity => self.luminosity = value,
        }
        self
    }
}

/// How far the engine trusts operator input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringPolicy {
    /// Any finite weight is accepted, negative emphasis included, and a
    /// negative score total is allocated arithmetically.
    #[default]
    PassThrough,
    /// Negative weights and negative score totals are rejected.
    Strict,
}

impl ScoringPolicy {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PassThrough => "pass-through",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for ScoringPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScoringPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pass-through" | "passthrough" | "pass_through" => Ok(Self::PassThrough),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown scoring policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidWeightError {
    #[error("{indicator} weight must be a finite number (got {value})")]
    NonFinite { indicator: Indicator, value: f64 },
    #[error("{indicator} weight must not be negative under the strict policy (got {value})")]
    Negative { indicator: Indicator, value: f64 },
}

pub(crate) fn validate_weight(
    policy: ScoringPolicy,
    indicator: Indicator,
    value: f64,
) -> Result<(), InvalidWeightError> {
    if !value.is_finite() {
        return Err(InvalidWeightError::NonFinite { indicator, value });
    }
    if policy == ScoringPolicy::Strict && value < 0.0 {
        return Err(InvalidWeightError::Negative { indicator, value });
    }
    Ok(())
}

/// Single-writer holder of the live weight vector.
///
/// Readers always receive a copy; holding one never observes later edits.
/// Consumers pull a fresh [`snapshot`](Self::snapshot) before each scoring
/// pass; the vector and its revision are read under one lock so a revision
/// never describes a different vector.
#[derive(Debug)]
pub struct WeightVectorManager {
    current: RwLock<VersionedWeights>,
    policy: ScoringPolicy,
}

#[derive(Debug, Clone, Copy)]
struct VersionedWeights {
    weights: WeightVector,
    revision: u64,
}

impl Default for WeightVectorManager {
    fn default() -> Self {
        Self::new(ScoringPolicy::default())
    }
}

impl WeightVectorManager {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self {
            current: RwLock::new(VersionedWeights {
                weights: WeightVector::default(),
                revision: 0,
            }),
            policy,
        }
    }

    /// Start from a caller-supplied vector, validated under `policy`.
    pub fn with_weights(
        weights: WeightVector,
        policy: ScoringPolicy,
    ) -> Result<Self, InvalidWeightError> {
        for indicator in Indicator::ordered() {
            validate_weight(policy, indicator, weights.get(indicator))?;
        }

        Ok(Self {
            current: RwLock::new(VersionedWeights {
                weights,
                revision: 0,
            }),
            policy,
        })
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    fn read(&self) -> VersionedWeights {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn weights(&self) -> WeightVector {
        self.read().weights
    }

    pub fn revision(&self) -> u64 {
        self.read().revision
    }

    /// The current vector together with the revision that produced it.
    pub fn snapshot(&self) -> (WeightVector, u64) {
        let VersionedWeights { weights, revision } = self.read();
        (weights, revision)
    }

    pub fn set_weight(
        &self,
        indicator: Indicator,
        value: f64,
    ) -> Result<WeightVector, InvalidWeightError> {
        if let Err(err) = validate_weight(self.policy, indicator, value) {
            warn!(%indicator, value, error = %err, "rejected weight update");
            return Err(err);
        }

        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let updated = guard.weights.with(indicator, value);
        guard.weights = updated;
        guard.revision += 1;
        let revision = guard.revision;
        drop(guard);

        debug!(%indicator, value, revision, "weight updated");
        Ok(updated)
    }

    pub fn reset(&self) -> WeightVector {
        let defaults = WeightVector::default();
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        guard.weights = defaults;
        guard.revision += 1;
        drop(guard);

        debug!("weights reset to defaults");
        defaults
    }
}
