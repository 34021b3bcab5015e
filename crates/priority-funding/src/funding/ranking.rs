use super::domain::RegionId;
use super::scoring::ScoredRegion;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRegion {
    /// 1-based position, highest priority first.
    pub rank: usize,
    #[serde(flatten)]
    pub scored: ScoredRegion,
}

/// Scored regions ordered by descending priority.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankedRegions {
    entries: Vec<RankedRegion>,
}

/// Sort by descending score. The sort is stable: equal scores keep the order
/// they had in `scored`. NaN scores rank last.
pub fn rank(mut scored: Vec<ScoredRegion>) -> RankedRegions {
    scored.sort_by(|a, b| by_descending_score(a.score, b.score));

    let entries = scored
        .into_iter()
        .enumerate()
        .map(|(index, scored)| RankedRegion {
            rank: index + 1,
            scored,
        })
        .collect();

    RankedRegions { entries }
}

fn by_descending_score(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

impl RankedRegions {
    pub fn entries(&self) -> &[RankedRegion] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedRegion> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self, n: usize) -> &[RankedRegion] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// The `n` lowest-priority regions, still in descending order.
    pub fn bottom(&self, n: usize) -> &[RankedRegion] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn position(&self, id: &RegionId) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.scored.region.id() == id)
            .map(|entry| entry.rank)
    }

    pub fn scored(&self) -> Vec<ScoredRegion> {
        self.entries
            .iter()
            .map(|entry| entry.scored.clone())
            .collect()
    }

    pub fn into_vec(self) -> Vec<RankedRegion> {
        self.entries
    }
}
