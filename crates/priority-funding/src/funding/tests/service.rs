use super::common::*;
use crate::catalog::{CatalogError, InMemoryRegionCatalog};
use crate::config::FundingConfig;
use crate::funding::allocation::AllocationError;
use crate::funding::domain::{Indicator, RegionId, RegionSet};
use crate::funding::scoring::ScoringError;
use crate::funding::service::{FundingError, PriorityFundingService};
use crate::funding::weights::{ScoringPolicy, WeightVector};
use std::sync::Arc;

#[test]
fn snapshot_ranks_sample_cities() {
    let service = build_service(ScoringPolicy::PassThrough);
    let snapshot = service.snapshot().expect("snapshot computes");

    assert_eq!(snapshot.label, "Algeria");
    assert_eq!(snapshot.total_pool, 1_000_000.0);
    let names: Vec<_> = snapshot
        .regions
        .iter()
        .map(|view| view.name.as_str())
        .collect();
    assert_eq!(names, vec!["Algiers", "Oran", "Constantine"]);
    assert_close(snapshot.regions[0].score, 1.3046, 1e-4);

    let funded: f64 = snapshot.regions.iter().map(|view| view.funding).sum();
    assert_close(funded, 1_000_000.0, 1e-6);
    assert!((snapshot.rounded_total - 1_000_000).abs() <= 1);
    assert!(snapshot.center.is_some());
}

#[test]
fn weight_edits_are_visible_to_the_next_snapshot() {
    let service = build_service(ScoringPolicy::PassThrough);
    let before = service.snapshot().expect("snapshot computes");

    service
        .set_weight(Indicator::Luminosity, 0.0)
        .expect("weight accepted");
    let after = service.snapshot().expect("snapshot computes");

    assert_eq!(before.weight_revision + 1, after.weight_revision);
    assert_eq!(after.weights.luminosity, 0.0);
    assert!(after.total_score < before.total_score);
    assert_eq!(after.regions[0].name, "Constantine");
}

#[test]
fn repeated_snapshots_are_identical() {
    let service = build_service(ScoringPolicy::PassThrough);
    let first = service.snapshot().expect("snapshot computes");
    let second = service.snapshot().expect("snapshot computes");

    assert_eq!(first.regions, second.regions);
    assert_eq!(first.total_score.to_bits(), second.total_score.to_bits());
}

#[test]
fn switching_to_a_country_without_regions_reports_empty_set() {
    let service = build_service(ScoringPolicy::PassThrough);
    let set = service.select_country("Mali").expect("mali is known");
    assert!(set.is_empty());

    assert!(matches!(
        service.snapshot(),
        Err(FundingError::Scoring(ScoringError::EmptyRegionSet))
    ));
}

#[test]
fn unknown_country_leaves_active_set_untouched() {
    let service = build_service(ScoringPolicy::PassThrough);
    assert!(matches!(
        service.select_country("Atlantis"),
        Err(FundingError::Catalog(CatalogError::UnknownCountry(_)))
    ));
    assert_eq!(service.region_set().label(), "Algeria");
}

#[test]
fn replace_region_set_installs_external_regions() {
    let service = build_service(ScoringPolicy::PassThrough);
    let set = RegionSet::new(
        "Custom",
        vec![
            region("low", [0.1, 0.9, 0.9, 0.9]),
            region("high", [0.9, 0.1, 0.1, 0.05]),
        ],
    )
    .expect("valid set");
    service.replace_region_set(set);

    let snapshot = service.snapshot().expect("snapshot computes");
    assert_eq!(snapshot.label, "Custom");
    assert!(snapshot.center.is_none());
    assert_eq!(snapshot.regions[0].id, RegionId::from("high"));
    assert_eq!(snapshot.ranked.position(&RegionId::from("low")), Some(2));
}

#[test]
fn all_zero_weights_surface_degenerate_allocation() {
    let service = build_service(ScoringPolicy::PassThrough);
    for indicator in Indicator::ordered() {
        service.set_weight(indicator, 0.0).expect("zero accepted");
    }

    assert!(matches!(
        service.snapshot(),
        Err(FundingError::Allocation(AllocationError::Degenerate { .. }))
    ));

    let detail = service
        .region_detail(&RegionId::from("1"))
        .expect("detail still available");
    assert_eq!(detail.score, 0.0);
    assert!(detail.funding.is_none());
    assert!(detail.allocation_error.is_some());
}

#[test]
fn region_detail_includes_rank_and_funding() {
    let service = build_service(ScoringPolicy::PassThrough);
    let detail = service
        .region_detail(&RegionId::from("3"))
        .expect("constantine present");

    assert_eq!(detail.name, "Constantine");
    assert_eq!(detail.rank, Some(3));
    assert_eq!(detail.details.ndvi, Some(0.5));
    assert_eq!(detail.breakdown.components.len(), 4);
    let funding = detail.funding.expect("funding computed");
    assert_eq!(detail.funding_display, Some(funding.round() as i64));

    assert!(matches!(
        service.region_detail(&RegionId::from("99")),
        Err(FundingError::RegionNotFound(_))
    ));
}

#[test]
fn reset_weights_restores_defaults() {
    let service = build_service(ScoringPolicy::Strict);
    service
        .set_weight(Indicator::Wealth, 0.7)
        .expect("weight accepted");
    assert_eq!(service.reset_weights(), WeightVector::default());
    assert!(matches!(
        service.set_weight(Indicator::Wealth, -0.7),
        Err(FundingError::Weight(_))
    ));
}

#[test]
fn construction_validates_pool_and_country() {
    let catalog = Arc::new(InMemoryRegionCatalog::african_sample());

    let bad_pool = FundingConfig {
        total_pool: 0.0,
        ..FundingConfig::default()
    };
    assert!(matches!(
        PriorityFundingService::new(catalog.clone(), &bad_pool),
        Err(FundingError::Allocation(AllocationError::InvalidPool { .. }))
    ));

    let bad_country = FundingConfig {
        default_country: "Atlantis".to_string(),
        ..FundingConfig::default()
    };
    assert!(matches!(
        PriorityFundingService::new(catalog, &bad_country),
        Err(FundingError::Catalog(CatalogError::UnknownCountry(_)))
    ));
}

#[test]
fn snapshot_revision_matches_the_weights_it_used() {
    let service = build_service(ScoringPolicy::PassThrough);

    std::thread::scope(|scope| {
        let writer = service.clone();
        scope.spawn(move || {
            for step in 1..=2_000u32 {
                writer
                    .set_weight(Indicator::Luminosity, f64::from(step))
                    .expect("weight accepted");
            }
        });

        for _ in 0..2_000 {
            let snapshot = service.snapshot().expect("snapshot computes");
            assert_eq!(snapshot.weights.luminosity as u64, snapshot.weight_revision);
        }
    });

    let (weights, revision) = service.weight_snapshot();
    assert_eq!(revision, 2_000);
    assert_eq!(weights.luminosity, 2_000.0);
}
