use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::Value;

use crate::catalog::InMemoryRegionCatalog;
use crate::config::FundingConfig;
use crate::funding::domain::{GeoPoint, IndicatorValues, Region};
use crate::funding::scoring::ScoredRegion;
use crate::funding::service::PriorityFundingService;
use crate::funding::weights::ScoringPolicy;

pub(super) fn region(id: &str, values: [f64; 4]) -> Region {
    Region::new(
        id,
        format!("Region {id}"),
        GeoPoint::new(0.0, 0.0),
        IndicatorValues::new(values[0], values[1], values[2], values[3]),
    )
    .expect("valid test region")
}

pub(super) fn algiers() -> Region {
    Region::new(
        "1",
        "Algiers",
        GeoPoint::new(36.7538, 3.0588),
        IndicatorValues::new(0.7, 0.3, 0.5, 0.2),
    )
    .expect("valid region")
}

/// Scored entries with hand-picked scores, bypassing the formula.
pub(super) fn scored_with(scores: &[f64]) -> Vec<ScoredRegion> {
    scores
        .iter()
        .enumerate()
        .map(|(index, score)| ScoredRegion {
            region: region(&format!("r{index}"), [0.5, 0.5, 0.5, 0.5]),
            score: *score,
        })
        .collect()
}

pub(super) fn funding_config(policy: ScoringPolicy) -> FundingConfig {
    FundingConfig {
        policy,
        ..FundingConfig::default()
    }
}

pub(super) fn build_service(
    policy: ScoringPolicy,
) -> Arc<PriorityFundingService<InMemoryRegionCatalog>> {
    let catalog = Arc::new(InMemoryRegionCatalog::african_sample());
    Arc::new(
        PriorityFundingService::new(catalog, &funding_config(policy)).expect("service builds"),
    )
}

pub(super) fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub(super) fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub(super) async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let value = serde_json::from_slice(&bytes).expect("body is json");
    (status, value)
}

pub(super) fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
