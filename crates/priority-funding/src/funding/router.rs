use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{Indicator, Region, RegionId, RegionSet};
use super::service::{FundingError, PriorityFundingService};
use super::weights::{ScoringPolicy, WeightVector};
use crate::catalog::{CatalogError, RegionSource};

/// Router builder exposing the weight, ranking, and region-set endpoints.
pub fn funding_router<S>(service: Arc<PriorityFundingService<S>>) -> Router
where
    S: RegionSource + 'static,
{
    Router::new()
        .route(
            "/api/v1/funding/weights",
            get(weights_handler::<S>).delete(reset_weights_handler::<S>),
        )
        .route(
            "/api/v1/funding/weights/:indicator",
            put(set_weight_handler::<S>),
        )
        .route("/api/v1/funding/regions", get(snapshot_handler::<S>))
        .route(
            "/api/v1/funding/regions/:region_id",
            get(region_detail_handler::<S>),
        )
        .route(
            "/api/v1/funding/region-set",
            put(replace_region_set_handler::<S>),
        )
        .route("/api/v1/funding/country", put(select_country_handler::<S>))
        .route("/api/v1/funding/countries", get(countries_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightsView {
    pub weights: WeightVector,
    pub revision: u64,
    pub policy: ScoringPolicy,
}

#[derive(Debug, Deserialize)]
pub struct WeightUpdateRequest {
    pub value: f64,
}

#[derive(Debug, Deserialize)]
pub struct RegionSetRequest {
    pub label: String,
    pub regions: Vec<Region>,
}

#[derive(Debug, Deserialize)]
pub struct CountryRequest {
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSetView {
    pub label: String,
    pub region_count: usize,
}

fn weights_view<S>(service: &PriorityFundingService<S>) -> WeightsView
where
    S: RegionSource + 'static,
{
    let (weights, revision) = service.weight_snapshot();
    WeightsView {
        weights,
        revision,
        policy: service.policy(),
    }
}

fn error_response(error: FundingError) -> Response {
    let status = match &error {
        FundingError::Weight(_) | FundingError::Catalog(CatalogError::Region(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        FundingError::Catalog(CatalogError::UnknownCountry(_)) | FundingError::RegionNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        FundingError::Scoring(_) | FundingError::Allocation(_) => StatusCode::CONFLICT,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}

pub(crate) async fn weights_handler<S>(
    State(service): State<Arc<PriorityFundingService<S>>>,
) -> Response
where
    S: RegionSource + 'static,
{
    (StatusCode::OK, Json(weights_view(&service))).into_response()
}

pub(crate) async fn reset_weights_handler<S>(
    State(service): State<Arc<PriorityFundingService<S>>>,
) -> Response
where
    S: RegionSource + 'static,
{
    service.reset_weights();
    (StatusCode::OK, Json(weights_view(&service))).into_response()
}

pub(crate) async fn set_weight_handler<S>(
    State(service): State<Arc<PriorityFundingService<S>>>,
    Path(indicator): Path<String>,
    Json(request): Json<WeightUpdateRequest>,
) -> Response
where
    S: RegionSource + 'static,
{
    let indicator = match indicator.parse::<Indicator>() {
        Ok(indicator) => indicator,
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match service.set_weight(indicator, request.value) {
        Ok(_) => (StatusCode::OK, Json(weights_view(&service))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn snapshot_handler<S>(
    State(service): State<Arc<PriorityFundingService<S>>>,
) -> Response
where
    S: RegionSource + 'static,
{
    match service.snapshot() {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn region_detail_handler<S>(
    State(service): State<Arc<PriorityFundingService<S>>>,
    Path(region_id): Path<String>,
) -> Response
where
    S: RegionSource + 'static,
{
    match service.region_detail(&RegionId(region_id)) {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn replace_region_set_handler<S>(
    State(service): State<Arc<PriorityFundingService<S>>>,
    Json(request): Json<RegionSetRequest>,
) -> Response
where
    S: RegionSource + 'static,
{
    let set = match RegionSet::new(request.label, request.regions) {
        Ok(set) => set,
        Err(error) => return error_response(FundingError::Catalog(error.into())),
    };

    let set = service.replace_region_set(set);
    let view = RegionSetView {
        label: set.label().to_string(),
        region_count: set.len(),
    };
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn select_country_handler<S>(
    State(service): State<Arc<PriorityFundingService<S>>>,
    Json(request): Json<CountryRequest>,
) -> Response
where
    S: RegionSource + 'static,
{
    match service.select_country(&request.country) {
        Ok(set) => {
            let view = RegionSetView {
                label: set.label().to_string(),
                region_count: set.len(),
            };
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn countries_handler<S>(
    State(service): State<Arc<PriorityFundingService<S>>>,
) -> Response
where
    S: RegionSource + 'static,
{
    (StatusCode::OK, Json(service.countries())).into_response()
}
