use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};

use crate::error::SizerError;
use crate::models::sizing::{
    CalculateRequest, CalculationReport, ConstantsResponse, HealthStatus, LocationRecord,
};
use crate::shared_state::AppState;

/// GET /api/regions
/// List regions
///
/// Distinct province names in reference-table order.
#[utoipa::path(
    get,
    path = "/api/regions",
    responses(
        (status = 200, description = "Region names", body = Vec<String>)
    )
)]
pub async fn list_regions(State(state): State<AppState>) -> impl IntoResponse {
    let regions: Vec<String> = state.table().regions().into_iter().map(str::to_string).collect();
    Json(regions)
}

/// GET /api/regions/{region}/subregions
/// List subregions of a region
///
/// An unknown region yields an empty list so the caller can simply clear its
/// subregion selector.
#[utoipa::path(
    get,
    path = "/api/regions/{region}/subregions",
    params(
        ("region" = String, Path, description = "Region (province) name")
    ),
    responses(
        (status = 200, description = "Subregion names", body = Vec<String>)
    )
)]
pub async fn list_subregions(
    Path(region): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let subregions: Vec<String> = state
        .table()
        .subregions(&region)
        .into_iter()
        .map(str::to_string)
        .collect();
    Json(subregions)
}

/// GET /api/locations/{subregion}
/// Get the reference record of a subregion
#[utoipa::path(
    get,
    path = "/api/locations/{subregion}",
    params(
        ("subregion" = String, Path, description = "Subregion (sub-district) name")
    ),
    responses(
        (status = 200, description = "Reference record", body = LocationRecord),
        (status = 404, description = "Subregion not found")
    )
)]
pub async fn get_location(
    Path(subregion): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LocationRecord>, SizerError> {
    Ok(Json(state.table().lookup(&subregion)?.clone()))
}

/// POST /api/calculate
/// Size a solar installation
///
/// Looks up the subregion's irradiance, solves the panel count for the plot's
/// demand and returns the result together with the waffle grid of installed
/// versus free area.
#[utoipa::path(
    post,
    path = "/api/calculate",
    request_body = CalculateRequest,
    responses(
        (status = 200, description = "Sizing result and waffle grid", body = CalculationReport),
        (status = 400, description = "Malformed body, or invalid area, demand or irradiance"),
        (status = 404, description = "Location not found")
    )
)]
pub async fn calculate(
    State(state): State<AppState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Json<CalculationReport>, SizerError> {
    let Json(request) = payload?;
    Ok(Json(state.service.calculate(&request)?))
}

/// GET /api/sizing/constants
/// Active model constants
#[utoipa::path(
    get,
    path = "/api/sizing/constants",
    responses(
        (status = 200, description = "Sizing constants and grid size", body = ConstantsResponse)
    )
)]
pub async fn get_constants(State(state): State<AppState>) -> impl IntoResponse {
    Json(ConstantsResponse {
        sizing: *state.service.sizer().constants(),
        waffle: state.service.waffle_config(),
        demand_source: state.service.demand_source(),
    })
}

/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service health", body = HealthStatus)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let table = state.table();
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        locations_loaded: table.len(),
        regions_loaded: table.regions().len(),
    })
}
