use axum::{routing::{get, post}, Router};
use crate::controllers::sizing_controller::{
    // Reference data
    list_regions, list_subregions, get_location,
    // Sizing
    calculate, get_constants,
    // Service
    health,
};
use crate::shared_state::AppState;

/// Build the `/api/*` sub-router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/regions",                       get(list_regions))
        .route("/regions/{region}/subregions",   get(list_subregions))
        .route("/locations/{subregion}",         get(get_location))
        .route("/calculate",                     post(calculate))
        .route("/sizing/constants",              get(get_constants))
        .route("/health",                        get(health))
        .with_state(state)
}
