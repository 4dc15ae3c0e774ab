use utoipa::OpenApi;
use crate::controllers::sizing_controller;
use crate::models::sizing;
use crate::config;

#[derive(OpenApi)]
#[openapi(
    paths(
        sizing_controller::list_regions,
        sizing_controller::list_subregions,
        sizing_controller::get_location,
        sizing_controller::calculate,
        sizing_controller::get_constants,
        sizing_controller::health
    ),
    components(
        schemas(
            sizing::LocationRecord,
            sizing::DemandSource,
            sizing::AreaInput,
            sizing::CalculateRequest,
            sizing::CalculationReport,
            sizing::SizingResult,
            sizing::WaffleGrid,
            sizing::WaffleCategory,
            sizing::ConstantsResponse,
            sizing::HealthStatus,
            config::SizingConstants,
            config::WaffleConfig
        )
    ),
    tags(
        (name = "solar-panel-sizer", description = "Solar panel sizing API")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/regions",
            "/api/regions/{region}/subregions",
            "/api/locations/{subregion}",
            "/api/calculate",
            "/api/sizing/constants",
            "/api/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
