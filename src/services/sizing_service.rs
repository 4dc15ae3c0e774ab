use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::WaffleConfig;
use crate::error::Result;
use crate::models::sizing::{
    AreaInput, CalculateRequest, CalculationReport, DemandSource, LocationRecord, SizingInput,
};
use crate::services::irradiance_table::IrradianceTable;
use crate::services::panel_sizer::PanelSizer;
use crate::services::waffle_tiler;

pub const SOLAR_AREA_LABEL: &str = "Solar area";
pub const FREE_AREA_LABEL: &str = "Space";

/// Runs one calculation end to end: location → sizing → waffle.
#[derive(Debug, Clone)]
pub struct SizingService {
    table: Arc<IrradianceTable>,
    sizer: PanelSizer,
    demand_source: DemandSource,
    waffle: WaffleConfig,
}

impl SizingService {
    pub fn new(
        table: Arc<IrradianceTable>,
        sizer: PanelSizer,
        demand_source: DemandSource,
        waffle: WaffleConfig,
    ) -> Self {
        Self { table, sizer, demand_source, waffle }
    }

    pub fn table(&self) -> &IrradianceTable {
        &self.table
    }

    pub fn sizer(&self) -> &PanelSizer {
        &self.sizer
    }

    pub fn waffle_config(&self) -> WaffleConfig {
        self.waffle
    }

    pub fn demand_source(&self) -> DemandSource {
        self.demand_source
    }

    fn resolve_area(&self, area: AreaInput) -> Result<f64> {
        match area {
            AreaInput::SquareMeters(m2) => Ok(m2),
            AreaInput::LandUnits(units) => self.sizer.area_from_land_units(units),
        }
    }

    fn resolve_location(&self, region: Option<&str>, subregion: &str) -> Result<&LocationRecord> {
        match region {
            Some(region) => self.table.lookup_in(region, subregion),
            None => self.table.lookup(subregion),
        }
    }

    fn baseline_demand_kwh(&self, location: &LocationRecord) -> f64 {
        match self.demand_source {
            DemandSource::Location => location.baseline_demand_kwh,
            DemandSource::FirstRow => self.table.first_row().baseline_demand_kwh,
        }
    }

    pub fn calculate(&self, request: &CalculateRequest) -> Result<CalculationReport> {
        let area_m2 = self.resolve_area(request.area)?;
        let location = self.resolve_location(request.region.as_deref(), &request.subregion)?;

        let input = SizingInput {
            area_m2,
            demand_override_kwh: request.demand_override_kwh,
            irradiance_mj_per_m2: location.irradiance_mj_per_m2,
        };
        let result = self.sizer.compute(&input, self.baseline_demand_kwh(location))?;

        // The signed remainder stays in `result`; the chart only shows free space.
        let waffle = waffle_tiler::tile(
            &[
                (SOLAR_AREA_LABEL, result.installed_area_m2),
                (FREE_AREA_LABEL, result.remaining_area_m2.max(0.0)),
            ],
            self.waffle.width,
            self.waffle.height,
        )?;

        let undersized = result.is_undersized();
        if undersized {
            warn!(
                subregion = %location.subregion,
                area_m2,
                installed_area_m2 = result.installed_area_m2,
                "plot is too small for the required panels"
            );
        }

        let report = CalculationReport {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            location: location.clone(),
            demand_source: request.demand_override_kwh.is_none().then_some(self.demand_source),
            result,
            undersized,
            waffle,
        };

        info!(
            calculation_id = %report.calculation_id,
            region = %location.region,
            subregion = %location.subregion,
            panels = result.panel_count,
            required_kwh = result.required_kwh,
            produced_kwh = result.produced_kwh,
            tiles = ?report.waffle.tile_counts(),
            "calculation complete"
        );
        Ok(report)
    }
}
