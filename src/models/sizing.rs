use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{SizingConstants, WaffleConfig};

// ─── Reference data ──────────────────────────────────────────────────────────

/// One row of the irradiance reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LocationRecord {
    /// Province
    pub region: String,
    /// Sub-district, unique within its region
    pub subregion: String,
    /// Solar irradiance (MJ/m²)
    pub irradiance_mj_per_m2: f64,
    /// Baseline electricity demand per land-unit (kWh)
    pub baseline_demand_kwh: f64,
}

/// Which baseline demand figure is used when the caller gives no override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DemandSource {
    /// Baseline of the selected location's own row
    #[default]
    Location,
    /// Baseline of the first row of the whole table, whatever was selected
    FirstRow,
}

// ─── Sizing ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingInput {
    pub area_m2: f64,
    /// Energy need per land-unit (kWh); replaces the baseline when present
    pub demand_override_kwh: Option<f64>,
    pub irradiance_mj_per_m2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct SizingResult {
    pub irradiance_mj_per_m2: f64,
    pub area_m2: f64,
    /// Area expressed in land-units (rai)
    pub area_units: f64,
    /// Effective daily yield of a single panel (kWh)
    pub energy_per_panel_per_day_kwh: f64,
    pub panel_count: u64,
    pub required_kwh: f64,
    pub produced_kwh: f64,
    /// produced − required
    pub surplus_kwh: f64,
    pub installed_area_m2: f64,
    /// area − installed; negative when the plot is too small for the panels
    pub remaining_area_m2: f64,
}

impl SizingResult {
    pub fn is_undersized(&self) -> bool {
        self.remaining_area_m2 < 0.0
    }
}

// ─── Waffle grid ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WaffleCategory {
    pub label: String,
    /// Literal value, for legends
    pub value: f64,
    /// Cells actually assigned to this category
    pub tile_count: usize,
}

/// `cells[row][col]` holds the index into `categories`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WaffleGrid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Vec<usize>>,
    pub categories: Vec<WaffleCategory>,
    pub total: f64,
}

impl WaffleGrid {
    pub fn tile_counts(&self) -> Vec<usize> {
        self.categories.iter().map(|c| c.tile_count).collect()
    }
}

// ─── REST API types ──────────────────────────────────────────────────────────

/// Plot area, either given directly or as a count of land-units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AreaInput {
    SquareMeters(f64),
    LandUnits(f64),
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalculateRequest {
    /// Narrows the subregion lookup when names repeat across regions
    #[serde(default)]
    pub region: Option<String>,
    pub subregion: String,
    pub area: AreaInput,
    /// Energy need per land-unit (kWh)
    #[serde(default)]
    pub demand_override_kwh: Option<f64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CalculationReport {
    pub calculation_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub location: LocationRecord,
    /// `None` when the demand override was used
    pub demand_source: Option<DemandSource>,
    pub result: SizingResult,
    pub undersized: bool,
    pub waffle: WaffleGrid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub locations_loaded: usize,
    pub regions_loaded: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConstantsResponse {
    pub sizing: SizingConstants,
    pub waffle: WaffleConfig,
    pub demand_source: DemandSource,
}
