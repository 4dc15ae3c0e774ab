use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::sizing::DemandSource;

/// Largest waffle grid a config may ask for; every calculation allocates one.
pub const MAX_WAFFLE_CELLS: usize = 10_000;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub sizing: SizingConstants,
    pub waffle: WaffleConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 8080 }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid server address {}:{}", self.host, self.port))
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DataConfig {
    /// Reference irradiance table (CSV)
    pub csv_path: PathBuf,
    pub demand_source: DemandSource,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("data/data.csv"),
            demand_source: DemandSource::default(),
        }
    }
}

/// Fixed physical and economic constants of the sizing model.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, ToSchema)]
#[serde(default)]
pub struct SizingConstants {
    pub hours_of_sunlight: f64,
    pub operating_days: u32,
    pub solar_irradiance_constant_w: f64,
    pub panel_efficiency: f64,
    /// Area occupied by one panel (m²)
    pub panel_footprint_m2: f64,
    /// Square meters per land-unit (rai)
    pub land_unit_to_m2: f64,
}

impl Default for SizingConstants {
    fn default() -> Self {
        Self {
            hours_of_sunlight: 5.0,
            operating_days: 120,
            solar_irradiance_constant_w: 0.45,
            panel_efficiency: 0.2,
            panel_footprint_m2: 2.0,
            land_unit_to_m2: 1600.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, ToSchema)]
#[serde(default)]
pub struct WaffleConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for WaffleConfig {
    fn default() -> Self {
        Self { width: 10, height: 10 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` wins when set
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info,tower_http=info".to_string(), json: false }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let s = &self.sizing;
        let positive = [
            ("hours_of_sunlight", s.hours_of_sunlight),
            ("solar_irradiance_constant_w", s.solar_irradiance_constant_w),
            ("panel_efficiency", s.panel_efficiency),
            ("panel_footprint_m2", s.panel_footprint_m2),
            ("land_unit_to_m2", s.land_unit_to_m2),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                anyhow::bail!("sizing.{name} must be a positive number, got {value}");
            }
        }
        if s.operating_days == 0 {
            anyhow::bail!("sizing.operating_days must be at least 1");
        }
        let WaffleConfig { width, height } = self.waffle;
        if width == 0 || height == 0 {
            anyhow::bail!("waffle grid must be at least 1x1");
        }
        match width.checked_mul(height) {
            Some(cells) if cells <= MAX_WAFFLE_CELLS => {}
            _ => anyhow::bail!(
                "waffle grid {width}x{height} exceeds {MAX_WAFFLE_CELLS} cells"
            ),
        }
        Ok(())
    }
}
