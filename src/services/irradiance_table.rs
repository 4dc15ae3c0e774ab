//! Read-only irradiance reference table.
//!
//! Loaded once from CSV at startup. Column names follow the provincial survey
//! export (`Province`, `Tumbol`, `solar_energy`, `total`); the descriptive
//! names (`region`, `subregion`, `irradiance_mj_per_m2`, `baseline_demand_kwh`)
//! are accepted as well.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, warn};

use crate::error::{Result, SizerError};
use crate::models::sizing::LocationRecord;

const REGION_COLUMNS: &[&str] = &["Province", "region"];
const SUBREGION_COLUMNS: &[&str] = &["Tumbol", "subregion"];
const IRRADIANCE_COLUMNS: &[&str] = &["solar_energy", "irradiance_mj_per_m2"];
const DEMAND_COLUMNS: &[&str] = &["total", "baseline_demand_kwh"];

#[derive(Debug, Clone)]
pub struct IrradianceTable {
    records: Vec<LocationRecord>,
}

struct Columns {
    region: usize,
    subregion: usize,
    irradiance: usize,
    demand: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        Ok(Self {
            region: column_index(headers, REGION_COLUMNS)?,
            subregion: column_index(headers, SUBREGION_COLUMNS)?,
            irradiance: column_index(headers, IRRADIANCE_COLUMNS)?,
            demand: column_index(headers, DEMAND_COLUMNS)?,
        })
    }
}

fn column_index(headers: &StringRecord, accepted: &[&str]) -> Result<usize> {
    headers
        .iter()
        .position(|h| accepted.contains(&h))
        .ok_or_else(|| {
            SizerError::data_load(format!(
                "missing required column (expected one of {})",
                accepted.join(", ")
            ))
        })
}

fn parse_number(record: &StringRecord, idx: usize, column: &str, line: u64) -> Result<f64> {
    let raw = record.get(idx).unwrap_or_default();
    let value: f64 = raw.parse().map_err(|_| {
        SizerError::data_load(format!("line {line}: {column} '{raw}' is not a number"))
    })?;
    if !value.is_finite() {
        return Err(SizerError::data_load(format!("line {line}: {column} is not finite")));
    }
    Ok(value)
}

impl IrradianceTable {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| SizerError::data_load(format!("{}: {e}", path.display())))?;
        let table = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            locations = table.len(),
            regions = table.regions().len(),
            "irradiance table loaded"
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| SizerError::data_load(format!("unreadable header: {e}")))?
            .clone();
        let cols = Columns::resolve(&headers)?;

        let mut records = Vec::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();
        for row in rdr.records() {
            let row = row.map_err(|e| SizerError::data_load(e.to_string()))?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();

            let irradiance = parse_number(&row, cols.irradiance, "irradiance", line)?;
            if irradiance <= 0.0 {
                return Err(SizerError::data_load(format!(
                    "line {line}: irradiance must be positive, got {irradiance}"
                )));
            }
            let demand = parse_number(&row, cols.demand, "baseline demand", line)?;

            let text = |idx: usize| row.get(idx).unwrap_or_default().to_string();
            let record = LocationRecord {
                region: text(cols.region),
                subregion: text(cols.subregion),
                irradiance_mj_per_m2: irradiance,
                baseline_demand_kwh: demand,
            };
            if record.region.is_empty() || record.subregion.is_empty() {
                return Err(SizerError::data_load(format!(
                    "line {line}: empty region or subregion"
                )));
            }
            if !seen.insert((record.region.clone(), record.subregion.clone())) {
                warn!(
                    line,
                    region = %record.region,
                    subregion = %record.subregion,
                    "repeated location; lookups keep the earlier row"
                );
            }
            records.push(record);
        }

        if records.is_empty() {
            return Err(SizerError::data_load("reference table has no rows"));
        }
        debug!(rows = records.len(), "parsed irradiance rows");
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct region names in source order.
    pub fn regions(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for r in &self.records {
            if !out.contains(&r.region.as_str()) {
                out.push(&r.region);
            }
        }
        out
    }

    /// Distinct subregions of `region` in source order. Unknown regions give
    /// an empty list.
    pub fn subregions(&self, region: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for r in self.records.iter().filter(|r| r.region == region) {
            if !out.contains(&r.subregion.as_str()) {
                out.push(&r.subregion);
            }
        }
        out
    }

    /// First record (by source order) whose subregion matches.
    pub fn lookup(&self, subregion: &str) -> Result<&LocationRecord> {
        self.records
            .iter()
            .find(|r| r.subregion == subregion)
            .ok_or_else(|| SizerError::not_found(format!("subregion '{subregion}'")))
    }

    pub fn lookup_in(&self, region: &str, subregion: &str) -> Result<&LocationRecord> {
        self.records
            .iter()
            .find(|r| r.region == region && r.subregion == subregion)
            .ok_or_else(|| {
                SizerError::not_found(format!("subregion '{subregion}' in region '{region}'"))
            })
    }

    pub fn first_row(&self) -> &LocationRecord {
        // from_reader refuses empty tables
        &self.records[0]
    }
}
