/// ============================================================
///  Panel sizing model
///
///  1. Daily yield of one panel from the location's irradiance:
///       E = G / 3.6 × η × h × k
///     (G in MJ/m², /3.6 → kWh/m², η panel efficiency,
///      h sunlight hours, k irradiance constant)
///  2. Demand scales with plot area in land-units.
///  3. Panel count = smallest n ≥ 1 with E × n × days ≥ demand.
/// ============================================================

use crate::config::SizingConstants;
use crate::error::{Result, SizerError};
use crate::models::sizing::{SizingInput, SizingResult};

const MJ_PER_KWH: f64 = 3.6;

/// Above this the count stops being exactly representable as f64.
const MAX_PANEL_COUNT: u64 = 1 << 52;

fn require_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SizerError::invalid(format!("{name} must be positive, got {value}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelSizer {
    constants: SizingConstants,
}

impl Default for PanelSizer {
    fn default() -> Self {
        Self::new(SizingConstants::default())
    }
}

impl PanelSizer {
    pub fn new(constants: SizingConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &SizingConstants {
        &self.constants
    }

    pub fn area_from_land_units(&self, land_units: f64) -> Result<f64> {
        require_positive("land-unit count", land_units)?;
        Ok(land_units * self.constants.land_unit_to_m2)
    }

    pub fn energy_per_panel_per_day_kwh(&self, irradiance_mj_per_m2: f64) -> Result<f64> {
        require_positive("irradiance", irradiance_mj_per_m2)?;
        let c = &self.constants;
        Ok(irradiance_mj_per_m2 / MJ_PER_KWH
            * c.panel_efficiency
            * c.hours_of_sunlight
            * c.solar_irradiance_constant_w)
    }

    /// Energy from `panel_count` panels over the operating period.
    fn produced_kwh(&self, energy_per_panel_per_day_kwh: f64, panel_count: u64) -> f64 {
        energy_per_panel_per_day_kwh * panel_count as f64 * self.constants.operating_days as f64
    }

    /// Smallest `n >= 1` with `produced_kwh(n) >= required_kwh`.
    ///
    /// Starts from the closed form and walks at most a step or two either way
    /// so the answer agrees with `produced_kwh` under float rounding.
    fn solve_panel_count(&self, energy: f64, required_kwh: f64) -> Result<u64> {
        let per_panel = energy * self.constants.operating_days as f64;
        let estimate = (required_kwh / per_panel).ceil();
        if !estimate.is_finite() || estimate > MAX_PANEL_COUNT as f64 {
            return Err(SizerError::invalid(format!(
                "demand of {required_kwh} kWh needs more than {MAX_PANEL_COUNT} panels"
            )));
        }

        let mut n = (estimate as u64).max(1);
        while n > 1 && self.produced_kwh(energy, n - 1) >= required_kwh {
            n -= 1;
        }
        while self.produced_kwh(energy, n) < required_kwh {
            n += 1;
        }
        Ok(n)
    }

    /// `baseline_required_kwh` is demand per land-unit, used only when the
    /// input carries no override.
    pub fn compute(&self, input: &SizingInput, baseline_required_kwh: f64) -> Result<SizingResult> {
        require_positive("area", input.area_m2)?;
        let energy = self.energy_per_panel_per_day_kwh(input.irradiance_mj_per_m2)?;
        if let Some(demand) = input.demand_override_kwh {
            require_positive("demand override", demand)?;
        }

        let area_units = input.area_m2 / self.constants.land_unit_to_m2;
        let demand_per_unit = input.demand_override_kwh.unwrap_or(baseline_required_kwh);
        let required_kwh = demand_per_unit * area_units;
        require_positive("required energy", required_kwh)?;

        let panel_count = self.solve_panel_count(energy, required_kwh)?;
        let produced_kwh = self.produced_kwh(energy, panel_count);
        let installed_area_m2 = panel_count as f64 * self.constants.panel_footprint_m2;

        Ok(SizingResult {
            irradiance_mj_per_m2: input.irradiance_mj_per_m2,
            area_m2: input.area_m2,
            area_units,
            energy_per_panel_per_day_kwh: energy,
            panel_count,
            required_kwh,
            produced_kwh,
            surplus_kwh: produced_kwh - required_kwh,
            installed_area_m2,
            remaining_area_m2: input.area_m2 - installed_area_m2,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn input(area_m2: f64, irradiance: f64, demand_override_kwh: Option<f64>) -> SizingInput {
        SizingInput { area_m2, demand_override_kwh, irradiance_mj_per_m2: irradiance }
    }

    #[test]
    fn test_one_rai_at_18_mj() {
        let sizer = PanelSizer::default();
        let r = sizer.compute(&input(1600.0, 18.0, None), 100.0).unwrap();

        assert_relative_eq!(r.energy_per_panel_per_day_kwh, 2.25, epsilon = 1e-12);
        assert_relative_eq!(r.area_units, 1.0);
        assert_relative_eq!(r.required_kwh, 100.0, epsilon = 1e-9);
        assert_eq!(r.panel_count, 1);
        assert_relative_eq!(r.produced_kwh, 270.0, epsilon = 1e-9);
        assert_relative_eq!(r.surplus_kwh, 170.0, epsilon = 1e-9);
        assert_relative_eq!(r.installed_area_m2, 2.0);
        assert_relative_eq!(r.remaining_area_m2, 1598.0);
        assert!(!r.is_undersized());
    }

    #[test]
    fn test_override_replaces_baseline() {
        let sizer = PanelSizer::default();
        // 2 rai × 1000 kWh = 2000 kWh; 270 kWh per panel → 8 panels
        let r = sizer.compute(&input(3200.0, 18.0, Some(1000.0)), 100.0).unwrap();
        assert_relative_eq!(r.required_kwh, 2000.0, epsilon = 1e-9);
        assert_eq!(r.panel_count, 8);
        assert_relative_eq!(r.installed_area_m2, 16.0);
    }

    #[test]
    fn test_exact_ratio_needs_no_extra_panel() {
        let sizer = PanelSizer::default();
        // 540 kWh is exactly two panels' output
        let r = sizer.compute(&input(1600.0, 18.0, Some(540.0)), 0.0).unwrap();
        assert_eq!(r.panel_count, 2);
        assert!(r.produced_kwh >= r.required_kwh);
        assert_relative_eq!(r.surplus_kwh, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_undersized_plot_goes_negative() {
        let sizer = PanelSizer::default();
        // 10 m² plot, 100000 kWh per rai → 625 kWh → 3 panels → 6 m²; still fits
        let fits = sizer.compute(&input(10.0, 18.0, Some(100_000.0)), 0.0).unwrap();
        assert_eq!(fits.panel_count, 3);
        assert_relative_eq!(fits.remaining_area_m2, 4.0);

        let r = sizer.compute(&input(10.0, 18.0, Some(1_000_000.0)), 0.0).unwrap();
        assert_eq!(r.panel_count, 24);
        assert_relative_eq!(r.remaining_area_m2, -38.0);
        assert!(r.is_undersized());
    }

    #[test]
    fn test_zero_irradiance_is_invalid() {
        let sizer = PanelSizer::default();
        let err = sizer.compute(&input(1600.0, 0.0, None), 100.0).unwrap_err();
        assert!(matches!(err, SizerError::InvalidInput(_)));
    }

    #[test]
    fn test_non_positive_inputs_are_invalid() {
        let sizer = PanelSizer::default();
        let cases = [
            (input(0.0, 18.0, None), 100.0),
            (input(-5.0, 18.0, None), 100.0),
            (input(1600.0, -1.0, None), 100.0),
            (input(1600.0, f64::NAN, None), 100.0),
            (input(1600.0, 18.0, Some(0.0)), 100.0),
            (input(1600.0, 18.0, None), 0.0),
            (input(1600.0, 18.0, None), -3.0),
        ];
        for (inp, baseline) in cases {
            assert!(
                matches!(sizer.compute(&inp, baseline), Err(SizerError::InvalidInput(_))),
                "expected InvalidInput for {inp:?} baseline {baseline}"
            );
        }
    }

    #[test]
    fn test_land_units() {
        let sizer = PanelSizer::default();
        assert_relative_eq!(sizer.area_from_land_units(2.5).unwrap(), 4000.0);
        assert!(sizer.area_from_land_units(0.0).is_err());
    }

    #[test]
    fn test_custom_constants() {
        let sizer = PanelSizer::new(SizingConstants {
            operating_days: 365,
            panel_footprint_m2: 1.7,
            ..SizingConstants::default()
        });
        let r = sizer.compute(&input(1600.0, 18.0, None), 1000.0).unwrap();
        // 2.25 × 365 = 821.25 per panel → 2 panels
        assert_eq!(r.panel_count, 2);
        assert_relative_eq!(r.installed_area_m2, 3.4);
    }

    proptest! {
        #[test]
        fn prop_panel_count_is_minimal(
            area in 1.0f64..1.0e6,
            irradiance in 0.1f64..50.0,
            demand in 0.1f64..1.0e4,
        ) {
            let sizer = PanelSizer::default();
            let r = sizer.compute(&input(area, irradiance, Some(demand)), 0.0).unwrap();
            let days = sizer.constants().operating_days as f64;
            let e = r.energy_per_panel_per_day_kwh;

            prop_assert!(r.panel_count >= 1);
            prop_assert!(e * r.panel_count as f64 * days >= r.required_kwh);
            if r.panel_count > 1 {
                prop_assert!(e * (r.panel_count - 1) as f64 * days < r.required_kwh);
            }
        }

        #[test]
        fn prop_compute_is_idempotent(
            area in 1.0f64..1.0e5,
            irradiance in 0.1f64..50.0,
            baseline in 0.1f64..1.0e3,
        ) {
            let sizer = PanelSizer::default();
            let inp = input(area, irradiance, None);
            let a = sizer.compute(&inp, baseline).unwrap();
            let b = sizer.compute(&inp, baseline).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
