//! Aggregate cost and energy for a count map

use crate::catalog::DeviceCatalog;
use crate::counts::CountMap;
use serde::{Deserialize, Serialize};

/// Site-wide totals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_cost: f64,
    #[serde(rename = "totalEnergyMWh")]
    pub total_energy_mwh: f64,
    /// MWh per sq ft of site area; 0 when the site is empty
    pub energy_density: f64,
}

/// Sum cost and net energy over every type, transformer included
///
/// Returns `(total_cost, total_energy_mwh)`. Transformers carry negative energy, so the
/// energy total is net of their consumption. No rounding is applied.
pub fn compute_totals(counts: &CountMap, catalog: &DeviceCatalog) -> (f64, f64) {
    counts
        .iter()
        .fold((0.0, 0.0), |(cost, energy), (device_type, count)| {
            let spec = catalog.spec(device_type);
            let n = f64::from(count);
            (
                cost + n * spec.unit_cost,
                energy + n * spec.energy_capacity_mwh,
            )
        })
}

/// Net energy per unit area, guarding the empty site
pub fn energy_density(total_energy_mwh: f64, site_area_sq_ft: f64) -> f64 {
    if site_area_sq_ft > 0.0 {
        total_energy_mwh / site_area_sq_ft
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DeviceType;

    #[test]
    fn test_single_megapack_with_transformer() {
        let mut counts = CountMap::zeroed();
        counts.set(DeviceType::Megapack, 1);
        counts.set(DeviceType::Transformer, 1);

        let (cost, energy) = compute_totals(&counts, &DeviceCatalog::standard());
        // 50000 + 10000
        assert_eq!(cost, 60_000.0);
        // 2 - 0.5
        assert_eq!(energy, 1.5);
    }

    #[test]
    fn test_empty_counts() {
        let (cost, energy) = compute_totals(&CountMap::zeroed(), &DeviceCatalog::standard());
        assert_eq!(cost, 0.0);
        assert_eq!(energy, 0.0);
    }

    #[test]
    fn test_mixed_fleet_dot_product() {
        let mut counts = CountMap::zeroed();
        counts.set(DeviceType::MegapackXL, 2);
        counts.set(DeviceType::Megapack2, 1);
        counts.set(DeviceType::PowerPack, 3);
        counts.set(DeviceType::Transformer, 3);

        let (cost, energy) = compute_totals(&counts, &DeviceCatalog::standard());
        // 240000 + 80000 + 30000 + 30000
        assert_eq!(cost, 380_000.0);
        // 8 + 3 + 3 - 1.5
        assert_eq!(energy, 12.5);
    }

    #[test]
    fn test_energy_density_guards_zero_area() {
        assert_eq!(energy_density(5.0, 0.0), 0.0);
        assert_eq!(energy_density(-0.5, 0.0), 0.0);
        assert_eq!(energy_density(1.5, 300.0), 0.005);
    }
}
