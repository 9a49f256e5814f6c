//! Compute orchestrator
//!
//! Single entry point that runs normalization, totals, expansion and packing in that
//! order and assembles the result. All state is call-local; the only failure is an
//! infeasible layout.

use crate::catalog::{DeviceCatalog, DeviceType, DEFAULT_MAX_WIDTH_FT};
use crate::counts::{derive_transformer_count, normalize_value, CountMap};
use crate::error::{Result, SiteError};
use crate::packer::{pack_layout, SiteLayout};
use crate::rects::expand_rectangles;
use crate::totals::{compute_totals, energy_density, Totals};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Everything the caller gets back from one compute call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputeResult {
    pub counts: CountMap,
    pub totals: Totals,
    pub layout: SiteLayout,
}

/// Run the full pipeline on raw request counts
///
/// `raw_counts` may be any JSON value; only an object contributes counts. Catalog and
/// width cap are passed in rather than read from globals.
pub fn compute_all(
    raw_counts: &Value,
    catalog: &DeviceCatalog,
    max_width_ft: f64,
) -> Result<ComputeResult> {
    let counts = normalize_value(raw_counts);
    compute_from_counts(counts, catalog, max_width_ft)
}

/// Run totals, expansion and packing on a count map built by the caller
///
/// Battery counts are taken as given; the transformer count is re-derived from them.
pub fn compute_from_counts(
    mut counts: CountMap,
    catalog: &DeviceCatalog,
    max_width_ft: f64,
) -> Result<ComputeResult> {
    counts.set(
        DeviceType::Transformer,
        derive_transformer_count(counts.battery_total()),
    );

    let (total_cost, total_energy_mwh) = compute_totals(&counts, catalog);
    let rects = expand_rectangles(&counts, catalog);
    let layout = pack_layout(rects, max_width_ft)?;

    let totals = Totals {
        total_cost,
        total_energy_mwh,
        energy_density: energy_density(total_energy_mwh, layout.site_area_sq_ft),
    };

    debug!(
        units = layout.placements.len(),
        total_cost, total_energy_mwh, "Site computed"
    );

    Ok(ComputeResult {
        counts,
        totals,
        layout,
    })
}

/// Engine bound to one deployment's catalog and width cap
///
/// Immutable after construction, so one instance can serve concurrent callers by
/// shared reference.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteEngine {
    catalog: DeviceCatalog,
    max_width_ft: f64,
}

impl SiteEngine {
    /// Create an engine after validating catalog and width cap
    pub fn new(catalog: DeviceCatalog, max_width_ft: f64) -> Result<Self> {
        if !(max_width_ft.is_finite() && max_width_ft > 0.0) {
            return Err(SiteError::invalid_config(
                "max_width_ft",
                format!("must be a positive number of feet, got {}", max_width_ft),
            ));
        }
        catalog.validate()?;
        Ok(Self {
            catalog,
            max_width_ft,
        })
    }

    /// Standard catalog with the default 100 ft cap
    pub fn standard() -> Self {
        Self {
            catalog: DeviceCatalog::standard(),
            max_width_ft: DEFAULT_MAX_WIDTH_FT,
        }
    }

    pub fn catalog(&self) -> &DeviceCatalog {
        &self.catalog
    }

    pub fn max_width_ft(&self) -> f64 {
        self.max_width_ft
    }

    /// See [`compute_all`]
    pub fn compute_all(&self, raw_counts: &Value) -> Result<ComputeResult> {
        compute_all(raw_counts, &self.catalog, self.max_width_ft)
    }
}

impl Default for SiteEngine {
    fn default() -> Self {
        Self::standard()
    }
}
