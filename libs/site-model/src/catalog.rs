//! Device catalog for energy-storage sites
//!
//! The catalog is fixed per deployment: four battery types the user may request, plus the
//! transformer, which the engine derives from the battery total. Entries are declared in
//! catalog order, and that order drives count serialization and rectangle id numbering.

use crate::error::{Result, SiteError};
use serde::{Deserialize, Serialize};

/// Site width cap shipped with the standard deployment (feet)
pub const DEFAULT_MAX_WIDTH_FT: f64 = 100.0;

// ============================================================================
// Device Type Enum
// ============================================================================

/// All device types in the catalog, in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    /// Megapack XL - largest battery footprint
    MegapackXL,
    /// Megapack 2
    Megapack2,
    /// Megapack
    Megapack,
    /// PowerPack - smallest battery unit
    PowerPack,
    /// Transformer - derived, never user-set
    Transformer,
}

impl DeviceType {
    /// Get all device types in catalog order
    pub fn all() -> &'static [DeviceType] {
        &[
            Self::MegapackXL,
            Self::Megapack2,
            Self::Megapack,
            Self::PowerPack,
            Self::Transformer,
        ]
    }

    /// User-controllable battery types
    pub fn battery_types() -> &'static [DeviceType] {
        &[
            Self::MegapackXL,
            Self::Megapack2,
            Self::Megapack,
            Self::PowerPack,
        ]
    }

    pub fn is_battery(&self) -> bool {
        !matches!(self, Self::Transformer)
    }

    /// Catalog name, as used in request keys and rectangle ids
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MegapackXL => "MegapackXL",
            Self::Megapack2 => "Megapack2",
            Self::Megapack => "Megapack",
            Self::PowerPack => "PowerPack",
            Self::Transformer => "Transformer",
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Device Spec
// ============================================================================

/// Physical and commercial properties of one device type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSpec {
    /// Footprint width (ft)
    pub width: f64,
    /// Footprint depth (ft)
    pub depth: f64,
    /// Net energy capacity; negative for consumers
    #[serde(rename = "energyCapacityMWh")]
    pub energy_capacity_mwh: f64,
    pub unit_cost: f64,
    #[serde(default)]
    pub release_year: Option<u16>,
}

impl DeviceSpec {
    pub const fn new(
        width: f64,
        depth: f64,
        energy_capacity_mwh: f64,
        unit_cost: f64,
        release_year: Option<u16>,
    ) -> Self {
        Self {
            width,
            depth,
            energy_capacity_mwh,
            unit_cost,
            release_year,
        }
    }

    fn validate(&self, device_type: DeviceType) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(SiteError::invalid_catalog(
                device_type.as_str(),
                format!("width must be a positive number, got {}", self.width),
            ));
        }
        if !(self.depth.is_finite() && self.depth > 0.0) {
            return Err(SiteError::invalid_catalog(
                device_type.as_str(),
                format!("depth must be a positive number, got {}", self.depth),
            ));
        }
        if !self.energy_capacity_mwh.is_finite() {
            return Err(SiteError::invalid_catalog(
                device_type.as_str(),
                "energyCapacityMWh must be finite",
            ));
        }
        if !self.unit_cost.is_finite() {
            return Err(SiteError::invalid_catalog(
                device_type.as_str(),
                "unitCost must be finite",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Device Catalog
// ============================================================================

/// Complete catalog: exactly one spec per device type
///
/// Serialized as a map keyed by catalog name, in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceCatalog {
    #[serde(rename = "MegapackXL")]
    pub megapack_xl: DeviceSpec,
    #[serde(rename = "Megapack2")]
    pub megapack_2: DeviceSpec,
    #[serde(rename = "Megapack")]
    pub megapack: DeviceSpec,
    #[serde(rename = "PowerPack")]
    pub power_pack: DeviceSpec,
    #[serde(rename = "Transformer")]
    pub transformer: DeviceSpec,
}

impl DeviceCatalog {
    /// The catalog shipped with the standard deployment
    pub fn standard() -> Self {
        Self {
            megapack_xl: DeviceSpec::new(40.0, 10.0, 4.0, 120_000.0, Some(2022)),
            megapack_2: DeviceSpec::new(30.0, 10.0, 3.0, 80_000.0, Some(2021)),
            megapack: DeviceSpec::new(30.0, 10.0, 2.0, 50_000.0, Some(2005)),
            power_pack: DeviceSpec::new(10.0, 10.0, 1.0, 10_000.0, Some(2000)),
            transformer: DeviceSpec::new(10.0, 10.0, -0.5, 10_000.0, None),
        }
    }

    /// Look up the spec for a device type
    pub fn spec(&self, device_type: DeviceType) -> &DeviceSpec {
        match device_type {
            DeviceType::MegapackXL => &self.megapack_xl,
            DeviceType::Megapack2 => &self.megapack_2,
            DeviceType::Megapack => &self.megapack,
            DeviceType::PowerPack => &self.power_pack,
            DeviceType::Transformer => &self.transformer,
        }
    }

    /// Iterate entries in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (DeviceType, &DeviceSpec)> + '_ {
        DeviceType::all().iter().map(move |&t| (t, self.spec(t)))
    }

    /// Check every entry's invariants (positive finite footprint, finite energy and cost)
    pub fn validate(&self) -> Result<()> {
        for (device_type, spec) in self.iter() {
            spec.validate(device_type)?;
        }
        Ok(())
    }

    /// Widest footprint in the catalog
    pub fn max_device_width(&self) -> f64 {
        self.iter().map(|(_, s)| s.width).fold(0.0, f64::max)
    }
}

impl Default for DeviceCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
