//! Site Model Library
//!
//! Compute engine for battery-storage site planning. Turns requested device counts into
//! a complete count set, cost and energy totals, and a shelf-packed 2D layout under a
//! maximum site width. Pure business logic: no I/O, no shared state.
//!
//! # Modules
//!
//! - `catalog`: Device types and their footprint, energy and cost
//! - `counts`: Permissive count normalization and transformer derivation
//! - `totals`: Cost and net energy aggregation
//! - `rects`: Expansion of counts into unit rectangles
//! - `packer`: Greedy shelf packing under the width cap
//! - `compute`: Orchestrator and [`SiteEngine`]
//!
//! # Example
//!
//! ```
//! use site_model::{DeviceType, SiteEngine};
//! use serde_json::json;
//!
//! let engine = SiteEngine::standard();
//! let result = engine.compute_all(&json!({ "Megapack": 3 })).unwrap();
//!
//! assert_eq!(result.counts.get(DeviceType::Transformer), 2);
//! assert!(result.layout.site_width_ft <= result.layout.max_width_ft);
//! ```

pub mod catalog;
pub mod compute;
pub mod counts;
pub mod error;
pub mod packer;
pub mod rects;
pub mod totals;

// Re-exports for convenience
pub use catalog::{DeviceCatalog, DeviceSpec, DeviceType, DEFAULT_MAX_WIDTH_FT};
pub use compute::{compute_all, compute_from_counts, ComputeResult, SiteEngine};
pub use counts::{normalize_counts, normalize_value, CountMap};
pub use error::{Result, SiteError};
pub use packer::{pack_layout, Placement, SiteLayout};
pub use rects::{expand_rectangles, Rectangle};
pub use totals::{compute_totals, Totals};
