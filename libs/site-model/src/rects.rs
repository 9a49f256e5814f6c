//! Rectangle expansion: one footprint per physical unit

use crate::catalog::{DeviceCatalog, DeviceType};
use crate::counts::CountMap;
use serde::{Deserialize, Serialize};

/// Footprint of a single unit, alive for one compute call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// `{type}-{n}`, unique within the call
    pub id: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub width: f64,
    pub depth: f64,
}

impl Rectangle {
    pub fn area(&self) -> f64 {
        self.width * self.depth
    }
}

/// Expand counts into unit rectangles, largest footprint first
///
/// Ids use one sequence across the whole expansion in catalog order, so the third unit
/// overall is `-3` whatever its type. The area sort is stable: equal-area rectangles
/// keep their expansion order.
pub fn expand_rectangles(counts: &CountMap, catalog: &DeviceCatalog) -> Vec<Rectangle> {
    let capacity = usize::try_from(counts.unit_total()).unwrap_or(0);
    let mut rects = Vec::with_capacity(capacity);
    let mut seq: u64 = 1;

    for (device_type, count) in counts.iter() {
        let spec = catalog.spec(device_type);
        for _ in 0..count {
            rects.push(Rectangle {
                id: format!("{}-{}", device_type, seq),
                device_type,
                width: spec.width,
                depth: spec.depth,
            });
            seq += 1;
        }
    }

    // slice::sort_by is stable
    rects.sort_by(|a, b| b.area().total_cmp(&a.area()));
    rects
}
