//! Greedy shelf packer
//!
//! Places rectangles left to right in rows under a fixed width cap, wrapping to a new
//! row when the next rectangle would cross the cap. Rows never reorder, gaps are never
//! back-filled and rectangles never rotate, so the result is fully determined by the
//! input order.

use crate::catalog::DeviceType;
use crate::error::{Result, SiteError};
use crate::rects::Rectangle;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A rectangle with its top-left corner on the site (ft)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub id: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub width: f64,
    pub depth: f64,
    pub x: f64,
    pub y: f64,
}

impl Placement {
    fn at(rect: Rectangle, x: f64, y: f64) -> Self {
        Self {
            id: rect.id,
            device_type: rect.device_type,
            width: rect.width,
            depth: rect.depth,
            x,
            y,
        }
    }

    /// Right edge (x + width)
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (y + depth)
    pub fn bottom(&self) -> f64 {
        self.y + self.depth
    }
}

/// Packed layout with its bounding box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteLayout {
    pub placements: Vec<Placement>,
    pub site_width_ft: f64,
    pub site_length_ft: f64,
    pub site_area_sq_ft: f64,
    pub max_width_ft: f64,
}

impl SiteLayout {
    /// Number of shelves used
    pub fn row_count(&self) -> usize {
        let mut rows = 0;
        let mut last_y = None;
        for p in &self.placements {
            if last_y != Some(p.y) {
                rows += 1;
                last_y = Some(p.y);
            }
        }
        rows
    }
}

/// Pack rectangles into shelves no wider than `max_width_ft`
///
/// Fails with [`SiteError::LayoutInfeasible`] as soon as a rectangle is wider than the
/// cap on its own.
pub fn pack_layout(rects: Vec<Rectangle>, max_width_ft: f64) -> Result<SiteLayout> {
    let mut placements = Vec::with_capacity(rects.len());
    let mut x = 0.0_f64;
    let mut y = 0.0_f64;
    let mut row_height = 0.0_f64;
    let mut used_width = 0.0_f64;

    for rect in rects {
        if rect.width > max_width_ft {
            warn!(
                device = %rect.device_type,
                width = rect.width,
                max_width_ft,
                "Device wider than site width cap"
            );
            return Err(SiteError::layout_infeasible(
                rect.device_type.as_str(),
                rect.width,
                max_width_ft,
            ));
        }

        if x + rect.width > max_width_ft {
            y += row_height;
            x = 0.0;
            row_height = 0.0;
        }

        let (width, depth) = (rect.width, rect.depth);
        placements.push(Placement::at(rect, x, y));
        x += width;
        row_height = row_height.max(depth);
        used_width = used_width.max(x);
    }

    let site_width_ft = max_width_ft.min(used_width);
    let site_length_ft = y + row_height;
    let site_area_sq_ft = site_width_ft * site_length_ft;

    debug!(
        placed = placements.len(),
        site_width_ft, site_length_ft, "Packed site layout"
    );

    Ok(SiteLayout {
        placements,
        site_width_ft,
        site_length_ft,
        site_area_sq_ft,
        max_width_ft,
    })
}
