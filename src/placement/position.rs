//! Signature position resolution.
//!
//! Positions are recorded as fractions of page width/height so a document
//! re-rendered at different dimensions keeps its signatures anchored at the
//! same relative spot. `ny` is measured from the page's top edge (screen
//! convention at capture time) and inverted here into PDF's bottom-left
//! origin.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// A recorded signature position on a page.
///
/// Either the normalized pair (`nx`, `ny`) or the legacy absolute pair
/// (`x`, `y` with the reference `page_width`/`page_height` they were recorded
/// against) is present; with neither, resolution falls back to page center.
/// Multiple positions may target the same page (multiple signers); positions
/// are independent and order-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignaturePosition {
    /// Target page, 1-based.
    pub page: u32,
    /// Horizontal anchor as a fraction of page width.
    #[serde(default)]
    pub nx: Option<f32>,
    /// Vertical anchor as a fraction of page height, measured from the top.
    #[serde(default)]
    pub ny: Option<f32>,
    /// Scale multiplier applied to the signature box. Must be positive.
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Rotation around the anchor point, in degrees.
    #[serde(default)]
    pub rotation_degrees: f32,
    /// Legacy absolute x, in the coordinate space of `page_width`.
    #[serde(default)]
    pub x: Option<f32>,
    /// Legacy absolute y (top-origin), in the coordinate space of `page_height`.
    #[serde(default)]
    pub y: Option<f32>,
    /// Page width the legacy coordinates were recorded against.
    #[serde(default)]
    pub page_width: Option<f32>,
    /// Page height the legacy coordinates were recorded against.
    #[serde(default)]
    pub page_height: Option<f32>,
}

fn default_scale() -> f32 {
    1.0
}

impl SignaturePosition {
    /// A normalized position with unit scale and no rotation.
    pub fn new(page: u32, nx: f32, ny: f32) -> Self {
        Self {
            page,
            nx: Some(nx),
            ny: Some(ny),
            scale: 1.0,
            rotation_degrees: 0.0,
            x: None,
            y: None,
            page_width: None,
            page_height: None,
        }
    }

    /// The normalized anchor pair, after legacy conversion and clamping.
    pub fn normalized(&self) -> (f32, f32) {
        let (nx, ny) = match (self.nx, self.ny) {
            (Some(nx), Some(ny)) => (nx, ny),
            _ => match (self.x, self.y, self.page_width, self.page_height) {
                (Some(x), Some(y), Some(rw), Some(rh)) if rw > 0.0 && rh > 0.0 => {
                    (x / rw, y / rh)
                },
                // Nothing usable recorded: page center.
                _ => (0.5, 0.5),
            },
        };
        (nx.clamp(0.0, 1.0), ny.clamp(0.0, 1.0))
    }

    /// Resolve the absolute anchor point against actual page dimensions.
    ///
    /// `ny` is inverted from the top-origin capture convention into PDF's
    /// bottom-left origin.
    pub fn resolve_anchor(&self, page_width: f32, page_height: f32) -> Point {
        let (nx, ny) = self.normalized();
        Point::new(nx * page_width, page_height - ny * page_height)
    }
}
