//! QR code placement.
//!
//! The QR image itself comes from an external encoder; this module only
//! decides where its box goes on which pages.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

use super::engine::{DrawOp, PageGeometry};

/// Default margin between the QR box and the page edges.
pub const DEFAULT_QR_MARGIN: f32 = 30.0;
/// Default QR box edge length.
pub const DEFAULT_QR_SIZE: f32 = 80.0;

/// Page corner anchoring the QR box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QrCorner {
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
}

impl QrCorner {
    /// Whether this corner sits on the right half of the page.
    ///
    /// Drives the validation text's horizontal flip: text goes to the left
    /// of a right-side QR so it cannot run off the page edge.
    pub fn is_right_side(&self) -> bool {
        matches!(self, QrCorner::BottomRight | QrCorner::TopRight)
    }
}

/// Which pages of the document receive the QR box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetPages {
    /// First page only.
    First,
    /// Last page only.
    Last,
    /// Every page.
    All,
}

/// QR placement configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrPlacementConfig {
    /// Anchoring corner.
    pub corner: QrCorner,
    /// Pages receiving the QR.
    pub target_pages: TargetPages,
    /// Margin from the page edges.
    #[serde(default = "default_margin")]
    pub margin: f32,
    /// QR box edge length.
    #[serde(default = "default_size")]
    pub size: f32,
}

fn default_margin() -> f32 {
    DEFAULT_QR_MARGIN
}

fn default_size() -> f32 {
    DEFAULT_QR_SIZE
}

impl Default for QrPlacementConfig {
    fn default() -> Self {
        Self {
            corner: QrCorner::BottomLeft,
            target_pages: TargetPages::Last,
            margin: DEFAULT_QR_MARGIN,
            size: DEFAULT_QR_SIZE,
        }
    }
}

impl QrPlacementConfig {
    /// The QR box against a page's dimensions.
    pub fn anchor(&self, page: PageGeometry) -> Rect {
        let x = match self.corner {
            QrCorner::BottomLeft | QrCorner::TopLeft => self.margin,
            QrCorner::BottomRight | QrCorner::TopRight => page.width - self.margin - self.size,
        };
        let y = match self.corner {
            QrCorner::BottomLeft | QrCorner::BottomRight => self.margin,
            QrCorner::TopLeft | QrCorner::TopRight => page.height - self.margin - self.size,
        };
        Rect::new(x, y, self.size, self.size)
    }

    /// The 1-based page numbers receiving the QR.
    pub fn resolve_pages(&self, page_count: u32) -> Vec<u32> {
        if page_count == 0 {
            return Vec::new();
        }
        match self.target_pages {
            TargetPages::First => vec![1],
            TargetPages::Last => vec![page_count],
            TargetPages::All => (1..=page_count).collect(),
        }
    }

    /// Draw instructions painting the QR XObject into its box.
    pub fn qr_ops(&self, rect: Rect, resource_id: &str) -> Vec<DrawOp> {
        vec![
            DrawOp::SaveState,
            DrawOp::Transform(rect.width, 0.0, 0.0, rect.height, rect.x, rect.y),
            DrawOp::PaintXObject(resource_id.to_string()),
            DrawOp::RestoreState,
        ]
    }
}
