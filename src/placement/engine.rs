//! Draw instruction planning for signature boxes.
//!
//! Converts resolved positions into PDF content-stream operator sequences.
//! The operator set is the small subset placement needs; [`ops_to_bytes`]
//! serializes a sequence into content-stream bytes for the consuming PDF
//! writer.

use std::io::Write;

use crate::error::{Error, Result};
use crate::geometry::Rect;

use super::position::SignaturePosition;

/// Fallback signature box width when the image's intrinsic size is unknown.
pub const FALLBACK_WIDTH: f32 = 240.0;
/// Fallback signature box height when the image's intrinsic size is unknown.
pub const FALLBACK_HEIGHT: f32 = 120.0;

/// Absolute page dimensions in PDF user-space points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Page width.
    pub width: f32,
    /// Page height.
    pub height: f32,
}

impl PageGeometry {
    /// Create page geometry from absolute dimensions.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// US Letter, the most common capture dimension.
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }
}

/// A signature image registered as an XObject by the consuming writer.
#[derive(Debug, Clone)]
pub struct SignatureArtwork {
    /// Intrinsic width in pixels, used as the base box width.
    pub width: f32,
    /// Intrinsic height in pixels, used as the base box height.
    pub height: f32,
    /// XObject resource name the consuming writer registered (e.g. "Sig1").
    pub resource_id: String,
}

impl SignatureArtwork {
    /// Decode image bytes to learn the intrinsic dimensions.
    pub fn from_bytes(bytes: &[u8], resource_id: impl Into<String>) -> Result<Self> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| Error::Image(format!("cannot decode signature image: {e}")))?;
        Ok(Self {
            width: img.width() as f32,
            height: img.height() as f32,
            resource_id: resource_id.into(),
        })
    }

    /// Construct from already-known dimensions.
    pub fn with_dimensions(width: f32, height: f32, resource_id: impl Into<String>) -> Self {
        Self {
            width,
            height,
            resource_id: resource_id.into(),
        }
    }
}

/// Content-stream operations emitted by the placement engine.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Concatenate transformation matrix (cm)
    Transform(f32, f32, f32, f32, f32, f32),
    /// Rectangle path (re)
    Rectangle(f32, f32, f32, f32),
    /// Set fill gray level (g)
    SetFillGray(f32),
    /// Set stroke gray level (G)
    SetStrokeGray(f32),
    /// Set line width (w)
    SetLineWidth(f32),
    /// Fill path (f)
    Fill,
    /// Fill and stroke path (B)
    FillStroke,
    /// Paint XObject (Do)
    PaintXObject(String),
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,
    /// Set font and size (Tf)
    SetFont(String, f32),
    /// Move text position (Td)
    MoveText(f32, f32),
    /// Show text (Tj)
    ShowText(String),
}

impl DrawOp {
    /// Write this operation as content-stream bytes.
    fn write(&self, out: &mut Vec<u8>) {
        let _ = match self {
            DrawOp::SaveState => writeln!(out, "q"),
            DrawOp::RestoreState => writeln!(out, "Q"),
            DrawOp::Transform(a, b, c, d, e, f) => {
                writeln!(out, "{a} {b} {c} {d} {e} {f} cm")
            },
            DrawOp::Rectangle(x, y, w, h) => writeln!(out, "{x} {y} {w} {h} re"),
            DrawOp::SetFillGray(g) => writeln!(out, "{g} g"),
            DrawOp::SetStrokeGray(g) => writeln!(out, "{g} G"),
            DrawOp::SetLineWidth(w) => writeln!(out, "{w} w"),
            DrawOp::Fill => writeln!(out, "f"),
            DrawOp::FillStroke => writeln!(out, "B"),
            DrawOp::PaintXObject(name) => writeln!(out, "/{name} Do"),
            DrawOp::BeginText => writeln!(out, "BT"),
            DrawOp::EndText => writeln!(out, "ET"),
            DrawOp::SetFont(name, size) => writeln!(out, "/{name} {size} Tf"),
            DrawOp::MoveText(x, y) => writeln!(out, "{x} {y} Td"),
            DrawOp::ShowText(text) => writeln!(out, "({}) Tj", escape_pdf_string(text)),
        };
    }
}

/// Serialize an operation sequence into content-stream bytes.
pub fn ops_to_bytes(ops: &[DrawOp]) -> Vec<u8> {
    let mut out = Vec::new();
    for op in ops {
        op.write(&mut out);
    }
    out
}

/// Escape a literal PDF string per ISO 32000-1 §7.3.4.2.
fn escape_pdf_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            '\\' => escaped.push_str("\\\\"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// A planned signature placement on one page.
#[derive(Debug, Clone)]
pub struct SignaturePlacement {
    /// Target page, 1-based.
    pub page: u32,
    /// Axis-aligned bounding box before rotation.
    pub rect: Rect,
    /// Rotation around the box center, in degrees.
    pub rotation_degrees: f32,
    /// Operator sequence drawing the signature (or its placeholder).
    pub ops: Vec<DrawOp>,
}

/// Plan the draw instructions for one signature position.
///
/// With artwork, the box is the image's intrinsic size times `scale`; without
/// it, a neutral placeholder rectangle of the same box acknowledges that a
/// position was reserved but no image attached. Rotation happens around the
/// anchor point; zero rotation emits no rotation operators at all, which
/// keeps content streams stable in readers that re-render them.
pub fn plan_signature(
    page: PageGeometry,
    position: &SignaturePosition,
    artwork: Option<&SignatureArtwork>,
) -> Result<SignaturePlacement> {
    if position.page == 0 {
        return Err(Error::InvalidPlacement("page numbers are 1-based".to_string()));
    }
    if position.scale <= 0.0 {
        return Err(Error::InvalidPlacement(format!(
            "scale must be positive, got {}",
            position.scale
        )));
    }

    let anchor = position.resolve_anchor(page.width, page.height);
    let (base_w, base_h) = match artwork {
        Some(art) => (art.width, art.height),
        None => (FALLBACK_WIDTH, FALLBACK_HEIGHT),
    };
    let width = base_w * position.scale;
    let height = base_h * position.scale;
    let rect = Rect::centered_at(anchor, width, height);

    let rotation = position.rotation_degrees;
    let mut ops = vec![DrawOp::SaveState];
    if rotation == 0.0 {
        match artwork {
            Some(art) => {
                ops.push(DrawOp::Transform(width, 0.0, 0.0, height, rect.x, rect.y));
                ops.push(DrawOp::PaintXObject(art.resource_id.clone()));
            },
            None => placeholder_ops(&mut ops, rect.x, rect.y, width, height),
        }
    } else {
        let radians = rotation.to_radians();
        let (sin, cos) = radians.sin_cos();
        // Rotate around the anchor, then draw centered on the rotated origin.
        ops.push(DrawOp::Transform(1.0, 0.0, 0.0, 1.0, anchor.x, anchor.y));
        ops.push(DrawOp::Transform(cos, sin, -sin, cos, 0.0, 0.0));
        match artwork {
            Some(art) => {
                ops.push(DrawOp::Transform(
                    width,
                    0.0,
                    0.0,
                    height,
                    -width / 2.0,
                    -height / 2.0,
                ));
                ops.push(DrawOp::PaintXObject(art.resource_id.clone()));
            },
            None => placeholder_ops(&mut ops, -width / 2.0, -height / 2.0, width, height),
        }
    }
    ops.push(DrawOp::RestoreState);

    Ok(SignaturePlacement {
        page: position.page,
        rect,
        rotation_degrees: rotation,
        ops,
    })
}

fn placeholder_ops(ops: &mut Vec<DrawOp>, x: f32, y: f32, width: f32, height: f32) {
    ops.push(DrawOp::SetFillGray(0.92));
    ops.push(DrawOp::SetStrokeGray(0.6));
    ops.push(DrawOp::SetLineWidth(0.75));
    ops.push(DrawOp::Rectangle(x, y, width, height));
    ops.push(DrawOp::FillStroke);
}
