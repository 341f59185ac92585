//! Signature, QR and validation text placement.
//!
//! Everything here is pure layout: inputs are page dimensions and recorded
//! positions, outputs are rectangles and draw instructions. No PDF is parsed
//! or written by this module, so the math is testable without documents.

pub mod engine;
pub mod position;
pub mod qr;
pub mod text;

pub use engine::{
    ops_to_bytes, plan_signature, DrawOp, PageGeometry, SignatureArtwork, SignaturePlacement,
    FALLBACK_HEIGHT, FALLBACK_WIDTH,
};
pub use position::SignaturePosition;
pub use qr::{
    QrCorner, QrPlacementConfig, TargetPages, DEFAULT_QR_MARGIN, DEFAULT_QR_SIZE,
};
pub use text::{
    layout_validation_text, text_ops, wrap_text, HelveticaMetrics, PlacementOutcome, SkipReason,
    TextBlock, TextLayoutOptions, TextMeasurer, ValidationDetails, DEFAULT_TEXT_FONT_SIZE,
    DEFAULT_TEXT_MAX_WIDTH,
};
