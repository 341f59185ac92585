//! Validation text layout.
//!
//! Wraps the validation sentence shown next to the QR box. The sentence
//! wording is owned by the consuming layer; the field order, wrap behavior
//! and skip policy live here because they must reproduce the visual layout
//! of previously signed documents exactly.

use chrono::{DateTime, Utc};

use crate::geometry::Rect;

use super::engine::{DrawOp, PageGeometry};
use super::qr::QrCorner;

/// Default maximum validation text box width.
pub const DEFAULT_TEXT_MAX_WIDTH: f32 = 200.0;
/// Default validation text font size.
pub const DEFAULT_TEXT_FONT_SIZE: f32 = 8.0;
/// Line height multiplier over the font size.
const LINE_SPACING: f32 = 1.2;

/// Fields substituted into the validation sentence.
#[derive(Debug, Clone)]
pub struct ValidationDetails {
    /// Legal framework named in the sentence.
    pub framework: String,
    /// Platform name.
    pub platform: String,
    /// Signer display name.
    pub signer_name: String,
    /// Signer taxpayer ID (CPF/CNPJ), when known.
    pub taxpayer_id: Option<String>,
    /// Serial of the certificate that signed the document.
    pub certificate_serial: Option<String>,
    /// Signature timestamp.
    pub signed_at: DateTime<Utc>,
    /// URL where the signature can be validated.
    pub validate_url: String,
    /// Access code gating the validation page, when one exists.
    pub access_code: Option<String>,
}

impl ValidationDetails {
    /// Details with the platform's standard framework and platform names.
    pub fn new(
        signer_name: impl Into<String>,
        signed_at: DateTime<Utc>,
        validate_url: impl Into<String>,
    ) -> Self {
        Self {
            framework: "MP 2.200-2/2001".to_string(),
            platform: "Signet".to_string(),
            signer_name: signer_name.into(),
            taxpayer_id: None,
            certificate_serial: None,
            signed_at,
            validate_url: validate_url.into(),
            access_code: None,
        }
    }

    /// Render the validation sentence with every present field in its
    /// fixed position.
    pub fn sentence(&self) -> String {
        let mut s = format!(
            "Document digitally signed under {}, in {}, by {}",
            self.framework, self.platform, self.signer_name
        );
        if let Some(id) = &self.taxpayer_id {
            s.push_str(", ");
            s.push_str(id);
        }
        if let Some(serial) = &self.certificate_serial {
            s.push_str(", certificate ");
            s.push_str(serial);
        }
        s.push_str(&format!(
            " on {} and can be validated at {}.",
            self.signed_at.format("%Y-%m-%d %H:%M UTC"),
            self.validate_url
        ));
        if let Some(code) = &self.access_code {
            s.push_str(&format!(" Access code: {code}."));
        }
        s
    }
}

/// Per-string width measurement for a font.
pub trait TextMeasurer {
    /// Width of `text` in points at `font_size`.
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

/// Standard Helvetica metrics (AFM widths, 1/1000 em units).
#[derive(Debug, Clone, Copy, Default)]
pub struct HelveticaMetrics;

impl TextMeasurer for HelveticaMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: f32 = text.chars().map(helvetica_char_width).sum();
        units * font_size / 1000.0
    }
}

/// AFM character width in 1/1000 em for the Helvetica base font.
fn helvetica_char_width(ch: char) -> f32 {
    match ch {
        ' ' | '!' | ',' | '.' | '/' | ':' | ';' | '[' | '\\' | ']' => 278.0,
        '"' => 355.0,
        '\'' => 191.0,
        '(' | ')' | '-' | '`' | 'r' => 333.0,
        '*' => 389.0,
        '+' | '<' | '=' | '>' | '~' | '^' => 584.0,
        '0'..='9' | '#' | '$' | '?' | '_' => 556.0,
        '%' => 889.0,
        '&' | 'A' | 'B' | 'E' | 'K' | 'V' | 'X' | 'Y' => 667.0,
        '@' => 1015.0,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 722.0,
        'F' | 'T' | 'Z' => 611.0,
        'G' | 'O' | 'P' | 'Q' => 778.0,
        'I' => 278.0,
        'J' | 'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 500.0,
        'L' => 556.0,
        'M' => 833.0,
        'S' => 667.0,
        'W' => 944.0,
        'a' | 'b' | 'd' | 'e' | 'g' | 'h' | 'n' | 'o' | 'p' | 'q' | 'u' => 556.0,
        'f' | 't' => 278.0,
        'i' | 'j' | 'l' => 222.0,
        'm' => 833.0,
        'w' => 722.0,
        '{' | '}' => 334.0,
        '|' => 260.0,
        // Accented and unknown glyphs approximate to the average lowercase width.
        _ => 556.0,
    }
}

/// Greedy word wrap: append each word, flushing the line when the candidate
/// exceeds `max_width`. A single over-wide word still gets its own line.
pub fn wrap_text(
    text: &str,
    max_width: f32,
    font_size: f32,
    measurer: &impl TextMeasurer,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if measurer.text_width(&candidate, font_size) > max_width {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// A laid-out validation text block.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    /// Left edge of the text box.
    pub x: f32,
    /// Top edge of the text box (first line hangs below it).
    pub top: f32,
    /// Font size in points.
    pub font_size: f32,
    /// Baseline-to-baseline distance.
    pub line_height: f32,
    /// Wrapped lines, in reading order.
    pub lines: Vec<String>,
}

/// Why a text placement was skipped rather than drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The text box would cross the left margin (QR on the right half).
    PastLeftBound,
    /// The text box would cross the right margin (QR on the left half).
    PastRightBound,
    /// The wrapped lines would descend past the bottom margin.
    PastBottomBound,
}

/// Outcome of a text layout attempt.
///
/// Skipping is a designed no-op, not an error: partial or overlapping
/// validation text is worse than omitting it, so overflow skips the
/// placement entirely and reports why.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementOutcome {
    /// The text fits and should be drawn.
    Placed(TextBlock),
    /// The text would overflow; nothing is drawn for this placement.
    Skipped(SkipReason),
}

/// Layout options for the validation text box.
#[derive(Debug, Clone, Copy)]
pub struct TextLayoutOptions {
    /// Maximum text box width.
    pub max_width: f32,
    /// Font size in points.
    pub font_size: f32,
}

impl Default for TextLayoutOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_TEXT_MAX_WIDTH,
            font_size: DEFAULT_TEXT_FONT_SIZE,
        }
    }
}

/// Lay out the validation sentence beside a QR box.
///
/// The text anchors to the right of the QR, flipping to the left when the QR
/// sits on the right half of the page. Overflow past the page margin on
/// either side, or past the bottom margin, yields
/// [`PlacementOutcome::Skipped`]; the QR itself is unaffected.
pub fn layout_validation_text(
    page: PageGeometry,
    qr: Rect,
    corner: QrCorner,
    margin: f32,
    sentence: &str,
    measurer: &impl TextMeasurer,
    options: TextLayoutOptions,
) -> PlacementOutcome {
    // The gap between the QR box and the text box matches the page margin.
    let x = if corner.is_right_side() {
        let desired = qr.left() - margin - options.max_width;
        if desired < margin {
            return PlacementOutcome::Skipped(SkipReason::PastLeftBound);
        }
        desired
    } else {
        let desired = qr.right() + margin;
        if desired + options.max_width > page.width - margin {
            return PlacementOutcome::Skipped(SkipReason::PastRightBound);
        }
        desired
    };

    let lines = wrap_text(sentence, options.max_width, options.font_size, measurer);
    let line_height = options.font_size * LINE_SPACING;
    let top = qr.top();
    let bottom = top - line_height * lines.len() as f32;
    if bottom < margin {
        return PlacementOutcome::Skipped(SkipReason::PastBottomBound);
    }

    PlacementOutcome::Placed(TextBlock {
        x,
        top,
        font_size: options.font_size,
        line_height,
        lines,
    })
}

/// Draw instructions for a laid-out text block.
pub fn text_ops(block: &TextBlock) -> Vec<DrawOp> {
    let mut ops = vec![
        DrawOp::BeginText,
        DrawOp::SetFont("Helvetica".to_string(), block.font_size),
        DrawOp::MoveText(block.x, block.top - block.font_size),
    ];
    for (index, line) in block.lines.iter().enumerate() {
        if index > 0 {
            ops.push(DrawOp::MoveText(0.0, -block.line_height));
        }
        ops.push(DrawOp::ShowText(line.clone()));
    }
    ops.push(DrawOp::EndText);
    ops
}
