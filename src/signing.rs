//! Workflow boundary: composing a full per-document overlay plan.
//!
//! [`plan_document`] ties the placement pieces together: signature boxes at
//! their recorded positions, the QR box on its targeted pages, and the
//! wrapped validation sentence beside each QR. The output is pure layout
//! data; a PDF writer applies it.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::placement::{
    layout_validation_text, plan_signature, text_ops, DrawOp, HelveticaMetrics, PageGeometry,
    PlacementOutcome, QrPlacementConfig, SignatureArtwork, SignaturePlacement, SignaturePosition,
    SkipReason, TextLayoutOptions, ValidationDetails,
};

/// Who is signing, as shown in the validation sentence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignerMetadata {
    /// Signer display name.
    pub name: String,
    /// Signer taxpayer ID (CPF/CNPJ), when known.
    pub taxpayer_id: Option<String>,
}

/// QR portion of a signing request.
#[derive(Debug, Clone)]
pub struct QrRequest {
    /// Corner, target pages, margin and size.
    pub config: QrPlacementConfig,
    /// XObject resource name of the QR image registered by the writer.
    pub resource_id: String,
    /// Validation text sizing.
    pub text: TextLayoutOptions,
}

impl QrRequest {
    /// A QR request with default placement and text sizing.
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            config: QrPlacementConfig::default(),
            resource_id: resource_id.into(),
            text: TextLayoutOptions::default(),
        }
    }
}

/// Everything a caller provides to plan one document's overlay.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// Signer identity for the validation sentence.
    pub signer: SignerMetadata,
    /// Recorded signature positions. May be empty; may repeat pages.
    pub positions: Vec<SignaturePosition>,
    /// Signature image, when one was uploaded.
    pub artwork: Option<SignatureArtwork>,
    /// QR and validation text, when requested.
    pub qr: Option<QrRequest>,
    /// Signature timestamp for the validation sentence.
    pub signed_at: DateTime<Utc>,
    /// Access code gating the validation page, when one exists.
    pub access_code: Option<String>,
}

/// A placement that could not be drawn, and why.
///
/// Notes are advisory: the rest of the plan is unaffected. A position
/// pointing past the document's last page most often means the document was
/// re-rendered shorter after positions were captured.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanNote {
    /// A recorded position targets a page the document does not have.
    PositionOutOfRange {
        /// Index into [`SigningRequest::positions`].
        index: usize,
        /// The out-of-range page number.
        page: u32,
    },
    /// The validation text did not fit beside the QR on this page.
    TextSkipped {
        /// Page where the text was skipped. The QR itself is still drawn.
        page: u32,
        /// Why it did not fit.
        reason: SkipReason,
    },
}

/// Planned overlay content for one page.
#[derive(Debug, Clone)]
pub struct PagePlan {
    /// Page number, 1-based.
    pub page: u32,
    /// Signature boxes placed on this page.
    pub signatures: Vec<SignaturePlacement>,
    /// Combined operator sequence for the page overlay.
    pub ops: Vec<DrawOp>,
}

/// The full overlay plan for a document.
#[derive(Debug, Clone)]
pub struct DocumentPlan {
    /// Pages with overlay content, in page order. Pages without content are
    /// absent.
    pub pages: Vec<PagePlan>,
    /// Placements that were skipped.
    pub notes: Vec<PlanNote>,
}

impl DocumentPlan {
    /// The plan for a specific page, if it has overlay content.
    pub fn page(&self, page: u32) -> Option<&PagePlan> {
        self.pages.iter().find(|p| p.page == page)
    }
}

/// Compose the overlay plan for a document.
///
/// `pages` carries the actual dimensions of every page, in order. Signature
/// positions resolve against their own page's dimensions; the QR lands on the
/// pages its config targets, with the validation sentence wrapped beside it
/// wherever it fits.
pub fn plan_document(
    pages: &[PageGeometry],
    request: &SigningRequest,
    certificate_serial: &str,
    validate_url: &str,
) -> Result<DocumentPlan> {
    let page_count = pages.len() as u32;
    let mut notes = Vec::new();
    let mut plans: Vec<PagePlan> = Vec::new();

    let page_plan = |page: u32, plans: &mut Vec<PagePlan>| -> usize {
        match plans.iter().position(|p| p.page == page) {
            Some(i) => i,
            None => {
                plans.push(PagePlan {
                    page,
                    signatures: Vec::new(),
                    ops: Vec::new(),
                });
                plans.len() - 1
            },
        }
    };

    for (index, position) in request.positions.iter().enumerate() {
        if position.page == 0 || position.page > page_count {
            warn!(
                "signature position {index} targets page {} of a {page_count}-page document, skipping",
                position.page
            );
            notes.push(PlanNote::PositionOutOfRange {
                index,
                page: position.page,
            });
            continue;
        }
        let geometry = pages[(position.page - 1) as usize];
        let placement = plan_signature(geometry, position, request.artwork.as_ref())?;
        let i = page_plan(position.page, &mut plans);
        plans[i].ops.extend(placement.ops.iter().cloned());
        plans[i].signatures.push(placement);
    }

    if let Some(qr) = &request.qr {
        let mut details = ValidationDetails::new(
            request.signer.name.clone(),
            request.signed_at,
            validate_url,
        );
        details.taxpayer_id = request.signer.taxpayer_id.clone();
        details.certificate_serial = Some(certificate_serial.to_string());
        details.access_code = request.access_code.clone();
        let sentence = details.sentence();

        for page in qr.config.resolve_pages(page_count) {
            let geometry = pages[(page - 1) as usize];
            let rect = qr.config.anchor(geometry);
            let i = page_plan(page, &mut plans);
            plans[i].ops.extend(qr.config.qr_ops(rect, &qr.resource_id));

            match layout_validation_text(
                geometry,
                rect,
                qr.config.corner,
                qr.config.margin,
                &sentence,
                &HelveticaMetrics,
                qr.text,
            ) {
                PlacementOutcome::Placed(block) => {
                    plans[i].ops.extend(text_ops(&block));
                },
                PlacementOutcome::Skipped(reason) => {
                    debug!("validation text skipped on page {page}: {reason:?}");
                    notes.push(PlanNote::TextSkipped { page, reason });
                },
            }
        }
    }

    plans.sort_by_key(|p| p.page);
    Ok(DocumentPlan {
        pages: plans,
        notes,
    })
}
