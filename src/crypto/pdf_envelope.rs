//! Password-gated protection of whole PDF buffers.
//!
//! Once protected, the serialized ciphertext is the only durable
//! representation of the document: the original bytes are never stored in
//! plaintext again. Usage permissions travel alongside the payload so the
//! consuming viewer can enforce them after unprotecting. An optional
//! human-readable cover notice can be shown in place of the document; it
//! carries no recoverable content.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::password::{decrypt_with_password, encrypt_with_password};

/// Usage permissions the consuming viewer enforces on a protected document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfPermissions {
    /// Whether the document may be printed.
    pub allow_printing: bool,
    /// Whether content may be copied out.
    pub allow_copying: bool,
    /// Whether the document may be modified.
    pub allow_modification: bool,
    /// Whether annotations may be added.
    pub allow_annotations: bool,
}

impl Default for PdfPermissions {
    /// View and print only.
    fn default() -> Self {
        Self {
            allow_printing: true,
            allow_copying: false,
            allow_modification: false,
            allow_annotations: false,
        }
    }
}

/// A password-protected document.
///
/// `payload` is the only durable form of the content. Permissions are stored
/// in the clear: they gate viewer behavior, not content recovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectedPdf {
    /// Serialized `pbe1:` payload holding the encrypted document bytes.
    pub payload: String,
    /// Permissions to enforce once unprotected.
    pub permissions: PdfPermissions,
}

/// Encrypt a PDF buffer under a password-derived key.
///
/// The returned structure is the only durable form of the document once the
/// caller discards the plaintext; the permissions ride along unencrypted.
pub fn protect_pdf(
    pdf_bytes: &[u8],
    password: &str,
    permissions: PdfPermissions,
) -> Result<ProtectedPdf> {
    Ok(ProtectedPdf {
        payload: encrypt_with_password(pdf_bytes, password)?,
        permissions,
    })
}

/// Recover the original PDF bytes from a protected document.
///
/// Fails closed with [`Error::Integrity`](crate::error::Error::Integrity) on
/// a wrong password, identically to the key-encryption contract. Enforcing
/// [`ProtectedPdf::permissions`] on the recovered bytes is the caller's job.
pub fn unprotect_pdf(protected: &ProtectedPdf, password: &str) -> Result<Vec<u8>> {
    decrypt_with_password(&protected.payload, password)
}

/// Display text for a protected document's cover page.
///
/// Rendered by the caller in place of the document. Contains nothing
/// recoverable from the original bytes.
pub fn protected_cover_notice(document_name: &str) -> String {
    format!(
        "This document ({document_name}) is password protected. \
         Enter the access password to view its contents."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_protect_unprotect_roundtrip() {
        let pdf = b"%PDF-1.7\n1 0 obj\n<< /Type /Catalog >>\nendobj\n%%EOF";
        let protected = protect_pdf(pdf, "doc-password", PdfPermissions::default()).unwrap();
        assert!(!protected.payload.contains("%PDF"));
        let recovered = unprotect_pdf(&protected, "doc-password").unwrap();
        assert_eq!(recovered, pdf);
    }

    #[test]
    fn test_wrong_password_fails_closed() {
        let protected = protect_pdf(b"%PDF-1.7", "right", PdfPermissions::default()).unwrap();
        let err = unprotect_pdf(&protected, "wrong").unwrap_err();
        assert!(matches!(err, Error::Integrity));
    }

    #[test]
    fn test_permissions_travel_with_the_payload() {
        let permissions = PdfPermissions {
            allow_printing: false,
            allow_copying: false,
            allow_modification: false,
            allow_annotations: true,
        };
        let protected = protect_pdf(b"%PDF-1.7", "pw", permissions).unwrap();
        assert_eq!(protected.permissions, permissions);

        // Round-trip through the serialized form callers persist.
        let json = serde_json::to_string(&protected).unwrap();
        let restored: ProtectedPdf = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.permissions, permissions);
        assert_eq!(unprotect_pdf(&restored, "pw").unwrap(), b"%PDF-1.7");
    }

    #[test]
    fn test_default_permissions_view_and_print_only() {
        let permissions = PdfPermissions::default();
        assert!(permissions.allow_printing);
        assert!(!permissions.allow_copying);
        assert!(!permissions.allow_modification);
        assert!(!permissions.allow_annotations);
    }

    #[test]
    fn test_cover_notice_has_no_content() {
        let notice = protected_cover_notice("contract.pdf");
        assert!(notice.contains("contract.pdf"));
        assert!(notice.contains("password protected"));
    }
}
