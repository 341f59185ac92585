//! Key and content encryption.
//!
//! Authenticated symmetric encryption for private keys at rest (envelope
//! encryption under a platform master key) and for user-opaque payloads
//! (password-derived keys). All encryption is AES-256-GCM with a fresh
//! random 96-bit nonce per call and a 128-bit authentication tag verified
//! on decrypt. Decryption fails closed: a tag mismatch yields
//! [`Error::Integrity`](crate::error::Error::Integrity) and never partial
//! plaintext.

mod envelope;
mod master_key;
mod password;
mod pdf_envelope;

pub use envelope::{decrypt, encrypt, is_encrypted, EncryptedPayload, KeyMaterial};
pub use master_key::MasterKey;
pub use password::{decrypt_with_password, encrypt_with_password, PBKDF2_ITERATIONS};
pub use pdf_envelope::{
    protect_pdf, protected_cover_notice, unprotect_pdf, PdfPermissions, ProtectedPdf,
};
