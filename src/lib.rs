//! # PDF Signet
//!
//! Certificate core for a PDF digital-signing platform: a self-managed
//! signing identity plus the layout math for stamping signed documents.
//!
//! ## Core Features
//!
//! ### Certificates
//! - **Self-signed authority**: 2048-bit RSA, SHA-256, X.509 v3 with signing
//!   key usage, generated per environment on first use
//! - **Store**: lazy provisioning with single-flight concurrency, private
//!   keys encrypted at rest, in-memory cache, pre-expiry renewal
//! - **Extractor**: uploaded PKCS#12 containers projected into structured
//!   attributes, including ICP-Brasil CPF/CNPJ recovery
//!
//! ### Crypto
//! - **AES-256-GCM envelopes**: master-key and password-derived (PBKDF2)
//!   serialized payload formats, fail-closed on any tampering
//! - **PDF protection**: whole-document password envelopes carrying viewer
//!   permissions, with a non-recoverable cover notice
//!
//! ### Placement
//! - **Signature boxes**: normalized positions with legacy absolute-pair
//!   migration, scaling and rotation, placeholder fallback
//! - **QR + validation text**: corner anchoring, page targeting, greedy
//!   sentence wrap with an explicit skip policy on overflow
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pdf_signet::certificate::{
//!     AuthorityIdentity, CertificateAuthority, CertificateStore, InMemoryCertificateRepository,
//! };
//! use pdf_signet::crypto::MasterKey;
//!
//! # fn main() -> Result<(), pdf_signet::Error> {
//! let store = CertificateStore::new(
//!     Arc::new(InMemoryCertificateRepository::new()),
//!     CertificateAuthority::new(AuthorityIdentity::default(), "bundle-pass"),
//!     MasterKey::from_base64("QUFBQUFBQUFBQUFBQUFBQUFBQUFBQUFBQUFBQUFBQUE=")?,
//!     "production",
//! );
//! let active = store.get_or_create()?;
//! println!("signing with serial {}", active.record.serial_number);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Runtime configuration
pub mod config;

// Key and content encryption
pub mod crypto;

// Authority, store and PKCS#12 extraction
pub mod certificate;

// Page-space primitives
pub mod geometry;

// Signature, QR and validation text layout
pub mod placement;

// Document-level overlay composition
pub mod signing;

pub use config::CoreConfig;
pub use error::{Error, Result};
